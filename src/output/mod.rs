//! Terminal output formatting for procmon.
//!
//! This module provides consistent, colored terminal output for the CLI.
//! Functions are organized by domain:
//!
//! - [`messages`] - Error, warning, info and version messages
//! - [`table`] - Grid table rendering
//! - [`reports`] - Target lists, log summaries, top processes, core info

pub mod messages;
pub mod reports;
pub mod table;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

// Re-export colors at module level for convenience
pub use colors::*;

pub use messages::{print_error, print_info, print_monitor_banner, print_version, print_warning};
pub use reports::{
    log_summary_rows, print_core_info, print_log_summary, print_targets, print_top_processes,
};
pub use table::render_table;
