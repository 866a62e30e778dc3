//! CLI command handlers for procmon.
//!
//! This module contains the implementation of every CLI action.
//! Each command has its own module with handler functions.
//!
//! # Commands
//!
//! - [`monitor`] - Run the sampling loop until stopped
//! - [`list`] - List monitoring targets
//! - [`tail`] - Show the latest entries of a target's log
//! - [`top`] - Busiest processes and CPU core summary

mod list;
mod monitor;
mod tail;
mod top;

pub use list::list_command;
pub use monitor::monitor_command;
pub use tail::{latest_log_path, tail_command, TAIL_LINES};
pub use top::{cores_command, top_command};
