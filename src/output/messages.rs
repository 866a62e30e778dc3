//! Basic message output functions.
//!
//! Provides simple error, warning, and info message display.

use super::colors::*;
use crate::config::Config;

/// One-line program description, shown by `--version` and at startup.
pub const DESCRIPTION: &str = "ProcMon - Monitor de Sistema e Processos";

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{CYAN}Info:{RESET} {}", msg);
}

pub fn print_version() {
    println!("{}", DESCRIPTION);
    println!("Versão: {}", env!("CARGO_PKG_VERSION"));
}

/// Print the startup summary before entering the monitoring loop.
pub fn print_monitor_banner(config: &Config) {
    let processes = if config.processes.is_empty() {
        "Nenhum específico".to_string()
    } else {
        config.processes.join(", ")
    };

    println!(
        "{CYAN}{BOLD}{} v{}{RESET}",
        DESCRIPTION,
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{BLUE}Intervalo:{RESET} {}s {GRAY}|{RESET} {BLUE}Logs em:{RESET} {}",
        config.interval_secs,
        config.log_dir.display()
    );
    println!("{BLUE}Processos monitorados:{RESET} {}", processes);
    println!("{DIM}Pressione Ctrl+C (ou pare o serviço) para interromper.{RESET}");
}
