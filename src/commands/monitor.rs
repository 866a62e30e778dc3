//! Monitor command handler.
//!
//! Runs the sampling loop in the foreground until Ctrl+C or SIGTERM.

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::output::print_monitor_banner;
use crate::process::SysinfoProbe;
use crate::scheduler::Scheduler;
use crate::signal::SignalHandler;

/// Start monitoring every configured target.
///
/// # Returns
///
/// * `Ok(())` after a requested shutdown, once all log files are closed
/// * `Err(ProcmonError)` if the log directory is unusable or the signal
///   handler cannot be installed
pub fn monitor_command(config: &Config) -> Result<()> {
    config.ensure_log_dir()?;
    let shutdown = SignalHandler::new()?;

    print_monitor_banner(config);

    let mut scheduler = Scheduler::from_config(config, SysinfoProbe::new());
    scheduler.run(&shutdown);

    info!("Finalizando ProcMon");
    Ok(())
}
