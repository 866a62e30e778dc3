//! Tail command handler.
//!
//! Shows the last entries of the most recent log file for one target.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{ProcmonError, Result};
use crate::logfile::{find_latest_log, tail_lines};
use crate::output::{print_info, print_log_summary};
use crate::target::{find_target, Target};

/// Number of entries shown.
pub const TAIL_LINES: usize = 5;

/// Resolves `target_name` against the configured targets and finds its most
/// recent log file.
///
/// # Errors
///
/// Returns [`ProcmonError::UnknownTarget`] if the name is not a configured target.
pub fn latest_log_path(config: &Config, target_name: &str) -> Result<(Target, Option<PathBuf>)> {
    let targets = config.targets();
    let target = find_target(&targets, target_name)
        .cloned()
        .ok_or_else(|| ProcmonError::UnknownTarget(target_name.to_string()))?;

    let path = find_latest_log(&config.log_dir, &config.filename_template, &target)?;
    Ok((target, path))
}

/// Print the last [`TAIL_LINES`] entries of the target's most recent log.
pub fn tail_command(config: &Config, target_name: &str) -> Result<()> {
    match latest_log_path(config, target_name)? {
        (target, Some(path)) => {
            let lines = tail_lines(&path, TAIL_LINES)?;
            print_log_summary(&target, &path, &lines);
        }
        (_, None) => {
            print_info(&format!(
                "Nenhum arquivo de log encontrado para '{}'.",
                target_name
            ));
        }
    }
    Ok(())
}
