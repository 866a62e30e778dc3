use crate::error::{ProcmonError, Result};
use crate::target::{build_targets, Target};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "procmon";

/// The filename for the per-user configuration file.
const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILENAME: &str = "procmon.toml";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_FILENAME_TEMPLATE: &str = "PROCESSMONITOR_%DATAHORA%.log";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
/// Longest accepted sampling interval: one day.
pub const MAX_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Environment overrides
pub const ENV_LOG_DIR: &str = "PATH_LOG_FILES";
pub const ENV_FILENAME_TEMPLATE: &str = "PRINCIPAL_FILENAME_LOG";
pub const ENV_PROCESSES: &str = "MONITORING_PROCESSES";
pub const ENV_INTERVAL: &str = "MONITOR_INTERVAL_SECONDS";
pub const ENV_LOG_LEVEL: &str = "PROCMON_LOG_LEVEL";

// ============================================================================
// Monitor Configuration
// ============================================================================

/// Runtime configuration of the monitor.
///
/// Missing fields in a config file fall back to their defaults, so partial
/// files are valid.
///
/// # Example
///
/// ```toml
/// log_dir = "/var/log/procmon"
/// filename_template = "PROCESSMONITOR_%DATAHORA%.log"
/// processes = ["mysqld", "httpd"]
/// interval_secs = 60
/// log_level = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the per-target log files.
    pub log_dir: PathBuf,

    /// Log filename template; must contain `%DATAHORA%`.
    pub filename_template: String,

    /// Process names to monitor, in addition to the global target.
    pub processes: Vec<String>,

    /// Seconds between sampling ticks.
    pub interval_secs: u64,

    /// Diagnostic verbosity on stderr (`trace`, `debug`, `info`, `warn`, `error`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            processes: Vec::new(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ProcmonError::ConfigInvalid(e.to_string()))
    }

    /// Applies environment overrides, reading variables through `lookup`.
    ///
    /// `MONITORING_PROCESSES` is a comma-separated list and replaces the
    /// configured processes entirely.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(template) = lookup(ENV_FILENAME_TEMPLATE) {
            self.filename_template = template;
        }
        if let Some(processes) = lookup(ENV_PROCESSES) {
            self.processes = split_process_list(&processes);
        }
        if let Some(interval) = lookup(ENV_INTERVAL) {
            self.interval_secs = interval.trim().parse().map_err(|_| {
                ProcmonError::ConfigInvalid(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_INTERVAL, interval
                ))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Trims process names and drops blanks, repeats and the reserved `global`.
    pub fn normalize(&mut self) {
        self.processes = self
            .targets()
            .into_iter()
            .skip(1)
            .map(|t| t.name().to_string())
            .collect();
    }

    /// Checks the configuration for values the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.log_dir.as_os_str().is_empty() {
            return Err(ProcmonError::ConfigInvalid(
                "log directory must not be empty".to_string(),
            ));
        }
        if !self
            .filename_template
            .contains(crate::logfile::DATAHORA_PLACEHOLDER)
        {
            return Err(ProcmonError::ConfigInvalid(format!(
                "filename template '{}' must contain {}",
                self.filename_template,
                crate::logfile::DATAHORA_PLACEHOLDER
            )));
        }
        if self.filename_template.contains(['/', '\\']) {
            return Err(ProcmonError::ConfigInvalid(format!(
                "filename template '{}' must be a file name, not a path",
                self.filename_template
            )));
        }
        if self.interval_secs == 0 {
            return Err(ProcmonError::ConfigInvalid(
                "interval must be at least 1 second".to_string(),
            ));
        }
        if self.interval_secs > MAX_INTERVAL_SECS {
            return Err(ProcmonError::ConfigInvalid(format!(
                "interval must be at most {} seconds, got {}",
                MAX_INTERVAL_SECS, self.interval_secs
            )));
        }
        self.tracing_level()?;
        Ok(())
    }

    /// Targets in monitoring order: `global` first, then each process.
    pub fn targets(&self) -> Vec<Target> {
        build_targets(&self.processes)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(self.log_level.trim()).map_err(|_| {
            ProcmonError::ConfigInvalid(format!("unknown log level '{}'", self.log_level))
        })
    }

    /// Creates the log directory if absent. Idempotent.
    pub fn ensure_log_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.log_dir).map_err(|e| {
            ProcmonError::ConfigInvalid(format!(
                "cannot create log directory {}: {}",
                self.log_dir.display(),
                e
            ))
        })?;
        if !self.log_dir.is_dir() {
            return Err(ProcmonError::ConfigInvalid(format!(
                "{} is not a directory",
                self.log_dir.display()
            )));
        }
        Ok(())
    }
}

/// Splits a comma-separated process list, trimming entries and dropping blanks.
pub fn split_process_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Config File Management
// ============================================================================

/// Get the procmon config directory path (~/.config/procmon/).
///
/// Returns the path to the config directory. Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        ProcmonError::ConfigInvalid("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the per-user config file (~/.config/procmon/config.toml).
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(GLOBAL_CONFIG_FILENAME))
}

/// Config file used when none is given explicitly: `./procmon.toml`, then
/// `~/.config/procmon/config.toml`, whichever exists first.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    global_config_path().ok().filter(|p| p.is_file())
}

/// Reads and parses a config file.
pub fn read_config_file(path: &Path) -> Result<Config> {
    if !path.is_file() {
        return Err(ProcmonError::ConfigInvalid(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        ProcmonError::ConfigInvalid(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })
}

/// Loads the effective configuration.
///
/// Layers, lowest precedence first: defaults, the config file (`explicit`
/// or the default lookup), environment variables. The result is normalized
/// and validated.
///
/// # Errors
///
/// Returns [`ProcmonError::ConfigInvalid`] if an explicit file is missing,
/// a file or environment value cannot be parsed, or validation fails.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match default_config_path() {
            Some(path) => read_config_file(&path)?,
            None => Config::default(),
        },
    };

    config.apply_env(|key| env::var(key).ok())?;
    config.normalize();
    config.validate()?;
    Ok(config)
}
