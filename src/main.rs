//! procmon CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.
//! Without flags, runs the monitoring loop until Ctrl+C or SIGTERM.

use clap::{Parser, ValueEnum};
use procmon::commands::{cores_command, list_command, monitor_command, tail_command, top_command};
use procmon::config::{load_config, MAX_INTERVAL_SECS};
use procmon::error::ProcmonError;
use procmon::output::{print_error, print_targets, print_version, print_warning};
use procmon::top::SortKey;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "procmon")]
#[command(
    about = "Samples system-wide and per-process CPU/memory usage into hourly log files",
    disable_version_flag = true,
    after_help = "EXAMPLES:
    # Monitor the system and two processes every 30 seconds
    MONITORING_PROCESSES=mysqld,httpd procmon --interval 30

    # List monitoring targets
    procmon -l

    # Show the last 5 entries logged for mysqld
    procmon -l mysqld

CONFIGURATION:
    Read from --config, else ./procmon.toml, else ~/.config/procmon/config.toml.
    Environment variables override file values:
    PATH_LOG_FILES, PRINCIPAL_FILENAME_LOG, MONITORING_PROCESSES,
    MONITOR_INTERVAL_SECONDS, PROCMON_LOG_LEVEL"
)]
struct Cli {
    /// Show the program version
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// List monitoring targets, or show the latest log entries for TARGET
    #[arg(
        short,
        long,
        value_name = "TARGET",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    list: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Sampling interval in seconds (overrides configuration)
    #[arg(
        short,
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS)
    )]
    interval: Option<u64>,

    /// Show the N busiest processes
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "10",
        conflicts_with_all = ["list", "cores"]
    )]
    top: Option<usize>,

    /// Ranking used by --top
    #[arg(long, value_enum, default_value_t = SortArg::Cpu)]
    sort: SortArg,

    /// Show CPU core counts and overall usage
    #[arg(long, conflicts_with = "list")]
    cores: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Cpu,
    Mem,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Cpu => SortKey::Cpu,
            SortArg::Mem => SortKey::Memory,
        }
    }
}

fn init_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        print_warning(&format!("Diagnostics disabled: {}", e));
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        print_version();
        return;
    }

    // System snapshots don't need a configuration
    if cli.top.is_some() || cli.cores {
        init_tracing(Level::WARN);
        let result = match cli.top {
            Some(count) => top_command(count.max(1), cli.sort.into()),
            None => cores_command(),
        };
        if let Err(e) = result {
            print_error(&e.to_string());
            std::process::exit(1);
        }
        return;
    }

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }

    init_tracing(config.tracing_level().unwrap_or(Level::INFO));

    let result = match cli.list.as_deref() {
        Some("") => list_command(&config),
        Some(target) => tail_command(&config, target),
        None => monitor_command(&config),
    };

    match result {
        Ok(()) => {}
        Err(ProcmonError::UnknownTarget(target)) => {
            print_error(&format!("Alvo '{}' inválido.", target));
            println!("Alvos válidos são:");
            print_targets(&config.targets());
            std::process::exit(1);
        }
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
