pub mod commands;
pub mod config;
pub mod error;
pub mod logfile;
pub mod output;
pub mod process;
pub mod scheduler;
pub mod signal;
pub mod target;
pub mod top;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{load_config, Config};
pub use error::{ProcmonError, Result};
pub use logfile::{HourBucket, LogLevel, LogWriter};
pub use process::{ProcessResolver, Sample, SampleStatus, SysinfoProbe, SystemProbe};
pub use scheduler::{Scheduler, SchedulerState, TickReport};
pub use signal::SignalHandler;
pub use target::{Target, TargetKind};
