use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcmonError {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Failed to read metrics: {0}")]
    SampleRead(String),

    #[error("Failed to write log file {path:?}: {source}")]
    FilesystemWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Failed to register signal handler: {0}")]
    SignalHandler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProcmonError>;
