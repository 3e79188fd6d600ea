use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Malformed event payload: {0}")]
    PayloadError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Unknown hook: {0}")]
    UnknownPhase(String),
    #[error("External command timed out after {secs}s: {program}")]
    ExternalTimeout { program: String, secs: u64 },
    #[error("{0}")]
    UsageError(String),
}

