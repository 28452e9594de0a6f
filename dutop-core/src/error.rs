use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DutopError {
    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid unit {unit:?}, choices: {choices}")]
    InvalidUnit { unit: String, choices: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DutopError>;

/// A directory that could not be listed, or only partially
///
/// Never fatal: the walk keeps whatever entries were obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", .path.display())]
pub struct ListError {
    pub path: PathBuf,
    pub message: String,
}

impl ListError {
    pub fn new(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
