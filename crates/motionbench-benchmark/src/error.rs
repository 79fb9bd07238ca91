//! Benchmark error types.

use motionbench_config::ConfigError;
use thiserror::Error;

/// Errors raised by the benchmarking engine and its outputters.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Archive encoding error: {0}")]
    Archive(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Results of '{0}' are finished and cannot take more runs")]
    Finished(String),

    #[error("Run index out of order: expected {expected}, found {found}")]
    RunOutOfOrder { expected: usize, found: usize },

    #[error("Outputter already closed")]
    Closed,
}
