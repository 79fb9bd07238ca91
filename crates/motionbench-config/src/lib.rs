//! Configuration system for motionbench.
//!
//! Load benchmark configuration from TOML or YAML files to control the run
//! count, the metrics collected per run, and where results are written.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use motionbench_config::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::from_toml_str(r#"
//!     runs = 50
//!     metrics = ["waypoints", "correct", "length"]
//!
//!     [output]
//!     json = "results.json"
//!     ompl_prefix = "logs/"
//! "#).unwrap();
//!
//! assert_eq!(config.runs, 50);
//! assert_eq!(config.metrics.as_ref().unwrap().len(), 3);
//! assert_eq!(config.output.ompl_prefix.as_deref(), Some("logs/"));
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use motionbench_config::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::load("benchmark.toml").unwrap_or_default();
//! assert_eq!(config.runs, 100);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of runs per benchmarking request.
pub const DEFAULT_RUNS: usize = 100;

/// Metric names accepted in the `metrics` list.
pub const METRIC_NAMES: [&str; 6] = [
    "waypoints",
    "path",
    "correct",
    "length",
    "clearance",
    "smoothness",
];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main benchmark configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkConfig {
    /// Number of runs per benchmarking request.
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Metrics to collect. `None` collects every metric.
    #[serde(default)]
    pub metrics: Option<Vec<String>>,

    /// Output destinations.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_runs() -> usize {
    DEFAULT_RUNS
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            metrics: None,
            output: OutputConfig::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the run count.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Restricts collection to the named metrics.
    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Some(metrics.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the output configuration.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Checks the run count and metric names.
    ///
    /// # Examples
    ///
    /// ```
    /// use motionbench_config::BenchmarkConfig;
    ///
    /// assert!(BenchmarkConfig::new().with_runs(0).validate().is_err());
    /// assert!(BenchmarkConfig::new().with_metrics(["jerk"]).validate().is_err());
    /// assert!(BenchmarkConfig::new().with_metrics(["length"]).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::Invalid(
                "runs must be a positive integer".to_string(),
            ));
        }
        if let Some(metrics) = &self.metrics {
            if let Some(unknown) = metrics
                .iter()
                .find(|m| !METRIC_NAMES.contains(&m.as_str()))
            {
                return Err(ConfigError::Invalid(format!(
                    "unknown metric '{}', expected one of {:?}",
                    unknown, METRIC_NAMES
                )));
            }
        }
        Ok(())
    }
}

/// Output destinations. Each present entry enables one outputter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Path of the JSON results document.
    pub json: Option<String>,

    /// Path of the trajectory archive.
    pub trajectories: Option<String>,

    /// File name prefix for per-benchmark OMPL logs.
    pub ompl_prefix: Option<String>,
}

impl OutputConfig {
    pub fn with_json(mut self, path: impl Into<String>) -> Self {
        self.json = Some(path.into());
        self
    }

    pub fn with_trajectories(mut self, path: impl Into<String>) -> Self {
        self.trajectories = Some(path.into());
        self
    }

    pub fn with_ompl_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ompl_prefix = Some(prefix.into());
        self
    }

    /// Returns true if no destination is configured.
    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.trajectories.is_none() && self.ompl_prefix.is_none()
    }
}

#[cfg(test)]
mod tests;
