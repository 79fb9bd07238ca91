//! Benchmark options and the run metric bit set.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use motionbench_config::{BenchmarkConfig, DEFAULT_RUNS, METRIC_NAMES};
use serde::{Deserialize, Serialize};

use crate::error::BenchmarkError;

/// Set of metric categories computed for each run.
///
/// # Example
///
/// ```
/// use motionbench_benchmark::RunMetrics;
///
/// let metrics = RunMetrics::WAYPOINTS | RunMetrics::CORRECT;
/// assert!(metrics.contains(RunMetrics::WAYPOINTS));
/// assert!(!metrics.contains(RunMetrics::CLEARANCE));
/// assert_eq!(metrics.names(), vec!["waypoints", "correct"]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RunMetrics(u32);

impl RunMetrics {
    pub const NONE: Self = Self(0);
    pub const WAYPOINTS: Self = Self(1 << 0);
    pub const PATH: Self = Self(1 << 1);
    pub const CORRECT: Self = Self(1 << 2);
    pub const LENGTH: Self = Self(1 << 3);
    pub const CLEARANCE: Self = Self(1 << 4);
    pub const SMOOTHNESS: Self = Self(1 << 5);
    /// Category `i` is named `METRIC_NAMES[i]`.
    pub const ALL: Self = Self((1 << METRIC_NAMES.len()) - 1);

    /// Builds a set from raw bits, ignoring unknown bits.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every category in `other` is selected.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Looks up a single category by name.
    pub fn from_name(name: &str) -> Option<Self> {
        METRIC_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self(1 << i))
    }

    /// Names of the selected categories, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        METRIC_NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    /// Parses a list of category names.
    pub fn from_names<I, S>(names: I) -> Result<Self, BenchmarkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::NONE, |acc, name| {
            let name = name.as_ref();
            Self::from_name(name)
                .map(|bit| acc | bit)
                .ok_or_else(|| BenchmarkError::InvalidOptions(format!("unknown metric '{}'", name)))
        })
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for RunMetrics {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RunMetrics {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunMetrics({})", self.names().join(" | "))
    }
}

impl TryFrom<Vec<String>> for RunMetrics {
    type Error = BenchmarkError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(names)
    }
}

impl From<RunMetrics> for Vec<String> {
    fn from(metrics: RunMetrics) -> Self {
        metrics.names().into_iter().map(String::from).collect()
    }
}

/// Per-benchmark options: how many runs, and which metrics to compute.
///
/// # Example
///
/// ```
/// use motionbench_benchmark::{Options, RunMetrics};
///
/// let options = Options::new()
///     .with_runs(10)
///     .with_metrics(RunMetrics::WAYPOINTS | RunMetrics::LENGTH);
///
/// assert_eq!(options.runs(), 10);
/// assert!(options.validate().is_ok());
/// assert!(Options::try_new(0, RunMetrics::ALL).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    runs: usize,
    metrics: RunMetrics,
}

impl Options {
    /// Creates options with the defaults: 100 runs, every metric.
    pub fn new() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            metrics: RunMetrics::ALL,
        }
    }

    /// Creates validated options.
    pub fn try_new(runs: usize, metrics: RunMetrics) -> Result<Self, BenchmarkError> {
        let options = Self { runs, metrics };
        options.validate()?;
        Ok(options)
    }

    /// Builds options from a loaded configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use motionbench_benchmark::{Options, RunMetrics};
    /// use motionbench_config::BenchmarkConfig;
    ///
    /// let config = BenchmarkConfig::new().with_runs(5).with_metrics(["correct"]);
    /// let options = Options::from_config(&config).unwrap();
    /// assert_eq!(options.runs(), 5);
    /// assert_eq!(options.metrics(), RunMetrics::CORRECT);
    /// ```
    pub fn from_config(config: &BenchmarkConfig) -> Result<Self, BenchmarkError> {
        config.validate()?;
        let metrics = match &config.metrics {
            Some(names) => RunMetrics::from_names(names)?,
            None => RunMetrics::ALL,
        };
        Self::try_new(config.runs, metrics)
    }

    /// Sets the number of runs per request.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the metric categories to compute.
    pub fn with_metrics(mut self, metrics: RunMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn metrics(&self) -> RunMetrics {
        self.metrics
    }

    /// Rejects a zero run count.
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        if self.runs == 0 {
            return Err(BenchmarkError::InvalidOptions(
                "runs must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.runs(), 100);
        assert_eq!(options.metrics(), RunMetrics::ALL);
        assert_eq!(RunMetrics::default(), RunMetrics::ALL);
    }

    #[test]
    fn test_all_contains_every_category() {
        for name in METRIC_NAMES {
            let bit = RunMetrics::from_name(name).unwrap();
            assert!(RunMetrics::ALL.contains(bit));
            assert!(!RunMetrics::NONE.contains(bit));
        }
        assert_eq!(RunMetrics::ALL.names(), METRIC_NAMES.to_vec());
    }

    #[test]
    fn test_named_constants_match_config_names() {
        let named = [
            (RunMetrics::WAYPOINTS, "waypoints"),
            (RunMetrics::PATH, "path"),
            (RunMetrics::CORRECT, "correct"),
            (RunMetrics::LENGTH, "length"),
            (RunMetrics::CLEARANCE, "clearance"),
            (RunMetrics::SMOOTHNESS, "smoothness"),
        ];
        for (bit, name) in named {
            assert_eq!(RunMetrics::from_name(name), Some(bit));
            assert_eq!(bit.names(), vec![name]);
        }
    }

    #[test]
    fn test_from_bits_truncate() {
        assert_eq!(RunMetrics::from_bits_truncate(!0), RunMetrics::ALL);
        assert_eq!(RunMetrics::from_bits_truncate(0b101), RunMetrics::WAYPOINTS | RunMetrics::CORRECT);
    }

    #[test]
    fn test_bitor_assign() {
        let mut metrics = RunMetrics::NONE;
        assert!(metrics.is_empty());
        metrics |= RunMetrics::SMOOTHNESS;
        assert!(metrics.contains(RunMetrics::SMOOTHNESS));
        assert_eq!(metrics.bits(), 1 << 5);
    }

    #[test]
    fn test_from_names_unknown() {
        let err = RunMetrics::from_names(["waypoints", "jerk"]).unwrap_err();
        assert!(err.to_string().contains("jerk"));
    }

    #[test]
    fn test_serde_as_names() {
        let options = Options::new().with_runs(3).with_metrics(RunMetrics::WAYPOINTS | RunMetrics::PATH);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"runs":3,"metrics":["waypoints","path"]}"#);

        let parsed: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_zero_runs_rejected() {
        assert!(matches!(
            Options::new().with_runs(0).validate(),
            Err(BenchmarkError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_from_config_defaults_to_all_metrics() {
        let options = Options::from_config(&BenchmarkConfig::default()).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_from_config_rejects_zero_runs() {
        let config = BenchmarkConfig::new().with_runs(0);
        assert!(matches!(Options::from_config(&config), Err(BenchmarkError::Config(_))));
    }
}
