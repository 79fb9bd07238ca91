//! Result outputters.
//!
//! Each outputter persists finished [`Results`] in one external format:
//!
//! - [`JsonBenchmarkOutputter`] - one JSON document holding every benchmark
//! - [`TrajectoryBenchmarkOutputter`] - archive of planned trajectories, one topic per benchmark
//! - [`OmplBenchmarkOutputter`] - one OMPL benchmark log per benchmark

mod json;
mod ompl;
mod trajectory;

use motionbench_config::OutputConfig;

use crate::error::BenchmarkError;
use crate::result::Results;

pub use json::{read_json_dump, BenchmarkRecord, JsonBenchmarkOutputter, RunRecord};
pub use ompl::OmplBenchmarkOutputter;
pub use trajectory::{ArchiveRecord, TrajectoryArchive, TrajectoryBenchmarkOutputter};

/// Persists benchmark results.
///
/// `dump_result` is called once per benchmark, after its results are
/// finished. Outputters that share one destination across calls keep it
/// open between calls and finalize it when dropped.
pub trait BenchmarkOutputter {
    /// Name used when reporting failures.
    fn name(&self) -> &str;

    /// Writes one benchmark's results.
    fn dump_result(&mut self, results: &Results) -> Result<(), BenchmarkError>;
}

/// Builds one outputter per destination present in the configuration.
///
/// # Example
///
/// ```
/// use motionbench_benchmark::outputters_from_config;
/// use motionbench_config::OutputConfig;
///
/// let config = OutputConfig::default()
///     .with_json("results.json")
///     .with_ompl_prefix("logs/");
/// let outputters = outputters_from_config(&config);
///
/// let names: Vec<&str> = outputters.iter().map(|o| o.name()).collect();
/// assert_eq!(names, vec!["json", "ompl"]);
/// ```
pub fn outputters_from_config(config: &OutputConfig) -> Vec<Box<dyn BenchmarkOutputter>> {
    let mut outputters: Vec<Box<dyn BenchmarkOutputter>> = Vec::new();
    if let Some(path) = &config.json {
        outputters.push(Box::new(JsonBenchmarkOutputter::new(path)));
    }
    if let Some(path) = &config.trajectories {
        outputters.push(Box::new(TrajectoryBenchmarkOutputter::new(path)));
    }
    if let Some(prefix) = &config.ompl_prefix {
        outputters.push(Box::new(OmplBenchmarkOutputter::new(prefix)));
    }
    outputters
}
