//! Benchmarking engine for motion planning algorithms.
//!
//! Registers named (scene, planner, request) triples, runs each planner
//! repeatedly against its scene and request, collects per-run metrics and
//! hands the aggregated results to pluggable outputters.
//!
//! # Overview
//!
//! - [`Benchmarker`] - request registry and run loop
//! - [`Options`] / [`RunMetrics`] - run count and metric selection
//! - [`MetricComputer`] / [`MetricValue`] - per-run metric computation
//! - [`Results`] / [`Run`] - aggregated results of one benchmark
//! - [`BenchmarkOutputter`] - JSON, trajectory archive and OMPL log outputs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use motionbench_benchmark::{
//!     BenchmarkOutputter, Benchmarker, JsonBenchmarkOutputter, Options, RunMetrics,
//! };
//! use motionbench_test::{corner_scene, reach_goal_request, LinearPlanner};
//!
//! let dir = tempfile::tempdir().unwrap();
//!
//! let mut benchmarker = Benchmarker::new();
//! benchmarker.add_benchmarking_request(
//!     "reach-goal",
//!     Arc::new(corner_scene()),
//!     Arc::new(LinearPlanner::new("linear", 4)),
//!     Arc::new(reach_goal_request()),
//! );
//!
//! let mut outputters: Vec<Box<dyn BenchmarkOutputter>> = vec![Box::new(
//!     JsonBenchmarkOutputter::new(dir.path().join("results.json")),
//! )];
//! let options = Options::new()
//!     .with_runs(3)
//!     .with_metrics(RunMetrics::WAYPOINTS | RunMetrics::CORRECT);
//!
//! let report = benchmarker.benchmark(&mut outputters, &options).unwrap();
//! assert!(report.is_clean());
//! assert_eq!(report.results[0].run_count(), 3);
//! ```

mod error;
mod metric;
mod options;
mod output;
mod result;
mod runner;

pub use error::BenchmarkError;
pub use metric::{
    finite_or_max, format_real, MetricComputer, MetricMap, MetricValue, CLEARANCE, CORRECT,
    LENGTH, SMOOTHNESS, WAYPOINTS,
};
pub use options::{Options, RunMetrics};
pub use output::{
    outputters_from_config, read_json_dump, ArchiveRecord, BenchmarkOutputter, BenchmarkRecord,
    JsonBenchmarkOutputter, OmplBenchmarkOutputter, RunRecord, TrajectoryArchive,
    TrajectoryBenchmarkOutputter,
};
pub use result::{Results, Run};
pub use runner::{BenchmarkReport, BenchmarkRequest, Benchmarker, OutputFailure};
