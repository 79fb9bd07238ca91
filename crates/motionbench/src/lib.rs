//! motionbench - benchmarking for motion planning algorithms
//!
//! Register (scene, planner, request) triples on a [`Benchmarker`], then run
//! them with options and outputters built from a [`BenchmarkConfig`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use motionbench::prelude::*;
//! use motionbench_test::{corner_scene, reach_goal_request, LinearPlanner};
//!
//! let mut benchmarker = Benchmarker::new();
//! benchmarker.add_benchmarking_request(
//!     "reach-goal",
//!     Arc::new(corner_scene()),
//!     Arc::new(LinearPlanner::new("linear", 4)),
//!     Arc::new(reach_goal_request()),
//! );
//!
//! let config = BenchmarkConfig::new().with_runs(5);
//! let report = motionbench::run_benchmarks(&benchmarker, &config).unwrap();
//! assert_eq!(report.results[0].run_count(), 5);
//! ```

// Collaborator interfaces and planning data
pub use motionbench_core::{
    GeometryError, JointConstraint, JointGoal, JointTrajectoryPoint, MotionRequest,
    PlanResponse, Planner, PlannerError, RobotTrajectory, Scene,
};

// Configuration
pub use motionbench_config::{BenchmarkConfig, ConfigError, OutputConfig};

// Engine, metrics and outputters
pub use motionbench_benchmark::{
    outputters_from_config, read_json_dump, BenchmarkError, BenchmarkOutputter, BenchmarkReport,
    BenchmarkRequest, Benchmarker, JsonBenchmarkOutputter, MetricComputer, MetricValue,
    OmplBenchmarkOutputter, Options, Results, Run, RunMetrics, TrajectoryArchive,
    TrajectoryBenchmarkOutputter,
};

#[cfg(feature = "console")]
pub use motionbench_console as console;

mod session;
pub use session::{run_benchmarks, run_from_config_file};

pub mod prelude {
    pub use super::{
        BenchmarkConfig, BenchmarkOutputter, BenchmarkReport, Benchmarker, MotionRequest,
        Options, OutputConfig, Planner, Results, RunMetrics, Scene,
    };
}
