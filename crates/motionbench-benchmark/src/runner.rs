//! Benchmark runner.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use motionbench_core::{MotionRequest, PlanResponse, Planner, Scene};
use tracing::{debug, error, info, warn};

use crate::error::BenchmarkError;
use crate::options::Options;
use crate::output::BenchmarkOutputter;
use crate::result::Results;

/// A registered (scene, planner, request) triple.
///
/// The collaborators are shared with the caller, never copied.
#[derive(Clone)]
pub struct BenchmarkRequest {
    pub scene: Arc<dyn Scene>,
    pub planner: Arc<dyn Planner>,
    pub request: Arc<MotionRequest>,
}

impl fmt::Debug for BenchmarkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkRequest")
            .field("scene", &self.scene.name())
            .field("planner", &self.planner.name())
            .field("request", &self.request)
            .finish()
    }
}

/// An outputter error recorded while dispatching one benchmark's results.
#[derive(Debug)]
pub struct OutputFailure {
    /// Name of the benchmark whose results failed to persist.
    pub benchmark: String,
    /// Name of the failing outputter.
    pub outputter: String,
    pub error: BenchmarkError,
}

/// Everything a benchmarking session produced.
#[derive(Debug, Default)]
pub struct BenchmarkReport {
    /// One aggregate per registered request, in registry order.
    pub results: Vec<Results>,
    /// Outputter errors, in the order they occurred.
    pub failures: Vec<OutputFailure>,
}

impl BenchmarkReport {
    /// Returns true if every outputter succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Looks up the results of a benchmark by name.
    pub fn get(&self, name: &str) -> Option<&Results> {
        self.results.iter().find(|r| r.name() == name)
    }
}

/// Runs registered planning requests repeatedly and dispatches the results.
///
/// Requests run one after another in name order, and the runs of each
/// request run sequentially. Only the planner call itself is timed.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use motionbench_benchmark::{Benchmarker, Options, RunMetrics};
/// use motionbench_test::{empty_scene, reach_goal_request, LinearPlanner};
///
/// let mut benchmarker = Benchmarker::new();
/// benchmarker.add_benchmarking_request(
///     "reach-goal",
///     Arc::new(empty_scene()),
///     Arc::new(LinearPlanner::new("linear", 4)),
///     Arc::new(reach_goal_request()),
/// );
///
/// let options = Options::new().with_runs(3).with_metrics(RunMetrics::WAYPOINTS);
/// let report = benchmarker.benchmark(&mut [], &options).unwrap();
///
/// assert_eq!(report.results.len(), 1);
/// assert_eq!(report.results[0].run_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct Benchmarker {
    requests: BTreeMap<String, BenchmarkRequest>,
}

impl Benchmarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request under `name`, replacing any previous entry.
    pub fn add_benchmarking_request(
        &mut self,
        name: impl Into<String>,
        scene: Arc<dyn Scene>,
        planner: Arc<dyn Planner>,
        request: Arc<MotionRequest>,
    ) {
        self.requests.insert(
            name.into(),
            BenchmarkRequest {
                scene,
                planner,
                request,
            },
        );
    }

    /// Returns the number of registered requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Registered names, in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.requests.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkRequest> {
        self.requests.get(name)
    }

    /// Benchmarks every registered request and hands each aggregate to every
    /// outputter.
    ///
    /// Options are validated before any planner is invoked. Outputter errors
    /// do not stop the session; they are collected in the returned report.
    /// Recording runs cannot fail here, since each fresh aggregate receives
    /// indices 0.. before it is finished.
    pub fn benchmark(
        &self,
        outputters: &mut [Box<dyn BenchmarkOutputter>],
        options: &Options,
    ) -> Result<BenchmarkReport, BenchmarkError> {
        options.validate()?;

        let mut report = BenchmarkReport::default();
        for (name, entry) in &self.requests {
            let results = self.run_request(name, entry, options)?;

            for outputter in outputters.iter_mut() {
                if let Err(err) = outputter.dump_result(&results) {
                    error!(
                        event = "output_failed",
                        benchmark = %name,
                        outputter = outputter.name(),
                        error = %err,
                        "Failed to write benchmark results"
                    );
                    report.failures.push(OutputFailure {
                        benchmark: name.clone(),
                        outputter: outputter.name().to_string(),
                        error: err,
                    });
                }
            }

            report.results.push(results);
        }

        Ok(report)
    }

    // Executes every run of one request and returns the finished aggregate.
    fn run_request(
        &self,
        name: &str,
        entry: &BenchmarkRequest,
        options: &Options,
    ) -> Result<Results, BenchmarkError> {
        let mut results = Results::new(
            name,
            Arc::clone(&entry.scene),
            Arc::clone(&entry.planner),
            Arc::clone(&entry.request),
            *options,
        );

        info!(
            event = "benchmark_start",
            benchmark = %name,
            planner = entry.planner.name(),
            scene = entry.scene.name(),
            runs = options.runs() as u64,
            "Benchmark started"
        );

        let mut successes = 0u64;
        for run in 0..options.runs() {
            let started = Instant::now();
            let outcome = entry
                .planner
                .plan(entry.scene.as_ref(), &entry.request, run);
            let time = started.elapsed().as_secs_f64();

            let response = outcome.unwrap_or_else(|err| {
                warn!(
                    event = "planner_error",
                    benchmark = %name,
                    run = run as u64,
                    error = %err,
                    "Planner invocation failed"
                );
                PlanResponse::failure(err.to_string())
            });

            let recorded = results.record_run(run, time, &response)?;
            if recorded.success {
                successes += 1;
            }
            debug!(
                event = "run_end",
                benchmark = %name,
                run = run as u64,
                time,
                success = recorded.success,
                "Run finished"
            );
        }

        results.mark_finished();
        info!(
            event = "benchmark_end",
            benchmark = %name,
            runs = results.run_count() as u64,
            successes,
            duration_ms = (results.elapsed_secs() * 1000.0) as u64,
            "Benchmark finished"
        );

        Ok(results)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
