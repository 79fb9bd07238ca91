//! Benchmark result types.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use motionbench_core::{MotionRequest, PlanResponse, Planner, RobotTrajectory, Scene};

use crate::error::BenchmarkError;
use crate::metric::{MetricComputer, MetricMap, MetricValue};
use crate::options::{Options, RunMetrics};

/// Result of a single benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Run index (0-based).
    pub num: usize,
    /// Wall-clock time of the planner invocation, in seconds.
    pub time: f64,
    /// Whether the planner produced a solution.
    pub success: bool,
    /// The planned trajectory, kept only when [`RunMetrics::PATH`] is selected.
    pub path: Option<RobotTrajectory>,
    /// Computed metrics, in insertion order.
    pub metrics: MetricMap,
}

impl Run {
    /// Creates a run with no path and no metrics.
    pub fn new(num: usize, time: f64, success: bool) -> Self {
        Self {
            num,
            time,
            success,
            path: None,
            metrics: MetricMap::new(),
        }
    }

    /// Adds a metric, replacing any previous value under the same name.
    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }

    /// Looks up a metric by name.
    pub fn metric(&self, name: &str) -> Option<&MetricValue> {
        self.metrics.get(name)
    }
}

/// Aggregated results of one named benchmark.
///
/// Holds the benchmark's identity, its start and finish timestamps, and the
/// runs in execution order. Runs are only ever appended.
#[derive(Clone)]
pub struct Results {
    name: String,
    scene: Arc<dyn Scene>,
    planner: Arc<dyn Planner>,
    request: Arc<MotionRequest>,
    options: Options,
    start: DateTime<Utc>,
    finish: Option<DateTime<Utc>>,
    runs: Vec<Run>,
}

impl Results {
    /// Creates empty results, stamping the start time.
    pub fn new(
        name: impl Into<String>,
        scene: Arc<dyn Scene>,
        planner: Arc<dyn Planner>,
        request: Arc<MotionRequest>,
        options: Options,
    ) -> Self {
        Self {
            name: name.into(),
            scene,
            planner,
            request,
            options,
            start: Utc::now(),
            finish: None,
            runs: Vec::with_capacity(options.runs()),
        }
    }

    /// Records one trial: builds its [`Run`], computes the selected metrics
    /// and appends it.
    ///
    /// Metrics are computed from the trajectory only when the response is
    /// solved; otherwise they take their failure values.
    ///
    /// # Errors
    ///
    /// Fails once the results are finished, or if `num` is not the next run
    /// index.
    pub fn record_run(
        &mut self,
        num: usize,
        time: f64,
        response: &PlanResponse,
    ) -> Result<&Run, BenchmarkError> {
        self.check_append(num)?;

        let success = response.is_solved();
        let trajectory = if success {
            response.trajectory.as_ref()
        } else {
            None
        };

        let metrics = self.options.metrics();
        let mut run = Run::new(num, time, success);
        run.metrics =
            MetricComputer::new(self.scene.as_ref(), &self.request, metrics).compute(trajectory);
        if metrics.contains(RunMetrics::PATH) {
            run.path = trajectory.cloned();
        }

        self.runs.push(run);
        Ok(&self.runs[self.runs.len() - 1])
    }

    /// Appends an already-built run.
    ///
    /// # Errors
    ///
    /// Same conditions as [`record_run`](Self::record_run).
    pub fn add_run(&mut self, run: Run) -> Result<(), BenchmarkError> {
        self.check_append(run.num)?;
        self.runs.push(run);
        Ok(())
    }

    // Runs are append-only, indexed 0.., and frozen once finished.
    fn check_append(&self, num: usize) -> Result<(), BenchmarkError> {
        if self.is_finished() {
            return Err(BenchmarkError::Finished(self.name.clone()));
        }
        if num != self.runs.len() {
            return Err(BenchmarkError::RunOutOfOrder {
                expected: self.runs.len(),
                found: num,
            });
        }
        Ok(())
    }

    /// Stamps the finish time. Later calls keep the first stamp.
    pub fn mark_finished(&mut self) {
        if self.finish.is_none() {
            self.finish = Some(Utc::now());
        }
    }

    /// Benchmark name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scene(&self) -> &Arc<dyn Scene> {
        &self.scene
    }

    pub fn planner(&self) -> &Arc<dyn Planner> {
        &self.planner
    }

    pub fn request(&self) -> &Arc<MotionRequest> {
        &self.request
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Finish time, once every run has been recorded.
    pub fn finish(&self) -> Option<DateTime<Utc>> {
        self.finish
    }

    pub fn is_finished(&self) -> bool {
        self.finish.is_some()
    }

    /// Runs in execution order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Returns the number of runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Time between start and finish, in seconds; zero before finishing.
    pub fn elapsed_secs(&self) -> f64 {
        self.finish
            .and_then(|finish| (finish - self.start).to_std().ok())
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl fmt::Debug for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results")
            .field("name", &self.name)
            .field("scene", &self.scene.name())
            .field("planner", &self.planner.name())
            .field("request", &self.request)
            .field("options", &self.options)
            .field("start", &self.start)
            .field("finish", &self.finish)
            .field("runs", &self.runs.len())
            .finish()
    }
}
