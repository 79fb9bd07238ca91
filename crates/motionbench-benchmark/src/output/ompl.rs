//! OMPL benchmark log output.
//!
//! Produces the plain-text log format read by OMPL's benchmark database
//! tooling (`ompl_benchmark_statistics.py`), one file per benchmark.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use super::BenchmarkOutputter;
use crate::error::BenchmarkError;
use crate::metric::{format_real, MetricValue};
use crate::result::Results;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timestamp layout of the `Starting at` header line.
const START_FORMAT: &str = "%Y-%b-%d %H:%M:%S%.6f";

/// Writes one OMPL benchmark log per benchmark, named `<prefix><name>.log`.
///
/// # Example
///
/// ```
/// use motionbench_benchmark::OmplBenchmarkOutputter;
///
/// let outputter = OmplBenchmarkOutputter::new("logs/run_");
/// assert_eq!(outputter.log_path("reach").to_str(), Some("logs/run_reach.log"));
/// ```
#[derive(Debug, Clone)]
pub struct OmplBenchmarkOutputter {
    prefix: String,
}

impl OmplBenchmarkOutputter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Path of the log written for benchmark `name`.
    pub fn log_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.log", self.prefix, name))
    }

    /// Renders the full log for one benchmark.
    pub fn render(results: &Results) -> Result<String, BenchmarkError> {
        let request = results.request();
        let mut out = String::new();

        writeln!(out, "motionbench version {}", VERSION)?;
        writeln!(out, "Experiment {}", results.name())?;
        writeln!(out, "Running on {}", hostname())?;
        writeln!(out, "Starting at {}", results.start().format(START_FORMAT))?;

        writeln!(out, "<<<|")?;
        writeln!(out, "Motion Plan Request:")?;
        writeln!(out, "{}", serde_yaml::to_string(request.as_ref())?.trim_end())?;
        writeln!(out, "|>>>")?;

        // No seed is exposed by planners; the tooling requires the line.
        writeln!(out, "0 is the random seed")?;
        writeln!(out, "{} seconds per run", format_real(request.allowed_planning_time))?;
        writeln!(out, "-1 MB per run")?;
        writeln!(out, "{} runs per planner", results.run_count())?;
        writeln!(out, "{} seconds spent to collect the data", format_real(results.elapsed_secs()))?;
        writeln!(out, "0 enum types")?;
        writeln!(out, "1 planners")?;

        let planner_name = if request.planner_id.is_empty() {
            results.planner().name()
        } else {
            request.planner_id.as_str()
        };
        writeln!(out, "{}", planner_name)?;
        writeln!(out, "0 common properties")?;

        // Property columns follow the metric order of the first run.
        let columns: Vec<(&str, &MetricValue)> = results
            .runs()
            .first()
            .map(|run| run.metrics.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default();

        writeln!(out, "{} properties for each run", columns.len() + 2)?;
        writeln!(out, "time REAL")?;
        writeln!(out, "success BOOLEAN")?;
        for (name, value) in &columns {
            writeln!(out, "{} {}", name, value.type_name())?;
        }

        writeln!(out, "{} runs", results.run_count())?;
        for run in results.runs() {
            write!(
                out,
                "{}; {}; ",
                format_real(run.time),
                MetricValue::Bool(run.success)
            )?;
            for (name, _) in &columns {
                if let Some(value) = run.metric(name) {
                    write!(out, "{}", value)?;
                }
                write!(out, "; ")?;
            }
            writeln!(out)?;
        }
        writeln!(out, ".")?;

        Ok(out)
    }
}

impl BenchmarkOutputter for OmplBenchmarkOutputter {
    fn name(&self) -> &str {
        "ompl"
    }

    fn dump_result(&mut self, results: &Results) -> Result<(), BenchmarkError> {
        let log = Self::render(results)?;
        let path = self.log_path(results.name());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, log)?;
        Ok(())
    }
}

/// Name of this machine for the log header.
///
/// Checks `HOSTNAME` before the Linux hostname files and falls back to
/// `localhost` when none of them is set.
fn hostname() -> String {
    hostname_from(
        std::env::var("HOSTNAME").ok(),
        &["/proc/sys/kernel/hostname", "/etc/hostname"],
    )
}

fn hostname_from(env: Option<String>, files: &[&str]) -> String {
    env.into_iter()
        .chain(files.iter().filter_map(|path| fs::read_to_string(path).ok()))
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metric::{CORRECT, LENGTH, WAYPOINTS};
    use crate::options::{Options, RunMetrics};
    use crate::result::Run;
    use motionbench_test::{corner_scene, reach_goal_request, LinearPlanner};

    fn results(runs: Vec<Run>) -> Results {
        let mut results = Results::new(
            "reach-goal",
            Arc::new(corner_scene()),
            Arc::new(LinearPlanner::new("linear", 4)),
            Arc::new(reach_goal_request().with_planner_id("RRTConnect")),
            Options::new()
                .with_runs(runs.len().max(1))
                .with_metrics(RunMetrics::WAYPOINTS | RunMetrics::CORRECT | RunMetrics::LENGTH),
        );
        for run in runs {
            results.add_run(run).unwrap();
        }
        results.mark_finished();
        results
    }

    fn sample_runs() -> Vec<Run> {
        vec![
            Run::new(0, 0.5, true)
                .with_metric(WAYPOINTS, 4_i64)
                .with_metric(CORRECT, true)
                .with_metric(LENGTH, 1.25),
            Run::new(1, 0.25, false)
                .with_metric(WAYPOINTS, 0_i64)
                .with_metric(CORRECT, false)
                .with_metric(LENGTH, f64::NAN),
        ]
    }

    #[test]
    fn test_render_header() {
        let log = OmplBenchmarkOutputter::render(&results(sample_runs())).unwrap();
        let lines: Vec<&str> = log.lines().collect();

        assert!(lines[0].starts_with("motionbench version "));
        assert_eq!(lines[1], "Experiment reach-goal");
        assert!(lines[2].starts_with("Running on "));
        assert!(lines[3].starts_with("Starting at "));
        assert_eq!(lines[4], "<<<|");
        assert!(log.contains("planner_id: RRTConnect"));
        assert!(log.contains("|>>>\n0 is the random seed\n2 seconds per run\n-1 MB per run\n2 runs per planner\n"));
        assert!(log.contains("0 enum types\n1 planners\nRRTConnect\n0 common properties\n"));
    }

    #[test]
    fn test_render_properties_and_rows() {
        let log = OmplBenchmarkOutputter::render(&results(sample_runs())).unwrap();
        let expected = format!(
            "5 properties for each run\n\
             time REAL\n\
             success BOOLEAN\n\
             waypoints INT\n\
             correct BOOLEAN\n\
             length REAL\n\
             2 runs\n\
             0.5; 1; 4; 1; 1.25; \n\
             0.25; 0; 0; 0; {}; \n\
             .\n",
            format_real(f64::MAX)
        );
        assert!(log.ends_with(&expected), "unexpected log:\n{}", log);
        assert!(!log.contains("NaN"));
    }

    #[test]
    fn test_render_without_runs() {
        let log = OmplBenchmarkOutputter::render(&results(vec![])).unwrap();
        assert!(log.ends_with("2 properties for each run\ntime REAL\nsuccess BOOLEAN\n0 runs\n.\n"));
    }

    #[test]
    fn test_planner_name_fallback() {
        let mut results = Results::new(
            "anon",
            Arc::new(corner_scene()),
            Arc::new(LinearPlanner::new("linear", 4)),
            Arc::new(reach_goal_request().with_planner_id("")),
            Options::new(),
        );
        results.mark_finished();
        let log = OmplBenchmarkOutputter::render(&results).unwrap();
        assert!(log.contains("1 planners\nlinear\n"));
    }

    #[test]
    fn test_dump_writes_prefixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/logs/exp_", dir.path().display());
        let mut outputter = OmplBenchmarkOutputter::new(prefix);

        outputter.dump_result(&results(sample_runs())).unwrap();

        let path = dir.path().join("logs/exp_reach-goal.log");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("motionbench version"));
        assert!(contents.ends_with(".\n"));
    }

    #[test]
    fn test_dump_to_unwritable_prefix_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let mut outputter = OmplBenchmarkOutputter::new(format!("{}/", blocker.display()));
        assert!(matches!(
            outputter.dump_result(&results(sample_runs())),
            Err(BenchmarkError::Io(_))
        ));
    }

    #[test]
    fn test_hostname_sources() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hostname");
        fs::write(&file, "lab-box\n").unwrap();
        let file = file.to_str().unwrap();

        assert_eq!(hostname_from(Some("ci-runner".into()), &[file]), "ci-runner");
        assert_eq!(hostname_from(Some("  ".into()), &[file]), "lab-box");
        assert_eq!(hostname_from(None, &["/nonexistent/hostname", file]), "lab-box");
        assert_eq!(hostname_from(None, &["/nonexistent/hostname"]), "localhost");
    }
}
