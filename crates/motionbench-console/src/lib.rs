//! Colorful console output for benchmark sessions.
//!
//! Provides a custom `tracing` layer that renders benchmark lifecycle events
//! emitted by `motionbench_benchmark`.
//!
//! ## Log Levels
//!
//! - **INFO**: Benchmark start/end
//! - **WARN**: Planner invocation and metric evaluation failures
//! - **ERROR**: Outputter failures
//! - **DEBUG**: Individual runs

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output for benchmark sessions.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default `info` level.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(BenchmarkConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

fn print_banner() {
    let banner = format!("motionbench v{} - motion planner benchmarking", VERSION);
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats benchmark events with colors.
pub struct BenchmarkConsoleLayer;

impl<S: Subscriber> Layer<S> for BenchmarkConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("motionbench") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    benchmark: Option<String>,
    planner: Option<String>,
    scene: Option<String>,
    outputter: Option<String>,
    metric: Option<String>,
    error: Option<String>,
    runs: Option<u64>,
    run: Option<u64>,
    successes: Option<u64>,
    duration_ms: Option<u64>,
    time: Option<f64>,
    success: Option<bool>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "benchmark" => self.benchmark = Some(value),
            "planner" => self.planner = Some(value),
            "scene" => self.scene = Some(value),
            "outputter" => self.outputter = Some(value),
            "metric" => self.metric = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "runs" => self.runs = Some(value),
            "run" => self.run = Some(value),
            "successes" => self.successes = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "time" {
            self.time = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "success" {
            self.success = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "benchmark_start" => format_benchmark_start(v),
        "benchmark_end" => format_benchmark_end(v),
        "run_end" => format_run_end(v, level),
        "planner_error" => format_planner_error(v),
        "metric_error" => format_metric_error(v),
        "output_failed" => format_output_failed(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>8.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_benchmark_start(v: &EventVisitor) -> String {
    let runs = v.runs.unwrap_or(0);
    format!(
        "{} {} {} │ planner {} │ scene {} │ {} runs",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.benchmark.as_deref().unwrap_or("?").white().bold(),
        v.planner.as_deref().unwrap_or("?").bright_yellow(),
        v.scene.as_deref().unwrap_or("?").bright_yellow(),
        runs.to_formatted_string(&Locale::en).bright_magenta(),
    )
}

fn format_benchmark_end(v: &EventVisitor) -> String {
    let runs = v.runs.unwrap_or(0);
    let successes = v.successes.unwrap_or(0);
    let rate = if runs == 0 {
        0.0
    } else {
        successes as f64 / runs as f64 * 100.0
    };
    let solved = format!(
        "{}/{} solved ({:.1}%)",
        successes.to_formatted_string(&Locale::en),
        runs.to_formatted_string(&Locale::en),
        rate
    );
    let solved = if successes == runs {
        solved.bright_green().bold().to_string()
    } else {
        solved.bright_yellow().bold().to_string()
    };

    format!(
        "{} {} {} complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        v.benchmark.as_deref().unwrap_or("?").white().bold(),
        solved,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_run_end(v: &EventVisitor, level: Level) -> String {
    if level < Level::DEBUG {
        return String::new();
    }
    let status = if v.success.unwrap_or(false) {
        "ok".bright_green().to_string()
    } else {
        "failed".bright_red().to_string()
    };
    format!(
        "{} {} {} run {:>5} │ {:>10} │ {}",
        format_elapsed(),
        "·".bright_black(),
        v.benchmark.as_deref().unwrap_or("?"),
        v.run.unwrap_or(0),
        format!("{:.3} ms", v.time.unwrap_or(0.0) * 1000.0),
        status
    )
}

fn format_planner_error(v: &EventVisitor) -> String {
    format!(
        "{} {} {} run {} │ planner error: {}",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        v.benchmark.as_deref().unwrap_or("?"),
        v.run.unwrap_or(0),
        v.error.as_deref().unwrap_or("unknown").bright_yellow()
    )
}

fn format_metric_error(v: &EventVisitor) -> String {
    format!(
        "{} {} metric {} unavailable: {}",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        v.metric.as_deref().unwrap_or("?").white(),
        v.error.as_deref().unwrap_or("unknown").bright_yellow()
    )
}

fn format_output_failed(v: &EventVisitor) -> String {
    let target = match &v.benchmark {
        Some(benchmark) => format!(" for {}", benchmark),
        None => String::new(),
    };
    format!(
        "{} {} {} output failed{}: {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.outputter.as_deref().unwrap_or("?").white().bold(),
        target,
        v.error.as_deref().unwrap_or("unknown").bright_red()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
