//! Benchmark session entry points that hide outputter wiring.

use std::path::Path;

use motionbench_benchmark::{
    outputters_from_config, BenchmarkError, BenchmarkReport, Benchmarker, Options,
};
use motionbench_config::BenchmarkConfig;

/// Runs every registered request with the options and outputters described
/// by `config`.
///
/// Outputters are dropped before returning, so shared destinations such as
/// the JSON document and the trajectory archive are complete on disk once
/// this returns.
pub fn run_benchmarks(
    benchmarker: &Benchmarker,
    config: &BenchmarkConfig,
) -> Result<BenchmarkReport, BenchmarkError> {
    #[cfg(feature = "console")]
    motionbench_console::init();

    let options = Options::from_config(config)?;
    let mut outputters = outputters_from_config(&config.output);
    let report = benchmarker.benchmark(&mut outputters, &options)?;
    drop(outputters);

    Ok(report)
}

/// Loads a TOML configuration file and runs [`run_benchmarks`] with it.
pub fn run_from_config_file(
    benchmarker: &Benchmarker,
    path: impl AsRef<Path>,
) -> Result<BenchmarkReport, BenchmarkError> {
    let config = BenchmarkConfig::load(path)?;
    run_benchmarks(benchmarker, &config)
}
