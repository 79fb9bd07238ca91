//! Tests for benchmark configuration.

use std::io::Write;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        runs = 25
        metrics = ["waypoints", "clearance"]

        [output]
        json = "out/results.json"
        trajectories = "out/paths.mbt"
    "#;

    let config = BenchmarkConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.runs, 25);
    assert_eq!(
        config.metrics,
        Some(vec!["waypoints".to_string(), "clearance".to_string()])
    );
    assert_eq!(config.output.json.as_deref(), Some("out/results.json"));
    assert_eq!(config.output.trajectories.as_deref(), Some("out/paths.mbt"));
    assert_eq!(config.output.ompl_prefix, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        runs: 10
        metrics:
          - correct
          - smoothness
        output:
          ompl_prefix: logs/run_
    "#;

    let config = BenchmarkConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.runs, 10);
    assert_eq!(config.output.ompl_prefix.as_deref(), Some("logs/run_"));
}

#[test]
fn test_defaults_when_empty() {
    let config = BenchmarkConfig::from_toml_str("").unwrap();
    assert_eq!(config, BenchmarkConfig::default());
    assert_eq!(config.runs, DEFAULT_RUNS);
    assert!(config.metrics.is_none());
    assert!(config.output.is_empty());
}

#[test]
fn test_builder() {
    let config = BenchmarkConfig::new()
        .with_runs(3)
        .with_metrics(["waypoints", "correct"])
        .with_output(OutputConfig::default().with_json("r.json"));

    assert_eq!(config.runs, 3);
    assert_eq!(config.metrics.as_ref().map(Vec::len), Some(2));
    assert!(!config.output.is_empty());
}

#[test]
fn test_zero_runs_rejected() {
    let err = BenchmarkConfig::new().with_runs(0).validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_unknown_metric_rejected() {
    let err = BenchmarkConfig::new()
        .with_metrics(["waypoints", "jerk"])
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("jerk"));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "runs = 7").unwrap();

    let config = BenchmarkConfig::load(file.path()).unwrap();
    assert_eq!(config.runs, 7);
}

#[test]
fn test_load_rejects_invalid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "runs = 0").unwrap();

    assert!(matches!(
        BenchmarkConfig::load(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        BenchmarkConfig::load("/nonexistent/benchmark.toml"),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_invalid_toml() {
    assert!(matches!(
        BenchmarkConfig::from_toml_str("runs = \"many\""),
        Err(ConfigError::Toml(_))
    ));
}
