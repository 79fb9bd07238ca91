//! Per-run metric values and their computation.

use std::fmt;

use indexmap::IndexMap;
use motionbench_core::geometry::{self, GeometryError};
use motionbench_core::{MotionRequest, RobotTrajectory, Scene};
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::options::RunMetrics;

/// Metric key for the waypoint count.
pub const WAYPOINTS: &str = "waypoints";
/// Metric key for the independent validity check.
pub const CORRECT: &str = "correct";
/// Metric key for the joint-space path length.
pub const LENGTH: &str = "length";
/// Metric key for the average obstacle clearance.
pub const CLEARANCE: &str = "clearance";
/// Metric key for the curvature smoothness score.
pub const SMOOTHNESS: &str = "smoothness";

/// Insertion-ordered metric name to value map of one run.
pub type MetricMap = IndexMap<String, MetricValue>;

/// A heterogeneously typed metric value.
///
/// The text form is shared by every outputter: integers print in decimal,
/// booleans as `1`/`0`, and reals with any non-finite value replaced by
/// `f64::MAX`.
///
/// # Example
///
/// ```
/// use motionbench_benchmark::MetricValue;
///
/// assert_eq!(MetricValue::Int(4).to_string(), "4");
/// assert_eq!(MetricValue::Bool(true).to_string(), "1");
/// assert_eq!(MetricValue::Real(0.25).to_string(), "0.25");
/// assert_eq!(MetricValue::Real(f64::NAN).to_string(), "1.7976931348623157e308");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Int(i64),
    Real(f64),
}

impl MetricValue {
    /// Type name used in OMPL log property declarations.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetricValue::Bool(_) => "BOOLEAN",
            MetricValue::Int(_) => "INT",
            MetricValue::Real(_) => "REAL",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            MetricValue::Real(v) => Some(*v),
            _ => None,
        }
    }
}

/// Replaces NaN and infinities with the largest finite value.
pub fn finite_or_max(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::MAX
    }
}

/// Canonical decimal text of a real; exponent form for very large magnitudes.
pub fn format_real(value: f64) -> String {
    let value = finite_or_max(value);
    if value != 0.0 && value.abs() >= 1e16 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(v) => write!(f, "{}", u8::from(*v)),
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Real(v) => f.write_str(&format_real(*v)),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Bool(v) => serializer.serialize_bool(*v),
            MetricValue::Int(v) => serializer.serialize_i64(*v),
            MetricValue::Real(v) => serializer.serialize_f64(finite_or_max(*v)),
        }
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Bool(v)
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Real(v)
    }
}

/// Computes the metric map of one trial against its scene and request.
///
/// Only categories selected in the [`RunMetrics`] set are evaluated. A
/// missing trajectory yields zero waypoints, `correct = false` and NaN for
/// every geometric metric; a geometric evaluation error yields NaN for that
/// metric alone.
pub struct MetricComputer<'a> {
    scene: &'a dyn Scene,
    request: &'a MotionRequest,
    metrics: RunMetrics,
}

impl<'a> MetricComputer<'a> {
    pub fn new(scene: &'a dyn Scene, request: &'a MotionRequest, metrics: RunMetrics) -> Self {
        Self {
            scene,
            request,
            metrics,
        }
    }

    /// Builds the metric map for a trial's trajectory.
    pub fn compute(&self, trajectory: Option<&RobotTrajectory>) -> MetricMap {
        let mut map = MetricMap::new();

        if self.metrics.contains(RunMetrics::WAYPOINTS) {
            let count = trajectory.map(|t| t.waypoint_count()).unwrap_or(0);
            map.insert(WAYPOINTS.to_string(), MetricValue::Int(count as i64));
        }
        if self.metrics.contains(RunMetrics::CORRECT) {
            let correct = trajectory.is_some_and(|t| self.is_correct(t));
            map.insert(CORRECT.to_string(), MetricValue::Bool(correct));
        }
        if self.metrics.contains(RunMetrics::LENGTH) {
            let length = self.evaluate(LENGTH, trajectory, geometry::path_length);
            map.insert(LENGTH.to_string(), MetricValue::Real(length));
        }
        if self.metrics.contains(RunMetrics::CLEARANCE) {
            let clearance = self.evaluate(CLEARANCE, trajectory, |t| {
                geometry::average_clearance(self.scene, t)
            });
            map.insert(CLEARANCE.to_string(), MetricValue::Real(clearance));
        }
        if self.metrics.contains(RunMetrics::SMOOTHNESS) {
            let smoothness = self.evaluate(SMOOTHNESS, trajectory, geometry::smoothness);
            map.insert(SMOOTHNESS.to_string(), MetricValue::Real(smoothness));
        }

        map
    }

    /// Checks the trajectory against the scene and the request, regardless
    /// of what the planner claimed.
    ///
    /// Every waypoint must be a valid state and respect the path constraints,
    /// and the final waypoint must lie in the goal region.
    pub fn is_correct(&self, trajectory: &RobotTrajectory) -> bool {
        let Some(last) = trajectory.last_waypoint() else {
            return false;
        };
        self.scene.is_path_valid(trajectory)
            && trajectory
                .waypoints()
                .all(|p| self.request.path_constraints_satisfied(p))
            && self.request.goal_satisfied(last)
    }

    fn evaluate<F>(&self, metric: &str, trajectory: Option<&RobotTrajectory>, f: F) -> f64
    where
        F: FnOnce(&RobotTrajectory) -> Result<f64, GeometryError>,
    {
        let Some(trajectory) = trajectory else {
            return f64::NAN;
        };
        match f(trajectory) {
            Ok(value) => value,
            Err(err) => {
                warn!(event = "metric_error", metric, error = %err, "Metric evaluation failed");
                f64::NAN
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionbench_test::planner::interpolate;
    use motionbench_test::request::{constrained_request, reach_goal_request};
    use motionbench_test::scene::{corner_scene, BoxScene};

    fn keys(map: &MetricMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_text_form() {
        assert_eq!(MetricValue::Int(-3).to_string(), "-3");
        assert_eq!(MetricValue::Bool(false).to_string(), "0");
        assert_eq!(MetricValue::Real(1.5).to_string(), "1.5");
        assert_eq!(MetricValue::Real(f64::INFINITY).to_string(), format_real(f64::MAX));
        assert_eq!(MetricValue::Real(f64::NEG_INFINITY).to_string(), format_real(f64::MAX));
    }

    #[test]
    fn test_text_form_parses_back() {
        let text = MetricValue::Real(f64::NAN).to_string();
        assert_eq!(text.parse::<f64>().unwrap(), f64::MAX);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(MetricValue::Bool(true).type_name(), "BOOLEAN");
        assert_eq!(MetricValue::Int(1).type_name(), "INT");
        assert_eq!(MetricValue::Real(1.0).type_name(), "REAL");
    }

    #[test]
    fn test_json_clamps_non_finite() {
        let json = serde_json::to_string(&MetricValue::Real(f64::NAN)).unwrap();
        let back: MetricValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MetricValue::Real(f64::MAX));
    }

    #[test]
    fn test_json_keeps_tags() {
        let values = vec![MetricValue::Bool(true), MetricValue::Int(5), MetricValue::Real(2.5)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, "[true,5,2.5]");
        let back: Vec<MetricValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_compute_all_metrics() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let trajectory = interpolate(&request, 3);
        let map = MetricComputer::new(&scene, &request, RunMetrics::ALL).compute(Some(&trajectory));

        assert_eq!(keys(&map), vec!["waypoints", "correct", "length", "clearance", "smoothness"]);
        assert_eq!(map[WAYPOINTS], MetricValue::Int(3));
        assert_eq!(map[CORRECT], MetricValue::Bool(true));
        let length = map[LENGTH].as_real().unwrap();
        assert!((length - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(map[CLEARANCE].as_real().unwrap() > 0.0);
        assert!(map[SMOOTHNESS].as_real().unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_compute_respects_mask() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let trajectory = interpolate(&request, 3);
        let map = MetricComputer::new(&scene, &request, RunMetrics::WAYPOINTS | RunMetrics::CORRECT)
            .compute(Some(&trajectory));
        assert_eq!(keys(&map), vec!["waypoints", "correct"]);

        let map = MetricComputer::new(&scene, &request, RunMetrics::PATH).compute(Some(&trajectory));
        assert!(map.is_empty());
    }

    #[test]
    fn test_compute_without_trajectory() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let map = MetricComputer::new(&scene, &request, RunMetrics::ALL).compute(None);

        assert_eq!(map[WAYPOINTS], MetricValue::Int(0));
        assert_eq!(map[CORRECT], MetricValue::Bool(false));
        for key in [LENGTH, CLEARANCE, SMOOTHNESS] {
            assert!(map[key].as_real().unwrap().is_nan());
            assert_eq!(map[key].to_string(), format_real(f64::MAX));
        }
    }

    #[test]
    fn test_geometry_error_degrades_single_metric() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let trajectory = RobotTrajectory::from_waypoints(
            "arm",
            vec!["j0".into(), "j1".into()],
            vec![vec![0.0, 0.0], vec![0.5], vec![1.0, 1.0]],
        );
        let map = MetricComputer::new(&scene, &request, RunMetrics::ALL).compute(Some(&trajectory));

        assert_eq!(map[WAYPOINTS], MetricValue::Int(3));
        assert!(map[LENGTH].as_real().unwrap().is_nan());
        assert!(map[SMOOTHNESS].as_real().unwrap().is_nan());
    }

    #[test]
    fn test_incorrect_through_obstacle() {
        let scene = BoxScene::new("pillar").with_box(vec![0.4, 0.4], vec![0.6, 0.6]);
        let request = reach_goal_request();
        let trajectory = interpolate(&request, 3);
        let computer = MetricComputer::new(&scene, &request, RunMetrics::CORRECT);
        assert!(!computer.is_correct(&trajectory));
    }

    #[test]
    fn test_incorrect_short_of_goal() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let trajectory = RobotTrajectory::from_waypoints(
            "arm",
            vec!["j0".into(), "j1".into()],
            vec![vec![0.0, 0.0], vec![0.5, 0.5]],
        );
        let computer = MetricComputer::new(&scene, &request, RunMetrics::CORRECT);
        assert!(!computer.is_correct(&trajectory));
    }

    #[test]
    fn test_incorrect_violating_path_constraint() {
        let scene = corner_scene();
        let request = constrained_request();
        let trajectory = interpolate(&request, 3);
        let computer = MetricComputer::new(&scene, &request, RunMetrics::CORRECT);
        assert!(!computer.is_correct(&trajectory));
    }

    #[test]
    fn test_empty_trajectory_is_incorrect() {
        let scene = corner_scene();
        let request = reach_goal_request();
        let computer = MetricComputer::new(&scene, &request, RunMetrics::CORRECT);
        assert!(!computer.is_correct(&RobotTrajectory::default()));
    }
}
