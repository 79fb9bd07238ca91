//! Robot trajectory message types.
//!
//! These mirror the joint-trajectory message used by planning frameworks:
//! a named planning group, its joint names, and a time-parameterized list
//! of waypoints. The trajectory archive stores them verbatim.

use serde::{Deserialize, Serialize};

/// A single waypoint of a joint trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointTrajectoryPoint {
    /// Joint positions, one per entry of [`RobotTrajectory::joint_names`].
    pub positions: Vec<f64>,
    /// Joint velocities (may be empty).
    #[serde(default)]
    pub velocities: Vec<f64>,
    /// Joint accelerations (may be empty).
    #[serde(default)]
    pub accelerations: Vec<f64>,
    /// Seconds since the start of the trajectory.
    #[serde(default)]
    pub time_from_start: f64,
}

impl JointTrajectoryPoint {
    /// Creates a point with positions only.
    pub fn new(positions: Vec<f64>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Sets the time from start.
    pub fn at(mut self, time_from_start: f64) -> Self {
        self.time_from_start = time_from_start;
        self
    }
}

/// An ordered sequence of robot configurations produced by a planner.
///
/// # Example
///
/// ```
/// use motionbench_core::RobotTrajectory;
///
/// let trajectory = RobotTrajectory::new("arm", vec!["j1".into(), "j2".into()])
///     .with_waypoint(vec![0.0, 0.0])
///     .with_waypoint(vec![1.0, 0.5]);
///
/// assert_eq!(trajectory.waypoint_count(), 2);
/// assert_eq!(trajectory.waypoint(1), Some(&[1.0, 0.5][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotTrajectory {
    /// Planning group the trajectory was computed for.
    pub group: String,
    /// Joint names, in position order.
    pub joint_names: Vec<String>,
    /// Waypoints, in execution order.
    pub points: Vec<JointTrajectoryPoint>,
}

impl RobotTrajectory {
    /// Creates an empty trajectory for the given group and joints.
    pub fn new(group: impl Into<String>, joint_names: Vec<String>) -> Self {
        Self {
            group: group.into(),
            joint_names,
            points: Vec::new(),
        }
    }

    /// Builds a trajectory from raw waypoints, spacing them one second apart.
    pub fn from_waypoints(
        group: impl Into<String>,
        joint_names: Vec<String>,
        waypoints: impl IntoIterator<Item = Vec<f64>>,
    ) -> Self {
        let points = waypoints
            .into_iter()
            .enumerate()
            .map(|(i, positions)| JointTrajectoryPoint::new(positions).at(i as f64))
            .collect();
        Self {
            group: group.into(),
            joint_names,
            points,
        }
    }

    /// Appends a waypoint timed one second after the previous one.
    pub fn with_waypoint(mut self, positions: Vec<f64>) -> Self {
        self.push_waypoint(positions);
        self
    }

    /// Appends a waypoint timed one second after the previous one.
    pub fn push_waypoint(&mut self, positions: Vec<f64>) {
        let time = self
            .points
            .last()
            .map(|p| p.time_from_start + 1.0)
            .unwrap_or(0.0);
        self.points.push(JointTrajectoryPoint::new(positions).at(time));
    }

    /// Returns the number of waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the trajectory has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the positions of the waypoint at `index`.
    pub fn waypoint(&self, index: usize) -> Option<&[f64]> {
        self.points.get(index).map(|p| p.positions.as_slice())
    }

    /// Iterates over waypoint positions.
    pub fn waypoints(&self) -> impl Iterator<Item = &[f64]> {
        self.points.iter().map(|p| p.positions.as_slice())
    }

    /// Returns the positions of the final waypoint.
    pub fn last_waypoint(&self) -> Option<&[f64]> {
        self.points.last().map(|p| p.positions.as_slice())
    }

    /// Returns the duration of the trajectory in seconds.
    pub fn duration(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.time_from_start)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_waypoint_times() {
        let mut trajectory = RobotTrajectory::new("arm", vec!["j1".into()]);
        trajectory.push_waypoint(vec![0.0]);
        trajectory.push_waypoint(vec![1.0]);
        trajectory.push_waypoint(vec![2.0]);

        assert_eq!(trajectory.points[0].time_from_start, 0.0);
        assert_eq!(trajectory.points[2].time_from_start, 2.0);
        assert_eq!(trajectory.duration(), 2.0);
    }

    #[test]
    fn test_empty_trajectory() {
        let trajectory = RobotTrajectory::default();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.waypoint_count(), 0);
        assert_eq!(trajectory.last_waypoint(), None);
        assert_eq!(trajectory.duration(), 0.0);
    }

    #[test]
    fn test_from_waypoints() {
        let trajectory = RobotTrajectory::from_waypoints(
            "arm",
            vec!["j1".into(), "j2".into()],
            vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]],
        );
        assert_eq!(trajectory.waypoint_count(), 3);
        assert_eq!(trajectory.last_waypoint(), Some(&[1.0, 1.0][..]));
        assert_eq!(trajectory.waypoints().count(), 3);
    }
}
