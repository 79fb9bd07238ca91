//! Planning scene interface.

use std::fmt::Debug;

use crate::trajectory::RobotTrajectory;

/// The environment a request is planned against.
///
/// Scenes are shared read-only across every run of a benchmark. Evaluators
/// consult them for state validity and obstacle distance.
pub trait Scene: Send + Sync + Debug {
    /// Human-readable scene name.
    fn name(&self) -> &str;

    /// Returns true if the configuration is collision-free and within limits.
    fn is_state_valid(&self, positions: &[f64]) -> bool;

    /// Distance from the configuration to the nearest obstacle.
    ///
    /// Negative values indicate penetration.
    fn distance_to_collision(&self, positions: &[f64]) -> f64;

    /// Returns true if every waypoint of the trajectory is a valid state.
    fn is_path_valid(&self, trajectory: &RobotTrajectory) -> bool {
        trajectory.waypoints().all(|p| self.is_state_valid(p))
    }
}
