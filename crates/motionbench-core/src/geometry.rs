//! Joint-space geometry over trajectories.

use std::f64::consts::PI;

use thiserror::Error;

use crate::scene::Scene;
use crate::trajectory::RobotTrajectory;

/// Segments shorter than this are treated as degenerate when measuring curvature.
const SEGMENT_EPSILON: f64 = 1e-12;

/// Error raised by geometric evaluators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("dimension mismatch: expected {expected} joints, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("trajectory has no waypoints")]
    EmptyTrajectory,

    #[error("non-finite joint value at waypoint {0}")]
    NonFinite(usize),
}

/// Euclidean distance between two joint configurations.
///
/// # Example
///
/// ```
/// use motionbench_core::geometry::distance;
///
/// assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
/// assert!(distance(&[0.0], &[1.0, 1.0]).is_err());
/// ```
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64, GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

// Rejects trajectories whose waypoints disagree on dimension or hold NaN/inf.
fn check_waypoints(trajectory: &RobotTrajectory) -> Result<(), GeometryError> {
    let Some(first) = trajectory.waypoint(0) else {
        return Ok(());
    };
    let expected = first.len();
    for (i, positions) in trajectory.waypoints().enumerate() {
        if positions.len() != expected {
            return Err(GeometryError::DimensionMismatch {
                expected,
                found: positions.len(),
            });
        }
        if positions.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite(i));
        }
    }
    Ok(())
}

/// Cumulative joint-space distance along the trajectory.
///
/// An empty or single-waypoint trajectory has length zero.
pub fn path_length(trajectory: &RobotTrajectory) -> Result<f64, GeometryError> {
    check_waypoints(trajectory)?;
    let points: Vec<&[f64]> = trajectory.waypoints().collect();
    points
        .windows(2)
        .map(|w| distance(w[0], w[1]))
        .sum()
}

/// Curvature-based smoothness score; lower is smoother.
///
/// For each interior waypoint with incoming segment `a`, outgoing segment `b`
/// and turning angle `θ`, accumulates `(2θ / (a + b))²`. A straight line
/// scores zero, as does any trajectory with fewer than three waypoints.
pub fn smoothness(trajectory: &RobotTrajectory) -> Result<f64, GeometryError> {
    check_waypoints(trajectory)?;
    let points: Vec<&[f64]> = trajectory.waypoints().collect();

    let mut score = 0.0;
    for w in points.windows(3) {
        let a = distance(w[0], w[1])?;
        let b = distance(w[1], w[2])?;
        let c = distance(w[0], w[2])?;
        if a <= SEGMENT_EPSILON || b <= SEGMENT_EPSILON {
            continue;
        }

        let cos_interior = (a * a + b * b - c * c) / (2.0 * a * b);
        if cos_interior > -1.0 && cos_interior < 1.0 {
            let turn = PI - cos_interior.acos();
            let k = 2.0 * turn / (a + b);
            score += k * k;
        }
    }
    Ok(score)
}

/// Average obstacle clearance sampled at each waypoint.
pub fn average_clearance(
    scene: &dyn Scene,
    trajectory: &RobotTrajectory,
) -> Result<f64, GeometryError> {
    check_waypoints(trajectory)?;
    if trajectory.is_empty() {
        return Err(GeometryError::EmptyTrajectory);
    }
    let total: f64 = trajectory
        .waypoints()
        .map(|positions| scene.distance_to_collision(positions))
        .sum();
    Ok(total / trajectory.waypoint_count() as f64)
}
