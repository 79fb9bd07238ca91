//! Planner fixtures.
//!
//! - [`LinearPlanner`] - interpolates start to goal, always succeeds
//! - [`JitterPlanner`] - seeded random detours around the straight line
//! - [`FixedPlanner`] - returns the same trajectory every run
//! - [`ScriptedPlanner`] - cycles through scripted outcomes
//!
//! Every fixture counts its invocations so tests can assert how often the
//! benchmarker called it.

use std::sync::atomic::{AtomicUsize, Ordering};

use motionbench_core::{MotionRequest, PlanResponse, Planner, PlannerError, RobotTrajectory, Scene};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Joint names `j0..jn` for an `n`-DOF group.
pub fn joint_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("j{}", i)).collect()
}

/// Straight joint-space interpolation from the request start to its goal.
pub fn interpolate(request: &MotionRequest, waypoints: usize) -> RobotTrajectory {
    let n = waypoints.max(2);
    let start = &request.start;
    let goal = &request.goal.positions;
    let points = (0..n).map(|i| {
        let t = i as f64 / (n - 1) as f64;
        start
            .iter()
            .zip(goal)
            .map(|(s, g)| s + (g - s) * t)
            .collect::<Vec<f64>>()
    });
    RobotTrajectory::from_waypoints(&request.group, joint_names(start.len()), points)
}

/// Always succeeds with a straight line of a fixed number of waypoints.
#[derive(Debug)]
pub struct LinearPlanner {
    name: String,
    waypoints: usize,
    calls: AtomicUsize,
}

impl LinearPlanner {
    pub fn new(name: impl Into<String>, waypoints: usize) -> Self {
        Self {
            name: name.into(),
            waypoints,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `plan` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Planner for LinearPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(
        &self,
        _scene: &dyn Scene,
        request: &MotionRequest,
        _run: usize,
    ) -> Result<PlanResponse, PlannerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.start.len() != request.goal.positions.len() {
            return Err(PlannerError::InvalidRequest(
                "start and goal differ in dimension".to_string(),
            ));
        }
        Ok(PlanResponse::success(interpolate(request, self.waypoints)))
    }
}

/// Perturbs interior waypoints of a straight line, seeded per run.
///
/// Two planners with the same seed produce identical trajectories for the
/// same run index.
#[derive(Debug)]
pub struct JitterPlanner {
    name: String,
    waypoints: usize,
    amplitude: f64,
    seed: u64,
    calls: AtomicUsize,
}

impl JitterPlanner {
    pub fn new(name: impl Into<String>, waypoints: usize, amplitude: f64, seed: u64) -> Self {
        Self {
            name: name.into(),
            waypoints,
            amplitude,
            seed,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Planner for JitterPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(
        &self,
        _scene: &dyn Scene,
        request: &MotionRequest,
        run: usize,
    ) -> Result<PlanResponse, PlannerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(run as u64));
        let mut trajectory = interpolate(request, self.waypoints);
        let last = trajectory.points.len() - 1;
        for point in &mut trajectory.points[1..last] {
            for v in &mut point.positions {
                *v += rng.random_range(-self.amplitude..=self.amplitude);
            }
        }
        Ok(PlanResponse::success(trajectory))
    }
}

/// Returns a clone of the same trajectory for every run.
#[derive(Debug)]
pub struct FixedPlanner {
    name: String,
    trajectory: RobotTrajectory,
    calls: AtomicUsize,
}

impl FixedPlanner {
    pub fn new(name: impl Into<String>, trajectory: RobotTrajectory) -> Self {
        Self {
            name: name.into(),
            trajectory,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Planner for FixedPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(
        &self,
        _scene: &dyn Scene,
        _request: &MotionRequest,
        _run: usize,
    ) -> Result<PlanResponse, PlannerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PlanResponse::success(self.trajectory.clone()))
    }
}

/// One scripted planning outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Straight-line solution.
    Solve,
    /// Planner runs but reports no solution.
    NoSolution,
    /// Planner invocation fails.
    Error,
}

/// Cycles through a script of outcomes, indexed by run.
///
/// # Example
///
/// ```
/// use motionbench_core::Planner;
/// use motionbench_test::planner::{Outcome, ScriptedPlanner};
/// use motionbench_test::request::reach_goal_request;
/// use motionbench_test::scene::empty_scene;
///
/// let planner = ScriptedPlanner::new("flaky", vec![Outcome::Solve, Outcome::NoSolution]);
/// let scene = empty_scene();
/// let request = reach_goal_request();
///
/// assert!(planner.plan(&scene, &request, 0).unwrap().success);
/// assert!(!planner.plan(&scene, &request, 1).unwrap().success);
/// assert!(planner.plan(&scene, &request, 2).unwrap().success);
/// ```
#[derive(Debug)]
pub struct ScriptedPlanner {
    name: String,
    script: Vec<Outcome>,
    calls: AtomicUsize,
}

impl ScriptedPlanner {
    pub fn new(name: impl Into<String>, script: Vec<Outcome>) -> Self {
        Self {
            name: name.into(),
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// A planner that never finds a solution.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, vec![Outcome::NoSolution])
    }

    /// A planner whose every invocation errors.
    pub fn erroring(name: impl Into<String>) -> Self {
        Self::new(name, vec![Outcome::Error])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Planner for ScriptedPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(
        &self,
        _scene: &dyn Scene,
        request: &MotionRequest,
        run: usize,
    ) -> Result<PlanResponse, PlannerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = if self.script.is_empty() {
            Outcome::Solve
        } else {
            self.script[run % self.script.len()]
        };
        match outcome {
            Outcome::Solve => Ok(PlanResponse::success(interpolate(request, 4))),
            Outcome::NoSolution => Ok(PlanResponse::failure("no solution found")),
            Outcome::Error => Err(PlannerError::Internal(format!("scripted error at run {}", run))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::reach_goal_request;
    use crate::scene::empty_scene;

    #[test]
    fn test_interpolate_endpoints() {
        let request = reach_goal_request();
        let trajectory = interpolate(&request, 5);
        assert_eq!(trajectory.waypoint_count(), 5);
        assert_eq!(trajectory.waypoint(0), Some(request.start.as_slice()));
        assert_eq!(trajectory.last_waypoint(), Some(request.goal.positions.as_slice()));
    }

    #[test]
    fn test_jitter_is_reproducible_per_run() {
        let scene = empty_scene();
        let request = reach_goal_request();
        let a = JitterPlanner::new("a", 6, 0.1, 7);
        let b = JitterPlanner::new("b", 6, 0.1, 7);

        let ta = a.plan(&scene, &request, 3).unwrap().trajectory.unwrap();
        let tb = b.plan(&scene, &request, 3).unwrap().trajectory.unwrap();
        assert_eq!(ta, tb);

        let tc = a.plan(&scene, &request, 4).unwrap().trajectory.unwrap();
        assert_ne!(ta, tc);
        assert_eq!(a.calls(), 2);
    }

    #[test]
    fn test_jitter_keeps_endpoints() {
        let scene = empty_scene();
        let request = reach_goal_request();
        let planner = JitterPlanner::new("j", 5, 0.2, 1);
        let trajectory = planner.plan(&scene, &request, 0).unwrap().trajectory.unwrap();
        assert_eq!(trajectory.waypoint(0), Some(request.start.as_slice()));
        assert_eq!(trajectory.last_waypoint(), Some(request.goal.positions.as_slice()));
    }

    #[test]
    fn test_scripted_error() {
        let planner = ScriptedPlanner::erroring("broken");
        let result = planner.plan(&empty_scene(), &reach_goal_request(), 0);
        assert!(matches!(result, Err(PlannerError::Internal(_))));
    }
}
