//! Planner interface.

use thiserror::Error;

use crate::request::MotionRequest;
use crate::scene::Scene;
use crate::trajectory::RobotTrajectory;

/// Error raised when a planner cannot be invoked at all.
///
/// A planner that runs but finds no solution should return a
/// [`PlanResponse::failure`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("planner not configured: {0}")]
    NotConfigured(String),

    #[error("planner failure: {0}")]
    Internal(String),
}

/// Outcome of a single planning attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanResponse {
    /// Whether the planner claims success.
    pub success: bool,
    /// The planned trajectory, present on success.
    pub trajectory: Option<RobotTrajectory>,
    /// Optional diagnostic message from the planner.
    pub message: Option<String>,
}

impl PlanResponse {
    /// A successful response carrying a trajectory.
    pub fn success(trajectory: RobotTrajectory) -> Self {
        Self {
            success: true,
            trajectory: Some(trajectory),
            message: None,
        }
    }

    /// A response for a planner that ran but found no solution.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            trajectory: None,
            message: Some(message.into()),
        }
    }

    /// True only if the planner claims success and produced a trajectory.
    pub fn is_solved(&self) -> bool {
        self.success && self.trajectory.is_some()
    }
}

/// A motion planning algorithm.
///
/// Planners are shared across every run of a benchmark and invoked
/// sequentially. Any internal state carried from one run to the next is the
/// planner's own concern.
pub trait Planner: Send + Sync {
    /// Name identifying the planner configuration.
    fn name(&self) -> &str;

    /// Plans `request` in `scene`. `run` is the 0-based trial index.
    fn plan(
        &self,
        scene: &dyn Scene,
        request: &MotionRequest,
        run: usize,
    ) -> Result<PlanResponse, PlannerError>;
}
