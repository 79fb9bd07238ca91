//! Motion planning request value type.

use serde::{Deserialize, Serialize};

/// Default time budget a planner is allowed per request, in seconds.
pub const DEFAULT_PLANNING_TIME: f64 = 5.0;

/// Default joint-space goal tolerance.
pub const DEFAULT_GOAL_TOLERANCE: f64 = 1e-3;

/// A joint-space goal region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointGoal {
    /// Target joint positions.
    pub positions: Vec<f64>,
    /// Per-joint absolute tolerance.
    pub tolerance: f64,
}

/// Bounds a single joint must stay within along the whole path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConstraint {
    /// Index into the joint vector.
    pub joint: usize,
    pub min: f64,
    pub max: f64,
}

impl JointConstraint {
    pub fn new(joint: usize, min: f64, max: f64) -> Self {
        Self { joint, min, max }
    }

    /// Returns true if the configuration respects this constraint.
    pub fn is_satisfied(&self, positions: &[f64]) -> bool {
        positions
            .get(self.joint)
            .is_some_and(|v| *v >= self.min && *v <= self.max)
    }
}

/// Start, goal and constraints of one planning problem.
///
/// # Example
///
/// ```
/// use motionbench_core::{JointConstraint, MotionRequest};
///
/// let request = MotionRequest::new("arm", vec![0.0, 0.0], vec![1.0, 1.0])
///     .with_planner_id("RRTConnect")
///     .with_goal_tolerance(0.01)
///     .with_constraint(JointConstraint::new(0, -0.5, 1.5));
///
/// assert!(request.goal_satisfied(&[1.005, 0.995]));
/// assert!(!request.goal_satisfied(&[1.1, 1.0]));
/// assert!(!request.path_constraints_satisfied(&[2.0, 0.0]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionRequest {
    /// Identifier of the planner configuration to use.
    pub planner_id: String,
    /// Planning group name.
    pub group: String,
    /// Start configuration.
    pub start: Vec<f64>,
    /// Goal region.
    pub goal: JointGoal,
    /// Path constraints.
    #[serde(default)]
    pub constraints: Vec<JointConstraint>,
    /// Time budget per planning attempt, in seconds.
    pub allowed_planning_time: f64,
}

impl MotionRequest {
    /// Creates a request between two configurations with default tolerance and time budget.
    pub fn new(group: impl Into<String>, start: Vec<f64>, goal: Vec<f64>) -> Self {
        Self {
            planner_id: String::new(),
            group: group.into(),
            start,
            goal: JointGoal {
                positions: goal,
                tolerance: DEFAULT_GOAL_TOLERANCE,
            },
            constraints: Vec::new(),
            allowed_planning_time: DEFAULT_PLANNING_TIME,
        }
    }

    pub fn with_planner_id(mut self, planner_id: impl Into<String>) -> Self {
        self.planner_id = planner_id.into();
        self
    }

    pub fn with_goal_tolerance(mut self, tolerance: f64) -> Self {
        self.goal.tolerance = tolerance;
        self
    }

    pub fn with_constraint(mut self, constraint: JointConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_allowed_planning_time(mut self, seconds: f64) -> Self {
        self.allowed_planning_time = seconds;
        self
    }

    /// Returns true if the configuration lies within the goal tolerance.
    pub fn goal_satisfied(&self, positions: &[f64]) -> bool {
        positions.len() == self.goal.positions.len()
            && positions
                .iter()
                .zip(&self.goal.positions)
                .all(|(v, g)| (v - g).abs() <= self.goal.tolerance)
    }

    /// Returns true if the configuration respects every path constraint.
    pub fn path_constraints_satisfied(&self, positions: &[f64]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(positions))
    }
}
