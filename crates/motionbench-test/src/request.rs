//! Canned motion requests.

use motionbench_core::{JointConstraint, MotionRequest};

/// 2-DOF request from the origin to `(1, 1)`.
pub fn reach_goal_request() -> MotionRequest {
    MotionRequest::new("arm", vec![0.0, 0.0], vec![1.0, 1.0])
        .with_planner_id("linear")
        .with_goal_tolerance(1e-6)
        .with_allowed_planning_time(2.0)
}

/// Same as [`reach_goal_request`] but keeps joint 0 within `[0, 0.5]`,
/// which a straight line to the goal violates.
pub fn constrained_request() -> MotionRequest {
    reach_goal_request().with_constraint(JointConstraint::new(0, 0.0, 0.5))
}
