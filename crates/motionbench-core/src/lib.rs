//! Core interfaces for motionbench.
//!
//! The benchmarking engine treats scenes, planners and requests as external
//! collaborators. This crate defines the interfaces it consumes:
//!
//! - [`Scene`] - environment queried for validity and obstacle clearance
//! - [`Planner`] - produces a [`PlanResponse`] for one trial
//! - [`MotionRequest`] - start, goal and path constraints
//! - [`RobotTrajectory`] - the planner's output message
//! - [`geometry`] - length, smoothness and clearance evaluators

pub mod geometry;
pub mod planner;
pub mod request;
pub mod scene;
pub mod trajectory;

pub use geometry::GeometryError;
pub use planner::{PlanResponse, Planner, PlannerError};
pub use request::{JointConstraint, JointGoal, MotionRequest};
pub use scene::Scene;
pub use trajectory::{JointTrajectoryPoint, RobotTrajectory};
