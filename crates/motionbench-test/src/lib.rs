//! Shared test fixtures for motionbench crates.
//!
//! - [`scene`] - box-obstacle scenes
//! - [`planner`] - deterministic, randomized and scripted planners
//! - [`request`] - canned motion requests
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! motionbench-test = { workspace = true }
//! ```

pub mod planner;
pub mod request;
pub mod scene;

pub use planner::{FixedPlanner, JitterPlanner, LinearPlanner, Outcome, ScriptedPlanner};
pub use request::{constrained_request, reach_goal_request};
pub use scene::{corner_scene, empty_scene, BoxScene};
