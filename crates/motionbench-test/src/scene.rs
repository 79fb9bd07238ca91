//! Box-obstacle scene fixtures.
//!
//! Obstacles are axis-aligned boxes in joint space, which keeps validity and
//! clearance queries exact and cheap.
//!
//! # Example
//!
//! ```
//! use motionbench_core::Scene;
//! use motionbench_test::scene::BoxScene;
//!
//! let scene = BoxScene::new("pillar").with_box(vec![0.4, 0.4], vec![0.6, 0.6]);
//! assert!(!scene.is_state_valid(&[0.5, 0.5]));
//! assert!(scene.is_state_valid(&[0.0, 0.0]));
//! ```

use motionbench_core::Scene;

/// An axis-aligned box obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBox {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl AxisBox {
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: &[f64]) -> bool {
        p.iter()
            .zip(self.min.iter().zip(&self.max))
            .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Signed distance: positive outside the box, negative inside.
    pub fn signed_distance(&self, p: &[f64]) -> f64 {
        if self.contains(p) {
            let depth = p
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .map(|(v, (lo, hi))| (v - lo).min(hi - v))
                .fold(f64::INFINITY, f64::min);
            return -depth;
        }
        p.iter()
            .zip(self.min.iter().zip(&self.max))
            .map(|(v, (lo, hi))| {
                let d = (lo - v).max(0.0).max(v - hi);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// A scene made of box obstacles.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    name: String,
    boxes: Vec<AxisBox>,
}

impl BoxScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boxes: Vec::new(),
        }
    }

    /// Adds an obstacle spanning `min..=max`.
    pub fn with_box(mut self, min: Vec<f64>, max: Vec<f64>) -> Self {
        self.boxes.push(AxisBox::new(min, max));
        self
    }

    pub fn boxes(&self) -> &[AxisBox] {
        &self.boxes
    }
}

impl Scene for BoxScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_state_valid(&self, positions: &[f64]) -> bool {
        positions.iter().all(|v| v.is_finite()) && !self.boxes.iter().any(|b| b.contains(positions))
    }

    fn distance_to_collision(&self, positions: &[f64]) -> f64 {
        self.boxes
            .iter()
            .map(|b| b.signed_distance(positions))
            .fold(f64::INFINITY, f64::min)
    }
}

/// An empty 2-DOF scene.
pub fn empty_scene() -> BoxScene {
    BoxScene::new("empty")
}

/// A 2-DOF scene with a single box far from the unit square diagonal.
pub fn corner_scene() -> BoxScene {
    BoxScene::new("corner").with_box(vec![2.0, -1.0], vec![3.0, 0.0])
}
