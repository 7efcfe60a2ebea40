//! Node element - a point in the plane carrying the current displacement

use serde::{Deserialize, Serialize};

/// A 2D node in the finite element model
///
/// The surrounding solver owns the node list and overwrites the
/// displacement between element evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,

    /// Displacement in X
    #[serde(default)]
    pub u: f64,
    /// Displacement in Y
    #[serde(default)]
    pub v: f64,
    /// Rotation about Z (counter-clockwise positive)
    #[serde(default)]
    pub theta: f64,
}

impl Node {
    /// Create an undisplaced node at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_displacement(mut self, u: f64, v: f64, theta: f64) -> Self {
        self.set_displacement(u, v, theta);
        self
    }

    pub fn set_displacement(&mut self, u: f64, v: f64, theta: f64) {
        self.u = u;
        self.v = v;
        self.theta = theta;
    }

    /// Displacement as [UX, UY, RZ]
    pub fn displacement(&self) -> [f64; 3] {
        [self.u, self.v, self.theta]
    }

    /// Position after displacement
    pub fn current_position(&self) -> [f64; 2] {
        [self.x + self.u, self.y + self.v]
    }
}
