//! Gravity integration and world boundaries

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Pull a body down while it is airborne
#[inline]
pub fn apply_gravity(body: &mut Body, gravity: f32) {
    if !body.on_ground {
        body.velocity.y += gravity;
    }
}

/// Edges of the playable world. Leaving them is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            left: -100.0,
            right: 2660.0,
            top: -1000.0,
            bottom: 1000.0,
        }
    }
}

impl Boundaries {
    /// True once the body has left the world completely
    pub fn is_outside(&self, body: &Body) -> bool {
        let rect = &body.rect;
        rect.right() < self.left
            || rect.left() > self.right
            || rect.bottom() < self.top
            || rect.top() > self.bottom
    }
}

/// Whether `body` fell out of the world; the caller takes its health
#[inline]
pub fn check_boundaries(body: &Body, boundaries: &Boundaries) -> bool {
    boundaries.is_outside(body)
}
