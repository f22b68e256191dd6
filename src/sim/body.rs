//! Physical state shared by every entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Footprint, Mask, Rect};
use crate::Direction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    pub velocity: Vec2,
    pub direction: Direction,
    /// Derived every tick by the collision resolver
    pub on_ground: bool,
    /// Render hint; has no effect on the simulation
    pub visible: bool,
    /// Opaque pixels of the current image (None = the whole rect is solid)
    #[serde(skip)]
    pub mask: Option<Mask>,
}

impl Body {
    pub fn new(rect: Rect, direction: Direction) -> Self {
        Self {
            rect,
            velocity: Vec2::ZERO,
            direction,
            on_ground: false,
            visible: true,
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    #[inline]
    pub fn footprint(&self) -> Footprint<'_> {
        Footprint::new(self.rect, self.mask.as_ref())
    }

    /// Footprint of this body if it were moved by `delta`
    #[inline]
    pub fn footprint_at(&self, delta: Vec2) -> Footprint<'_> {
        Footprint::new(self.rect.translated(delta), self.mask.as_ref())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.footprint().overlaps(&other.footprint())
    }

    /// True if `other` lies on the side this body is facing (left edges compared)
    pub fn is_facing(&self, other: &Body) -> bool {
        (other.rect.left() - self.rect.left()) * self.direction.sign() >= 0.0
    }

    pub fn turn_around(&mut self) {
        self.direction = self.direction.flipped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_facing() {
        let looker = Body::new(Rect::new(100.0, 0.0, 10.0, 10.0), Direction::Right);
        let ahead = Body::new(Rect::new(150.0, 0.0, 10.0, 10.0), Direction::Left);
        let behind = Body::new(Rect::new(50.0, 0.0, 10.0, 10.0), Direction::Left);
        assert!(looker.is_facing(&ahead));
        assert!(!looker.is_facing(&behind));

        let mut turned = looker.clone();
        turned.turn_around();
        assert!(turned.is_facing(&behind));
        // Same column counts as facing either way
        let stacked = Body::new(Rect::new(100.0, -50.0, 10.0, 10.0), Direction::Left);
        assert!(turned.is_facing(&stacked));
        assert!(looker.is_facing(&stacked));
    }
}
