//! Owner-relative sensing zones
//!
//! A zone is a shape pinned to its owner's centre (plus an offset). Enemies
//! use zones to decide whether a player is close enough to chase, attack or
//! hit. Zones reference their owner by handle and never keep it alive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::geom::{Footprint, Mask, Rect};
use super::world::EntityId;

/// Zone outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneShape {
    Ellipse,
    /// Upper half of an ellipse twice as tall; `flip` gives the lower half
    SemiEllipse { flip: bool },
    Rectangle,
}

/// Shape, size and placement of a zone relative to its owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub shape: ZoneShape,
    pub width: f32,
    pub height: f32,
    /// Offset of the zone centre from the owner centre
    #[serde(default)]
    pub offset: Vec2,
}

impl ZoneSpec {
    pub fn new(shape: ZoneShape, width: f32, height: f32, offset: Vec2) -> Self {
        Self {
            shape,
            width,
            height,
            offset,
        }
    }

    /// Zone whose flat bottom edge lines up with the bottom of an owner of `owner_height`
    pub fn on_feet(width: f32, height: f32, owner_height: f32) -> Self {
        Self::new(
            ZoneShape::SemiEllipse { flip: false },
            width,
            height,
            Vec2::new(0.0, (owner_height - height) / 2.0),
        )
    }

    fn rasterize(&self) -> Option<Mask> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let width = self.width.round().max(1.0) as u32;
        let height = self.height.round().max(1.0) as u32;
        if width.checked_mul(height).is_none() {
            log::warn!("Zone size {width}x{height} is too large to rasterize");
            return None;
        }
        Some(match self.shape {
            ZoneShape::Ellipse => Mask::ellipse(width, height),
            ZoneShape::SemiEllipse { flip } => Mask::semi_ellipse(width, height, flip),
            ZoneShape::Rectangle => Mask::full(width, height),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    owner: EntityId,
    spec: ZoneSpec,
    rect: Rect,
    /// None for a degenerate zone, which never contains anything
    mask: Option<Mask>,
}

impl Zone {
    pub fn new(owner: EntityId, spec: ZoneSpec, owner_body: &Body) -> Self {
        let mask = spec.rasterize();
        if mask.is_none() {
            log::warn!(
                "Zone {:?} of {:?} has unusable size {}x{}; it will never detect anything",
                spec.shape,
                owner,
                spec.width,
                spec.height
            );
        }
        let mut zone = Self {
            owner,
            spec,
            rect: Rect::new(0.0, 0.0, spec.width.max(0.0), spec.height.max(0.0)),
            mask,
        };
        zone.update_position(owner_body);
        zone
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn spec(&self) -> &ZoneSpec {
        &self.spec
    }

    /// Current placement in world space
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_degenerate(&self) -> bool {
        self.mask.is_none()
    }

    /// Re-centre on the owner
    pub fn update_position(&mut self, owner_body: &Body) {
        self.rect.set_center(owner_body.center() + self.spec.offset);
    }

    /// True if any opaque pixel of `target` lies inside the zone
    pub fn contains(&self, target: &Body) -> bool {
        let Some(mask) = &self.mask else {
            return false;
        };
        Footprint::new(self.rect, Some(mask)).overlaps(&target.footprint())
    }
}
