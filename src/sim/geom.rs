//! Rectangles and pixel masks
//!
//! Every body occupies an axis-aligned rectangle (top-left + size, y grows
//! downward). Bodies that carry a [`Mask`] only collide where their opaque
//! pixels overlap, so transparent image margins never block movement.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }

    /// Copy of this rect moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// True if the rects share interior area. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right() - CONTACT_EPSILON
            && other.left() < self.right() - CONTACT_EPSILON
            && self.top() < other.bottom() - CONTACT_EPSILON
            && other.top() < self.bottom() - CONTACT_EPSILON
    }

    /// Pixel-grid origin used for mask comparisons
    #[inline]
    fn origin(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }
}

/// Bitmap of opaque pixels, row-major, sized like the image it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by asking `opaque(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, opaque: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque rectangle
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    /// Filled ellipse inscribed in `width × height`
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| inside_ellipse(x, y, rx, ry, rx, ry))
    }

    /// Upper half of an ellipse of `width × 2·height`; `flip` gives the lower half
    pub fn semi_ellipse(width: u32, height: u32, flip: bool) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32;
        Self::from_fn(width, height, |x, y| {
            let row = if flip { height - 1 - y } else { y };
            inside_ellipse(x, row, rx, ry, rx, ry)
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at local pixel coordinates (outside the bitmap is transparent)
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// Pixel-centre test against an ellipse with centre (cx, cy) and semi-axes (rx, ry)
#[inline]
fn inside_ellipse(x: u32, y: u32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (x as f32 + 0.5 - cx) / rx;
    let dy = (y as f32 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// What a body or zone actually occupies: its rect, refined by a mask if any
#[derive(Debug, Clone, Copy)]
pub struct Footprint<'a> {
    pub rect: Rect,
    pub mask: Option<&'a Mask>,
}

impl<'a> Footprint<'a> {
    pub fn new(rect: Rect, mask: Option<&'a Mask>) -> Self {
        Self { rect, mask }
    }

    fn extent(&self) -> IVec2 {
        match self.mask {
            Some(mask) => IVec2::new(mask.width as i32, mask.height as i32),
            None => self.rect.size.round().as_ivec2(),
        }
    }

    fn covers(&self, origin: IVec2, pixel: IVec2) -> bool {
        let local = pixel - origin;
        match self.mask {
            Some(mask) => mask.get(local.x, local.y),
            None => {
                let extent = self.extent();
                local.x >= 0 && local.y >= 0 && local.x < extent.x && local.y < extent.y
            }
        }
    }

    /// Rect overlap, refined pixel by pixel when either side has a mask
    pub fn overlaps(&self, other: &Footprint<'_>) -> bool {
        if !self.rect.intersects(&other.rect) {
            return false;
        }
        if self.mask.is_none() && other.mask.is_none() {
            return true;
        }

        let a = self.rect.origin();
        let b = other.rect.origin();
        let lo = a.max(b);
        let hi = (a + self.extent()).min(b + other.extent());
        for y in lo.y..hi.y {
            for x in lo.x..hi.x {
                let pixel = IVec2::new(x, y);
                if self.covers(a, pixel) && other.covers(b, pixel) {
                    return true;
                }
            }
        }
        false
    }
}
