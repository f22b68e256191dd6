//! Side-scrolling camera
//!
//! The camera keeps an offset between world and screen space. Each axis
//! scrolls by its own mode; [`Camera::apply`] moves a world rect into the
//! camera frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;

/// Horizontal scrolling
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HorizontalMode {
    /// Keep the target at a fixed spot in the frame
    #[default]
    Follow,
    /// Follow, but never show anything left of `left` or right of `right`
    Bordered { left: f32, right: f32 },
    /// Scroll at a constant speed regardless of the target
    Auto { speed: f32 },
}

/// Vertical scrolling
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum VerticalMode {
    #[default]
    Fixed,
    /// Scroll only once the target moved further than a threshold, never
    /// showing anything above `upper` or below `lower`
    Bordered {
        upper: f32,
        lower: f32,
        upper_threshold: f32,
        lower_threshold: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
    /// World position of the frame's top-left corner
    pub offset: Vec2,
    /// Target position in the frame, relative to the offset (negated)
    pub anchor: Vec2,
    pub horizontal: HorizontalMode,
    pub vertical: VerticalMode,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
            anchor: Vec2::new(-0.4 * width, -0.4 * height),
            horizontal: HorizontalMode::default(),
            vertical: VerticalMode::default(),
        }
    }

    pub fn with_modes(mut self, horizontal: HorizontalMode, vertical: VerticalMode) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Update the offset for a target centred at `target`
    pub fn scroll(&mut self, target: Vec2) {
        match self.horizontal {
            HorizontalMode::Follow => self.offset.x = target.x + self.anchor.x,
            HorizontalMode::Bordered { left, right } => {
                self.offset.x = (target.x + self.anchor.x)
                    .max(left)
                    .min(right - self.width);
            }
            HorizontalMode::Auto { speed } => self.offset.x += speed,
        }

        if let VerticalMode::Bordered {
            upper,
            lower,
            upper_threshold,
            lower_threshold,
        } = self.vertical
        {
            let desired = target.y + self.anchor.y;
            let diff = desired - self.offset.y;
            if diff < -upper_threshold {
                self.offset.y = desired + upper_threshold;
            } else if diff > lower_threshold {
                self.offset.y = desired - lower_threshold;
            }
            self.offset.y = self.offset.y.max(upper).min(lower - self.height);
        }
    }

    /// `rect` in screen space
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.translated(-self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_keeps_target_at_anchor() {
        let mut camera = Camera::new(1000.0, 500.0);
        camera.scroll(Vec2::new(1200.0, 300.0));
        assert_eq!(camera.offset.x, 800.0);
        // Fixed vertical axis
        assert_eq!(camera.offset.y, 0.0);

        let on_screen = camera.apply(Rect::new(1200.0, 300.0, 10.0, 10.0));
        assert_eq!(on_screen.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_bordered_never_shows_past_borders() {
        let mut camera = Camera::new(1000.0, 500.0).with_modes(
            HorizontalMode::Bordered {
                left: 0.0,
                right: 3000.0,
            },
            VerticalMode::Fixed,
        );
        camera.scroll(Vec2::new(100.0, 0.0));
        assert_eq!(camera.offset.x, 0.0);
        camera.scroll(Vec2::new(2900.0, 0.0));
        assert_eq!(camera.offset.x, 2000.0);
        camera.scroll(Vec2::new(1500.0, 0.0));
        assert_eq!(camera.offset.x, 1100.0);
    }

    #[test]
    fn test_auto_scrolls_without_target() {
        let mut camera = Camera::new(1000.0, 500.0)
            .with_modes(HorizontalMode::Auto { speed: 3.0 }, VerticalMode::Fixed);
        for _ in 0..10 {
            camera.scroll(Vec2::ZERO);
        }
        assert_eq!(camera.offset.x, 30.0);
    }

    #[test]
    fn test_vertical_thresholds() {
        let mut camera = Camera::new(1000.0, 500.0).with_modes(
            HorizontalMode::Follow,
            VerticalMode::Bordered {
                upper: -1000.0,
                lower: 1000.0,
                upper_threshold: 50.0,
                lower_threshold: 80.0,
            },
        );
        // desired = y - 200
        camera.scroll(Vec2::new(0.0, 230.0));
        assert_eq!(camera.offset.y, 0.0);

        // Small moves inside the dead band are ignored
        camera.scroll(Vec2::new(0.0, 270.0));
        assert_eq!(camera.offset.y, 0.0);

        camera.scroll(Vec2::new(0.0, 400.0));
        assert_eq!(camera.offset.y, 120.0);

        camera.scroll(Vec2::new(0.0, 100.0));
        assert_eq!(camera.offset.y, -50.0);

        // Lower border: offset + height never passes 1000
        camera.scroll(Vec2::new(0.0, 5000.0));
        assert_eq!(camera.offset.y, 500.0);
    }
}
