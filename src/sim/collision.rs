//! Axis-separated collision resolution
//!
//! A moving body first commits its horizontal step, then its vertical step.
//! Each step is checked against the obstacle set on its own, so a wall never
//! changes how a body lands and a floor never stops horizontal motion.
//!
//! When several obstacles overlap at once only the first one in iteration
//! order is used for the correction. A body wedged between two blocks can
//! therefore end up snapped against the "wrong" one; corrections are never
//! stacked.

use glam::Vec2;

use super::body::Body;
use super::geom::Footprint;

/// Distance of the downward ground probe
pub const GROUND_PROBE: f32 = 1.0;

/// First obstacle overlapping `footprint`, in iteration order
pub fn first_overlap<'a>(footprint: &Footprint<'_>, obstacles: &[&'a Body]) -> Option<&'a Body> {
    obstacles
        .iter()
        .copied()
        .find(|obstacle| footprint.overlaps(&obstacle.footprint()))
}

/// Would `body` overlap any obstacle after moving by `delta`?
pub fn is_blocked(body: &Body, delta: Vec2, obstacles: &[&Body]) -> bool {
    first_overlap(&body.footprint_at(delta), obstacles).is_some()
}

/// Apply `velocity.x`. On overlap the step is undone and `velocity.x` zeroed.
///
/// Returns true if the step was blocked. Never touches y or `on_ground`.
pub fn resolve_x(body: &mut Body, obstacles: &[&Body]) -> bool {
    if body.velocity.x == 0.0 {
        return false;
    }
    let previous_x = body.rect.pos.x;
    body.rect.pos.x += body.velocity.x;
    if first_overlap(&body.footprint(), obstacles).is_some() {
        body.rect.pos.x = previous_x;
        body.velocity.x = 0.0;
        return true;
    }
    false
}

/// Apply `velocity.y`, snapping flush against the first obstacle hit.
///
/// Landing (hit while falling) grounds the body. Otherwise `on_ground` comes
/// from a one-pixel probe below the body, so a body resting on a floor with
/// zero vertical speed stays grounded. Returns true if the step was blocked.
pub fn resolve_y(body: &mut Body, obstacles: &[&Body]) -> bool {
    body.rect.pos.y += body.velocity.y;

    let hit = first_overlap(&body.footprint(), obstacles).map(|obstacle| obstacle.rect);
    let blocked = if let Some(obstacle) = hit {
        if body.velocity.y > 0.0 {
            body.rect.set_bottom(obstacle.top());
            body.velocity.y = 0.0;
            body.on_ground = true;
            return true;
        } else if body.velocity.y < 0.0 {
            body.rect.set_top(obstacle.bottom());
            body.velocity.y = 0.0;
        }
        true
    } else {
        false
    };

    body.on_ground = is_blocked(body, Vec2::new(0.0, GROUND_PROBE), obstacles);
    blocked
}

/// Horizontal then vertical resolution for one tick
pub fn move_and_collide(body: &mut Body, obstacles: &[&Body]) {
    resolve_x(body, obstacles);
    resolve_y(body, obstacles);
}
