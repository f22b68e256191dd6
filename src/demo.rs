//! Demo pilot
//!
//! Plays the player character in headless runs. Seeded, so a demo run is
//! reproducible tick for tick.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Direction;
use crate::sim::{Category, EntityId, TickInput, World};

/// Enemies closer than this (horizontally) in front of the player draw fire
const FIRING_RANGE: f32 = 700.0;

#[derive(Debug, Clone)]
pub struct DemoPilot {
    rng: Pcg32,
    heading: Option<Direction>,
    /// Ticks left on the current heading
    hold: u32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            heading: None,
            hold: 0,
        }
    }

    /// Input for `player` this tick; idle once the player is gone
    pub fn next_input(&mut self, world: &World, player: EntityId) -> TickInput {
        let Some(body) = world.body(player) else {
            return TickInput::default();
        };

        if self.hold == 0 {
            self.heading = match self.rng.random_range(0..4) {
                0 => None,
                1 => Some(Direction::Left),
                _ => Some(Direction::Right),
            };
            self.hold = self.rng.random_range(20..90);
            log::trace!("Demo pilot heading {:?} for {} ticks", self.heading, self.hold);
        }
        self.hold -= 1;

        // Walking but not moving: something is in the way
        let stuck = self.heading.is_some() && body.velocity.x == 0.0 && body.on_ground;
        let enemy_ahead = world
            .entities()
            .filter(|entity| entity.category() == Category::Enemy)
            .any(|enemy| {
                let dx = enemy.body().center().x - body.center().x;
                dx.abs() < FIRING_RANGE && dx * body.direction.sign() > 0.0
            });

        TickInput {
            left: self.heading == Some(Direction::Left),
            right: self.heading == Some(Direction::Right),
            jump: stuck || self.rng.random_bool(0.02),
            shoot: enemy_ahead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Rect;
    use glam::Vec2;

    fn world() -> (World, EntityId) {
        let mut world = World::default();
        world.spawn_block(Rect::new(0.0, 600.0, 2000.0, 64.0));
        let player = world.spawn_player(Vec2::new(100.0, 484.0));
        (world, player)
    }

    #[test]
    fn test_same_seed_same_inputs() {
        let (world, player) = world();
        let mut a = DemoPilot::new(7);
        let mut b = DemoPilot::new(7);
        for _ in 0..500 {
            assert_eq!(a.next_input(&world, player), b.next_input(&world, player));
        }
    }

    #[test]
    fn test_shoots_at_enemy_in_front() {
        let (mut world, player) = world();
        world.spawn_sniper(Vec2::new(500.0, 490.0), Direction::Left);
        let mut pilot = DemoPilot::new(1);
        assert!(pilot.next_input(&world, player).shoot);
    }

    #[test]
    fn test_missing_player_gives_idle_input() {
        let (mut world, player) = world();
        world.despawn(player);
        let mut pilot = DemoPilot::new(1);
        assert_eq!(pilot.next_input(&world, player), TickInput::default());
    }
}
