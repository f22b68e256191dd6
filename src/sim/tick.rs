//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: every entity alive at the start of
//! the tick is updated once, in registry order, against the current positions
//! of everyone else. Entities spawned mid-tick first move on the next tick.

use super::world::World;

/// Key snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    // Nothing moves once the game is over
    if !world.running() {
        return;
    }

    for id in world.entity_ids() {
        // Despawned by an earlier update this tick
        let Some(mut entity) = world.check_out(id) else {
            continue;
        };
        entity.update(world, input);
        world.check_in(entity);
    }

    world.sweep_dead();
    world.sync_zones();
    world.advance_clock();
    log::trace!("Tick {} done, {} entities", world.time_ticks(), world.len());
}

impl World {
    /// See [`tick`]. Events are appended to [`World::events`] and stay there
    /// until [`World::drain_events`] is called.
    pub fn tick(&mut self, input: &TickInput) {
        tick(self, input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use crate::sim::geom::Rect;
    use glam::Vec2;

    fn level() -> World {
        let mut world = World::default();
        world.spawn_block(Rect::new(0.0, 600.0, 2000.0, 64.0));
        world.spawn_player(Vec2::new(100.0, 484.0));
        world.spawn_runner(Vec2::new(900.0, 470.0), Direction::Left);
        world.spawn_sniper(Vec2::new(1500.0, 490.0), Direction::Left);
        world
    }

    #[test]
    fn test_stopped_world_does_not_advance() {
        let mut world = level();
        world.stop();
        world.tick(&TickInput::default());
        assert_eq!(world.time_ticks(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = level();
        let mut b = level();
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                shoot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..300 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.time_ticks(), b.time_ticks());
        assert_eq!(a.events(), b.events());
        let rects = |world: &World| -> Vec<Rect> {
            world.entities().map(|entity| entity.body().rect).collect()
        };
        assert_eq!(rects(&a), rects(&b));
    }
}
