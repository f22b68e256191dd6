//! Joda headless runner
//!
//! Builds the demo level, lets the demo pilot play it at a fixed tick rate and
//! logs what happens. Usage: `joda-game [settings.json]`.

use std::error::Error;

use glam::Vec2;

use joda_game::Direction;
use joda_game::Settings;
use joda_game::camera::{Camera, HorizontalMode, VerticalMode};
use joda_game::consts::*;
use joda_game::demo::DemoPilot;
use joda_game::sim::{GameEvent, Rect, World};
use joda_game::tilemap::TileGrid;

/// One minute of play
const MAX_TICKS: u64 = 60 * TICK_RATE as u64;
const DEMO_SEED: u64 = 0x5eed;

const DEMO_LEVEL: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,4,5,5,6,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,0,1,1,2,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,0,1,1,2,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,0,1,1,2,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,0,1,1,2,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
4,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,5,6
0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,2
";

/// Terrain, borders and enemies. Returns the level width.
fn build_level(world: &mut World) -> Result<f32, Box<dyn Error>> {
    let grid = TileGrid::parse(DEMO_LEVEL, ',');
    if grid.height() == 0 {
        return Err("demo level has no rows".into());
    }
    world.spawn_tiles(&grid, GRID_SIZE);

    let width = grid.width() as f32 * GRID_SIZE;
    let floor = 18.0 * GRID_SIZE;
    world.spawn_border(Rect::new(-GRID_SIZE, 0.0, GRID_SIZE, floor));
    world.spawn_border(Rect::new(width, 0.0, GRID_SIZE, floor));

    let settings = world.settings().clone();
    world.spawn_runner(
        Vec2::new(900.0, floor - settings.runner.size.y),
        Direction::Left,
    );
    world.spawn_sniper(
        Vec2::new(width - 120.0, floor - settings.sniper.size.y),
        Direction::Left,
    );
    Ok(width)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Died { id, category } => log::debug!("{category:?} {id:?} removed"),
        GameEvent::Damaged {
            id, by, remaining, ..
        } => log::info!("{id:?} hit by {by:?}, {remaining} health left"),
        GameEvent::StateChanged { id, from, to } => {
            log::debug!("{id:?}: {} -> {to}", from.unwrap_or("none"));
        }
        GameEvent::Shot { by, bullet } => log::trace!("{by:?} fired {bullet:?}"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Joda (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut world = World::new(settings);
    let level_width = build_level(&mut world)?;
    let player = world.spawn_player(Vec2::new(200.0, 18.0 * GRID_SIZE - PLAYER_SIZE.1));

    let mut camera = Camera::new(SCREEN_WIDTH, SCREEN_HEIGHT).with_modes(
        HorizontalMode::Bordered {
            left: 0.0,
            right: level_width.max(SCREEN_WIDTH),
        },
        VerticalMode::Fixed,
    );
    let mut pilot = DemoPilot::new(DEMO_SEED);

    while world.running() && world.time_ticks() < MAX_TICKS {
        let input = pilot.next_input(&world, player);
        world.tick(&input);
        for event in world.drain_events() {
            log_event(&event);
        }
        if let Some(body) = world.body(player) {
            camera.scroll(body.center());
        }
    }

    let health = world
        .get(player)
        .and_then(|entity| entity.health())
        .map_or(0, |health| health.current());
    log::info!(
        "Finished after {} ticks: player health {health}, camera at {}, {} entities left",
        world.time_ticks(),
        camera.offset,
        world.len()
    );
    Ok(())
}
