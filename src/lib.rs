//! Joda - simulation core of a 2D side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, enemy AI, world registry)
//! - `camera`: Side-scrolling camera offsets
//! - `tilemap`: Tile grid parsing into terrain obstacles
//! - `settings`: Data-driven tuning
//! - `demo`: Seeded input pilot for headless runs

pub mod camera;
pub mod demo;
pub mod settings;
pub mod sim;
pub mod tilemap;

pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;

    /// Screen dimensions (camera frame)
    pub const SCREEN_WIDTH: f32 = 1440.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Tile size of the terrain grid
    pub const GRID_SIZE: f32 = 32.0;

    /// Overlap below this many pixels counts as edge contact, not a collision
    pub const CONTACT_EPSILON: f32 = 1e-3;

    /// Default gravity for every character (pixels/tick²)
    pub const CHARACTER_GRAVITY: f32 = 1.3;

    /// Player defaults
    pub const PLAYER_SIZE: (f32, f32) = (41.0, 116.0);
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const PLAYER_HEALTH: i32 = 10;
    pub const PLAYER_JUMP_STRENGTH: f32 = 20.0;
    pub const PLAYER_SHOOT_COOLDOWN: u32 = 20;
    /// Maximum number of the player's bullets alive at once
    pub const PLAYER_MAX_BULLETS: usize = 3;
    pub const PLAYER_BULLET_SIZE: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = 12.0;
    /// Horizontal distance between the player's edge and a fresh bullet
    pub const PLAYER_MUZZLE_GAP: f32 = 15.0;

    /// Bullet lifetime in ticks
    pub const BULLET_TTL: u32 = 80;
    pub const BULLET_DAMAGE: i32 = 1;

    /// Runner defaults
    pub const RUNNER_SIZE: (f32, f32) = (70.0, 130.0);
    pub const RUNNER_SPEED: f32 = 2.0;
    pub const RUNNER_HEALTH: i32 = 5;
    /// Run speed is this multiple of walk speed
    pub const RUNNER_RUN_MULTIPLIER: f32 = 3.0;
    /// Ticks the runner keeps facing away from its target before turning
    pub const RUNNER_TURN_DELAY: u32 = 15;
    /// Ticks a target may stay outside the sensing zones before it is dropped
    pub const RUNNER_TARGET_GRACE: u32 = 40;
    pub const STOMP_IMPULSE: f32 = -15.0;
    pub const STOMP_COOLDOWN: u32 = 90;
    pub const STOMP_DAMAGE: i32 = 1;

    /// Runner sensing zones (width, height)
    pub const DETECT_ZONE: (f32, f32) = (1200.0, 500.0);
    pub const ATTACK_ZONE: (f32, f32) = (300.0, 130.0);
    pub const CONTINUE_ATTACK_ZONE: (f32, f32) = (440.0, 180.0);
    pub const HIT_ZONE: (f32, f32) = (360.0, 60.0);

    /// Sniper guy defaults
    pub const SNIPER_SIZE: (f32, f32) = (60.0, 110.0);
    pub const SNIPER_HEALTH: i32 = 3;
    pub const SNIPER_FIRST_SHOT: u32 = 20;
    pub const SNIPER_COOLDOWN: u32 = 120;
    pub const SNIPER_BULLET_SPEED: f32 = 13.0;
    pub const SNIPER_BULLET_HEIGHT: f32 = 4.0;

    /// Damage flash: counter limit and red intensity per counter step
    pub const DAMAGE_FLASH_LIMIT: u32 = 10;
    pub const DAMAGE_FLASH_STEP: u32 = 12;

    /// Health points per heart icon
    pub const HEALTH_PER_HEART: f32 = 2.0;
}

/// Horizontal facing of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction of a signed horizontal quantity (None for zero)
    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Direction::Right)
        } else if value < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    }
}
