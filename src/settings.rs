//! Game tuning
//!
//! Every number that shapes gameplay can be overridden from a JSON file.
//! Missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::physics::Boundaries;
use crate::sim::zone::{ZoneShape, ZoneSpec};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub gravity: f32,
    pub jump_strength: f32,
    /// Ticks between two shots
    pub shoot_cooldown: u32,
    /// Own bullets allowed in flight at once
    pub max_bullets: usize,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub bullet_ttl: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            speed: PLAYER_SPEED,
            health: PLAYER_HEALTH,
            gravity: CHARACTER_GRAVITY,
            jump_strength: PLAYER_JUMP_STRENGTH,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            max_bullets: PLAYER_MAX_BULLETS,
            bullet_size: PLAYER_BULLET_SIZE,
            bullet_speed: PLAYER_BULLET_SPEED,
            bullet_ttl: BULLET_TTL,
        }
    }
}

/// Runner tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub size: Vec2,
    /// Walk speed; running uses `speed * run_multiplier`
    pub speed: f32,
    pub run_multiplier: f32,
    pub health: i32,
    pub gravity: f32,
    pub turn_delay: u32,
    pub target_grace: u32,
    pub stomp_impulse: f32,
    pub stomp_cooldown: u32,
    pub stomp_damage: i32,
    pub detect_zone: ZoneSpec,
    pub attack_zone: ZoneSpec,
    pub continue_attack_zone: ZoneSpec,
    pub hit_zone: ZoneSpec,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        let height = RUNNER_SIZE.1;
        Self {
            size: Vec2::new(RUNNER_SIZE.0, height),
            speed: RUNNER_SPEED,
            run_multiplier: RUNNER_RUN_MULTIPLIER,
            health: RUNNER_HEALTH,
            gravity: CHARACTER_GRAVITY,
            turn_delay: RUNNER_TURN_DELAY,
            target_grace: RUNNER_TARGET_GRACE,
            stomp_impulse: STOMP_IMPULSE,
            stomp_cooldown: STOMP_COOLDOWN,
            stomp_damage: STOMP_DAMAGE,
            detect_zone: ZoneSpec::new(ZoneShape::Ellipse, DETECT_ZONE.0, DETECT_ZONE.1, Vec2::ZERO),
            attack_zone: ZoneSpec::on_feet(ATTACK_ZONE.0, ATTACK_ZONE.1, height),
            continue_attack_zone: ZoneSpec::on_feet(
                CONTINUE_ATTACK_ZONE.0,
                CONTINUE_ATTACK_ZONE.1,
                height,
            ),
            hit_zone: ZoneSpec::on_feet(HIT_ZONE.0, HIT_ZONE.1, height),
        }
    }
}

/// Sniper guy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SniperTuning {
    pub size: Vec2,
    pub health: i32,
    pub gravity: f32,
    /// Ticks before the first shot
    pub first_shot: u32,
    pub cooldown: u32,
    pub bullet_speed: f32,
    pub bullet_ttl: u32,
}

impl Default for SniperTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(SNIPER_SIZE.0, SNIPER_SIZE.1),
            health: SNIPER_HEALTH,
            gravity: CHARACTER_GRAVITY,
            first_shot: SNIPER_FIRST_SHOT,
            cooldown: SNIPER_COOLDOWN,
            bullet_speed: SNIPER_BULLET_SPEED,
            bullet_ttl: BULLET_TTL,
        }
    }
}

/// All gameplay tuning
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub boundaries: Boundaries,
    pub player: PlayerTuning,
    pub runner: RunnerTuning,
    pub sniper: SniperTuning,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "runner": { "speed": 4.0 }, "boundaries": { "left": 0, "right": 500, "top": -50, "bottom": 700 } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.runner.speed, 4.0);
        assert_eq!(settings.runner.stomp_cooldown, STOMP_COOLDOWN);
        assert_eq!(settings.boundaries.right, 500.0);
        assert_eq!(settings.player, PlayerTuning::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.sniper.cooldown = 45;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_default_zones_sit_on_runner_feet() {
        let runner = RunnerTuning::default();
        assert_eq!(runner.attack_zone.offset, Vec2::new(0.0, 0.0));
        assert_eq!(runner.hit_zone.offset, Vec2::new(0.0, 35.0));
        assert_eq!(runner.detect_zone.width / 2.0, 600.0);
        assert_eq!(runner.detect_zone.height / 2.0, 250.0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("joda-settings-that-does-not-exist.json");
        assert_eq!(Settings::load(path).unwrap(), Settings::default());
    }
}
