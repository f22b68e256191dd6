//! Health, damage capability and damage feedback

use serde::{Deserialize, Serialize};

use super::counter::PingPong;
use crate::consts::{DAMAGE_FLASH_LIMIT, DAMAGE_FLASH_STEP, HEALTH_PER_HEART};

/// Red light-up shown for a short while after taking damage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageFlash {
    counter: PingPong,
    active: bool,
    intensity: u32,
}

impl Default for DamageFlash {
    fn default() -> Self {
        Self {
            counter: PingPong::new(DAMAGE_FLASH_LIMIT),
            active: false,
            intensity: 0,
        }
    }
}

impl DamageFlash {
    pub fn trigger(&mut self) {
        self.counter.reset();
        self.active = true;
    }

    /// Advance one tick; the flash ends when the counter returns to zero
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.intensity = (DAMAGE_FLASH_STEP * self.counter.step()).min(255);
        if self.intensity == 0 {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Red overlay intensity in [0, 255]
    pub fn intensity(&self) -> u8 {
        self.intensity as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
    can_take_damage: bool,
    #[serde(default)]
    flash: DamageFlash,
}

impl Health {
    pub fn new(max: i32, can_take_damage: bool) -> Self {
        Self {
            current: max,
            max,
            can_take_damage,
            flash: DamageFlash::default(),
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn can_take_damage(&self) -> bool {
        self.can_take_damage
    }

    pub fn set_can_take_damage(&mut self, value: bool) {
        self.can_take_damage = value;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Lose `amount` health if vulnerable. Returns whether damage was applied.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.can_take_damage {
            return false;
        }
        self.current -= amount;
        self.flash.trigger();
        true
    }

    /// Lose all health regardless of vulnerability (falling out of the world)
    pub fn deplete(&mut self) {
        self.current = 0;
    }

    /// Hearts shown on the health bar, half hearts included
    pub fn hearts(&self) -> f32 {
        self.current.max(0) as f32 / HEALTH_PER_HEART
    }

    pub fn flash(&self) -> &DamageFlash {
        &self.flash
    }

    pub fn tick_flash(&mut self) {
        self.flash.tick();
    }
}

/// Anything that can be hurt by bullets or stomps
pub trait Damageable {
    fn health(&self) -> &Health;

    fn health_mut(&mut self) -> &mut Health;

    fn can_take_damage(&self) -> bool {
        self.health().can_take_damage()
    }

    fn take_damage(&mut self, amount: i32) -> bool {
        self.health_mut().take_damage(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invulnerable_health_ignores_damage() {
        let mut health = Health::new(4, false);
        assert!(!health.take_damage(1));
        assert_eq!(health.current(), 4);

        health.deplete();
        assert!(health.is_dead());
    }

    #[test]
    fn test_hearts_include_halves() {
        let mut health = Health::new(5, true);
        assert_eq!(health.hearts(), 2.5);
        health.take_damage(10);
        assert_eq!(health.hearts(), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_flash_runs_one_cycle() {
        let mut health = Health::new(3, true);
        health.take_damage(1);
        assert!(health.flash().is_active());

        health.tick_flash();
        assert_eq!(health.flash().intensity(), 12);

        // Up to the limit and back down to zero
        let mut ticks = 1;
        while health.flash().is_active() {
            health.tick_flash();
            ticks += 1;
        }
        assert_eq!(ticks, 2 * DAMAGE_FLASH_LIMIT as usize);
        assert_eq!(health.flash().intensity(), 0);
    }
}
