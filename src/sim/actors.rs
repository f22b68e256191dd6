//! Player, sniper guy and bullets

use glam::Vec2;

use super::body::Body;
use super::collision::move_and_collide;
use super::geom::Rect;
use super::health::{Damageable, Health};
use super::physics::{apply_gravity, check_boundaries};
use super::tick::TickInput;
use super::world::{Behavior, Category, Entity, EntityId, GameEvent, World};
use crate::Direction;
use crate::consts::{BULLET_DAMAGE, PLAYER_MUZZLE_GAP, SNIPER_BULLET_HEIGHT};
use crate::settings::{PlayerTuning, SniperTuning};

/// Straight-line projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    owner: EntityId,
    speed: f32,
    damage: i32,
    /// Ticks left before the bullet fizzles out
    ttl: u32,
    spent: bool,
}

impl Bullet {
    pub fn new(
        owner: EntityId,
        center: Vec2,
        size: Vec2,
        speed: f32,
        direction: Direction,
        ttl: u32,
    ) -> Self {
        Self {
            body: Body::new(Rect::from_center(center, size), direction),
            owner,
            speed,
            damage: BULLET_DAMAGE,
            ttl,
            spent: false,
        }
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Hit something or ran out of time
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.spent
    }
}

impl Behavior for Bullet {
    fn update(&mut self, _id: EntityId, world: &mut World, _input: &TickInput) {
        self.body.velocity.x = self.speed * self.body.direction.sign();
        self.body.rect.pos.x += self.body.velocity.x;

        let hits: Vec<EntityId> = world
            .entities()
            .filter(|entity| {
                entity.id() != self.owner
                    && entity.category() != Category::Bullet
                    && entity.is_alive()
                    && self.body.overlaps(entity.body())
            })
            .map(Entity::id)
            .collect();
        if !hits.is_empty() {
            // Invulnerable targets still stop the bullet
            for target in hits {
                world.damage(target, self.owner, self.damage);
            }
            self.spent = true;
            return;
        }

        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl == 0 {
            self.spent = true;
        }
    }
}

/// Count of `owner`'s bullets still in flight
fn live_bullets(world: &World, owner: EntityId) -> usize {
    world
        .entities()
        .filter_map(Entity::as_bullet)
        .filter(|bullet| bullet.owner() == owner && !bullet.is_spent())
        .count()
}

fn fire(world: &mut World, owner: EntityId, bullet: Bullet) {
    let bullet = world.spawn_bullet(bullet);
    world.push_event(GameEvent::Shot { by: owner, bullet });
}

/// Player-controlled character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    health: Health,
    tuning: PlayerTuning,
    shoot_cooldown: u32,
}

impl Player {
    pub fn new(position: Vec2, tuning: PlayerTuning) -> Self {
        let rect = Rect::new(position.x, position.y, tuning.size.x, tuning.size.y);
        Self {
            body: Body::new(rect, Direction::Right),
            health: Health::new(tuning.health, true),
            tuning,
            shoot_cooldown: 0,
        }
    }

    #[inline]
    pub fn shoot_cooldown(&self) -> u32 {
        self.shoot_cooldown
    }

    /// Horizontal intent: face the pressed direction, stop when idle
    fn steer(&mut self, input: &TickInput) {
        let direction = match (input.left, input.right) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            _ => None,
        };
        match direction {
            Some(direction) => {
                self.body.direction = direction;
                self.body.velocity.x = direction.sign() * self.tuning.speed;
            }
            None => self.body.velocity.x = 0.0,
        }
    }

    fn jump(&mut self) {
        if self.body.on_ground {
            self.body.velocity.y = -self.tuning.jump_strength;
            self.body.on_ground = false;
        }
    }

    fn shoot(&mut self, id: EntityId, world: &mut World) {
        if self.shoot_cooldown > 0 || live_bullets(world, id) >= self.tuning.max_bullets {
            return;
        }
        let size = Vec2::splat(self.tuning.bullet_size);
        let direction = self.body.direction;
        let muzzle = match direction {
            Direction::Right => self.body.rect.right() + PLAYER_MUZZLE_GAP + size.x / 2.0,
            Direction::Left => self.body.rect.left() - PLAYER_MUZZLE_GAP - size.x / 2.0,
        };
        let center = Vec2::new(muzzle, self.body.center().y);
        let bullet = Bullet::new(
            id,
            center,
            size,
            self.tuning.bullet_speed,
            direction,
            self.tuning.bullet_ttl,
        );
        fire(world, id, bullet);
        self.shoot_cooldown = self.tuning.shoot_cooldown;
    }
}

impl Damageable for Player {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

impl Behavior for Player {
    fn update(&mut self, id: EntityId, world: &mut World, input: &TickInput) {
        self.steer(input);
        if input.jump {
            self.jump();
        }
        if input.shoot {
            self.shoot(id, world);
        }

        apply_gravity(&mut self.body, self.tuning.gravity);
        let obstacles = world.obstacles();
        move_and_collide(&mut self.body, &obstacles);

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        if check_boundaries(&self.body, world.boundaries()) {
            log::info!("Player {id:?} left the world");
            self.health.deplete();
        }
        self.health.tick_flash();
    }
}

/// Stationary enemy that shoots in the direction it faces
#[derive(Debug, Clone)]
pub struct SniperGuy {
    pub body: Body,
    health: Health,
    tuning: SniperTuning,
    cooldown: u32,
}

impl SniperGuy {
    pub fn new(position: Vec2, direction: Direction, tuning: SniperTuning) -> Self {
        let rect = Rect::new(position.x, position.y, tuning.size.x, tuning.size.y);
        Self {
            body: Body::new(rect, direction),
            health: Health::new(tuning.health, true),
            cooldown: tuning.first_shot,
            tuning,
        }
    }

    #[inline]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Bullets get longer the faster they fly
    fn bullet_size(&self) -> Vec2 {
        Vec2::new(
            (self.tuning.bullet_speed / 1.3).floor().max(1.0),
            SNIPER_BULLET_HEIGHT,
        )
    }

    fn shoot(&mut self, id: EntityId, world: &mut World) {
        let size = self.bullet_size();
        let direction = self.body.direction;
        let edge = match direction {
            Direction::Right => self.body.rect.right(),
            Direction::Left => self.body.rect.left(),
        };
        let center = Vec2::new(
            edge + direction.sign() * size.x / 2.0,
            self.body.rect.top() + 0.4 * self.body.rect.size.y,
        );
        let bullet = Bullet::new(
            id,
            center,
            size,
            self.tuning.bullet_speed,
            direction,
            self.tuning.bullet_ttl,
        );
        fire(world, id, bullet);
        self.cooldown = self.tuning.cooldown;
    }
}

impl Damageable for SniperGuy {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

impl Behavior for SniperGuy {
    fn update(&mut self, id: EntityId, world: &mut World, _input: &TickInput) {
        if self.cooldown == 0 {
            self.shoot(id, world);
        }

        apply_gravity(&mut self.body, self.tuning.gravity);
        let obstacles = world.obstacles();
        move_and_collide(&mut self.body, &obstacles);

        self.cooldown = self.cooldown.saturating_sub(1);
        if check_boundaries(&self.body, world.boundaries()) {
            self.health.deplete();
        }
        self.health.tick_flash();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::tick::tick;

    const FLOOR_TOP: f32 = 600.0;

    fn world_with_floor() -> World {
        let mut world = World::default();
        world.spawn_block(Rect::new(-50.0, FLOOR_TOP, 2650.0, 64.0));
        world
    }

    fn player(world: &World, id: EntityId) -> &Player {
        world.get(id).and_then(Entity::as_player).unwrap()
    }

    fn standing_player(world: &mut World, x: f32) -> EntityId {
        let id = world.spawn_player(Vec2::new(x, FLOOR_TOP - PLAYER_SIZE.1));
        tick(world, &TickInput::default());
        id
    }

    #[test]
    fn test_player_walks_and_faces_input() {
        let mut world = world_with_floor();
        let id = standing_player(&mut world, 100.0);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut world, &left);
        let body = &player(&world, id).body;
        assert_eq!(body.rect.left(), 100.0 - PLAYER_SPEED);
        assert_eq!(body.direction, Direction::Left);

        tick(&mut world, &TickInput::default());
        let body = &player(&world, id).body;
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.direction, Direction::Left);
    }

    #[test]
    fn test_player_jumps_only_from_ground() {
        let mut world = world_with_floor();
        let id = standing_player(&mut world, 100.0);
        assert!(player(&world, id).body.on_ground);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &jump);
        let body = &player(&world, id).body;
        assert!(!body.on_ground);
        assert_eq!(body.velocity.y, -PLAYER_JUMP_STRENGTH + CHARACTER_GRAVITY);

        // No double jump
        let vy = body.velocity.y;
        tick(&mut world, &jump);
        assert_eq!(player(&world, id).body.velocity.y, vy + CHARACTER_GRAVITY);
    }

    #[test]
    fn test_player_bullets_are_capped() {
        let mut world = world_with_floor();
        let id = standing_player(&mut world, 100.0);
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        // Long enough for four cooldowns, short enough for no bullet to expire
        for _ in 0..(3 * PLAYER_SHOOT_COOLDOWN as usize + 5) {
            tick(&mut world, &shoot);
        }
        assert_eq!(world.count(Category::Bullet), PLAYER_MAX_BULLETS);
        let shots = world
            .events()
            .iter()
            .filter(|event| matches!(event, GameEvent::Shot { by, .. } if *by == id))
            .count();
        assert_eq!(shots, PLAYER_MAX_BULLETS);
    }

    #[test]
    fn test_bullet_expires_after_ttl() {
        let mut world = world_with_floor();
        let id = standing_player(&mut world, 100.0);
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut world, &shoot);
        assert_eq!(world.count(Category::Bullet), 1);

        for _ in 0..BULLET_TTL {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.count(Category::Bullet), 0);
        assert!(world.is_alive(id));
    }

    #[test]
    fn test_bullet_damages_target_but_not_owner() {
        let mut world = world_with_floor();
        let shooter = standing_player(&mut world, 100.0);
        let sniper = world.spawn_sniper(
            Vec2::new(300.0, FLOOR_TOP - SNIPER_SIZE.1),
            Direction::Left,
        );
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut world, &shoot);
        for _ in 0..15 {
            tick(&mut world, &TickInput::default());
        }

        let health = world.get(sniper).unwrap().health().unwrap().current();
        assert_eq!(health, SNIPER_HEALTH - BULLET_DAMAGE);
        assert!(world.events().contains(&GameEvent::Damaged {
            id: sniper,
            by: shooter,
            amount: BULLET_DAMAGE,
            remaining: SNIPER_HEALTH - BULLET_DAMAGE,
        }));
        assert_eq!(
            player(&world, shooter).health().current(),
            PLAYER_HEALTH
        );
    }

    #[test]
    fn test_sniper_fires_on_cooldown() {
        let mut world = world_with_floor();
        let sniper = world.spawn_sniper(
            Vec2::new(2000.0, FLOOR_TOP - SNIPER_SIZE.1),
            Direction::Left,
        );
        let shots = |world: &World| {
            world
                .events()
                .iter()
                .filter(|event| matches!(event, GameEvent::Shot { by, .. } if *by == sniper))
                .count()
        };

        for _ in 0..SNIPER_FIRST_SHOT {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(shots(&world), 0);
        tick(&mut world, &TickInput::default());
        assert_eq!(shots(&world), 1);

        let bullet = world.entities().find_map(Entity::as_bullet).unwrap();
        assert_eq!(bullet.body.direction, Direction::Left);
        assert_eq!(bullet.body.rect.size, Vec2::new(10.0, SNIPER_BULLET_HEIGHT));

        for _ in 0..SNIPER_COOLDOWN {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(shots(&world), 2);
    }

    #[test]
    fn test_player_falling_out_of_world_stops_game() {
        let mut world = World::default();
        let id = world.spawn_player(Vec2::new(100.0, 800.0));
        let mut ticks = 0;
        while world.running() && ticks < 200 {
            tick(&mut world, &TickInput::default());
            ticks += 1;
        }
        assert!(!world.running());
        assert!(!world.is_alive(id));
        assert!(world.events().contains(&GameEvent::Died {
            id,
            category: Category::Player
        }));
    }
}
