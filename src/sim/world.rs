//! Entity registry
//!
//! The world owns every entity and every sensing zone. Handles are
//! generation-checked slotmap keys, so a stale handle to a despawned entity
//! simply stops resolving.
//!
//! During a tick each entity is checked out of its slot while it updates.
//! Its id stays registered (so it still counts as alive), but it is absent
//! from queries such as [`World::obstacles`] and cannot collide with itself.

use glam::Vec2;
use slotmap::{SlotMap, new_key_type};

use super::actors::{Bullet, Player, SniperGuy};
use super::body::Body;
use super::fsm::StateName;
use super::geom::Rect;
use super::health::{Damageable, Health};
use super::physics::Boundaries;
use super::runner::Runner;
use super::tick::TickInput;
use super::zone::{Zone, ZoneSpec};
use crate::Direction;
use crate::settings::Settings;
use crate::tilemap::TileGrid;

new_key_type! {
    /// Handle of an entity
    pub struct EntityId;
    /// Handle of a sensing zone
    pub struct ZoneId;
}

/// Collision category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Player,
    Enemy,
    Border,
    Block,
    Bullet,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Died {
        id: EntityId,
        category: Category,
    },
    Damaged {
        id: EntityId,
        by: EntityId,
        amount: i32,
        remaining: i32,
    },
    StateChanged {
        id: EntityId,
        from: Option<StateName>,
        to: StateName,
    },
    Shot {
        by: EntityId,
        bullet: EntityId,
    },
}

/// Per-tick behaviour of an entity kind
pub trait Behavior {
    fn update(&mut self, id: EntityId, world: &mut World, input: &TickInput);
}

#[derive(Debug)]
pub enum EntityKind {
    Player(Player),
    Runner(Box<Runner>),
    SniperGuy(SniperGuy),
    Bullet(Bullet),
    /// Terrain
    Block(Body),
    /// Invisible world wall
    Border(Body),
}

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
}

impl Entity {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    pub fn category(&self) -> Category {
        match self.kind {
            EntityKind::Player(_) => Category::Player,
            EntityKind::Runner(_) | EntityKind::SniperGuy(_) => Category::Enemy,
            EntityKind::Bullet(_) => Category::Bullet,
            EntityKind::Block(_) => Category::Block,
            EntityKind::Border(_) => Category::Border,
        }
    }

    pub fn body(&self) -> &Body {
        match &self.kind {
            EntityKind::Player(player) => &player.body,
            EntityKind::Runner(runner) => runner.body(),
            EntityKind::SniperGuy(sniper) => &sniper.body,
            EntityKind::Bullet(bullet) => &bullet.body,
            EntityKind::Block(body) | EntityKind::Border(body) => body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match &mut self.kind {
            EntityKind::Player(player) => &mut player.body,
            EntityKind::Runner(runner) => runner.body_mut(),
            EntityKind::SniperGuy(sniper) => &mut sniper.body,
            EntityKind::Bullet(bullet) => &mut bullet.body,
            EntityKind::Block(body) | EntityKind::Border(body) => body,
        }
    }

    pub fn as_damageable(&self) -> Option<&dyn Damageable> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            EntityKind::Runner(runner) => Some(&**runner),
            EntityKind::SniperGuy(sniper) => Some(sniper),
            _ => None,
        }
    }

    pub fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            EntityKind::Runner(runner) => Some(&mut **runner),
            EntityKind::SniperGuy(sniper) => Some(sniper),
            _ => None,
        }
    }

    pub fn health(&self) -> Option<&Health> {
        self.as_damageable().map(Damageable::health)
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_runner(&self) -> Option<&Runner> {
        match &self.kind {
            EntityKind::Runner(runner) => Some(&**runner),
            _ => None,
        }
    }

    pub fn as_bullet(&self) -> Option<&Bullet> {
        match &self.kind {
            EntityKind::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        match &self.kind {
            EntityKind::Bullet(bullet) => !bullet.is_spent(),
            _ => self.health().is_none_or(|health| !health.is_dead()),
        }
    }

    pub(crate) fn update(&mut self, world: &mut World, input: &TickInput) {
        let id = self.id;
        match &mut self.kind {
            EntityKind::Player(player) => player.update(id, world, input),
            EntityKind::Runner(runner) => runner.update(id, world, input),
            EntityKind::SniperGuy(sniper) => sniper.update(id, world, input),
            EntityKind::Bullet(bullet) => bullet.update(id, world, input),
            EntityKind::Block(_) | EntityKind::Border(_) => {}
        }
    }
}

#[derive(Debug)]
pub struct World {
    /// `None` while the entity is checked out for its own update
    entities: SlotMap<EntityId, Option<Entity>>,
    zones: SlotMap<ZoneId, Zone>,
    settings: Settings,
    running: bool,
    time_ticks: u64,
    /// Grows across ticks until [`World::drain_events`] is called
    events: Vec<GameEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl World {
    pub fn new(settings: Settings) -> Self {
        Self {
            entities: SlotMap::with_key(),
            zones: SlotMap::with_key(),
            settings,
            running: true,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn boundaries(&self) -> &Boundaries {
        &self.settings.boundaries
    }

    /// False once a player has died
    #[inline]
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("Game stopped after {} ticks", self.time_ticks);
        }
        self.running = false;
    }

    #[inline]
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub(crate) fn advance_clock(&mut self) {
        self.time_ticks += 1;
    }

    /// True while `id` is registered and has health left
    pub fn is_alive(&self, id: EntityId) -> bool {
        match self.entities.get(id) {
            Some(Some(entity)) => entity.is_alive(),
            // Checked out for its own update
            Some(None) => true,
            None => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id).and_then(Option::as_mut)
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.get(id).map(Entity::body)
    }

    /// All entities in registry order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().flatten()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.entities()
            .filter(|entity| entity.category() == category)
            .count()
    }

    /// Live players in registry order
    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.entities()
            .filter(|entity| entity.category() == Category::Player && entity.is_alive())
    }

    /// Bodies a moving character collides with: everything alive except bullets
    pub fn obstacles(&self) -> Vec<&Body> {
        self.entities()
            .filter(|entity| entity.category() != Category::Bullet && entity.is_alive())
            .map(Entity::body)
            .collect()
    }

    fn insert(&mut self, kind: EntityKind) -> EntityId {
        self.entities
            .insert_with_key(|id| Some(Entity { id, kind }))
    }

    /// Spawn a player with its top-left corner at `position`
    pub fn spawn_player(&mut self, position: Vec2) -> EntityId {
        let player = Player::new(position, self.settings.player.clone());
        let id = self.insert(EntityKind::Player(player));
        log::debug!("Spawned player {id:?} at {position}");
        id
    }

    pub fn spawn_runner(&mut self, position: Vec2, direction: Direction) -> EntityId {
        // The runner needs its id to register zones
        let id = self.entities.insert(None);
        let runner = Runner::new(id, position, direction, self);
        if let Some(slot) = self.entities.get_mut(id) {
            *slot = Some(Entity {
                id,
                kind: EntityKind::Runner(Box::new(runner)),
            });
        }
        log::debug!("Spawned runner {id:?} at {position}");
        id
    }

    pub fn spawn_sniper(&mut self, position: Vec2, direction: Direction) -> EntityId {
        let sniper = SniperGuy::new(position, direction, self.settings.sniper.clone());
        let id = self.insert(EntityKind::SniperGuy(sniper));
        log::debug!("Spawned sniper guy {id:?} at {position}");
        id
    }

    pub fn spawn_bullet(&mut self, bullet: Bullet) -> EntityId {
        let id = self.insert(EntityKind::Bullet(bullet));
        log::trace!("Spawned bullet {id:?}");
        id
    }

    pub fn spawn_block(&mut self, rect: Rect) -> EntityId {
        self.insert(EntityKind::Block(Body::new(rect, Direction::default())))
    }

    pub fn spawn_border(&mut self, rect: Rect) -> EntityId {
        let mut body = Body::new(rect, Direction::default());
        body.visible = false;
        self.insert(EntityKind::Border(body))
    }

    /// One block per non-empty tile
    pub fn spawn_tiles(&mut self, grid: &TileGrid, grid_size: f32) -> Vec<EntityId> {
        let ids: Vec<_> = grid
            .obstacles(grid_size)
            .map(|rect| self.spawn_block(rect))
            .collect();
        log::debug!("Spawned {} terrain blocks", ids.len());
        ids
    }

    /// Remove an entity without running death handling
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(id).flatten()
    }

    pub fn add_zone(&mut self, owner: EntityId, spec: ZoneSpec, owner_body: &Body) -> ZoneId {
        self.zones.insert(Zone::new(owner, spec, owner_body))
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones.iter()
    }

    /// False when the zone no longer exists
    pub fn zone_contains(&self, zone: ZoneId, target: &Body) -> bool {
        self.zones
            .get(zone)
            .is_some_and(|zone| zone.contains(target))
    }

    /// Re-centre every zone of `owner` on `body`
    pub fn track_zones(&mut self, owner: EntityId, body: &Body) {
        self.zones
            .values_mut()
            .filter(|zone| zone.owner() == owner)
            .for_each(|zone| zone.update_position(body));
    }

    /// Re-centre all zones, dropping those whose owner is gone
    pub(crate) fn sync_zones(&mut self) {
        let entities = &self.entities;
        self.zones.retain(|_, zone| match entities.get(zone.owner()) {
            Some(Some(owner)) if owner.is_alive() => {
                zone.update_position(owner.body());
                true
            }
            _ => false,
        });
    }

    /// Apply damage from `by` to `id`. Returns whether any damage was dealt.
    pub fn damage(&mut self, id: EntityId, by: EntityId, amount: i32) -> bool {
        let Some(target) = self.get_mut(id).and_then(Entity::as_damageable_mut) else {
            return false;
        };
        if !target.take_damage(amount) {
            return false;
        }
        let remaining = target.health().current();
        log::debug!("{id:?} took {amount} damage from {by:?}, {remaining} left");
        self.events.push(GameEvent::Damaged {
            id,
            by,
            amount,
            remaining,
        });
        true
    }

    pub(crate) fn check_out(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.get_mut(id)?.take()
    }

    /// Return an entity to its slot, or bury it if it died during its update
    pub(crate) fn check_in(&mut self, entity: Entity) {
        if !entity.is_alive() {
            self.bury(entity);
            return;
        }
        if let Some(slot) = self.entities.get_mut(entity.id) {
            *slot = Some(entity);
        }
    }

    /// Remove entities that were killed by someone else this tick
    pub(crate) fn sweep_dead(&mut self) {
        let dead: Vec<EntityId> = self
            .entities()
            .filter(|entity| !entity.is_alive())
            .map(Entity::id)
            .collect();
        for id in dead {
            if let Some(entity) = self.check_out(id) {
                self.bury(entity);
            }
        }
    }

    fn bury(&mut self, entity: Entity) {
        let (id, category) = (entity.id, entity.category());
        self.entities.remove(id);
        match category {
            Category::Bullet => log::trace!("Bullet {id:?} expired"),
            _ => log::info!("{category:?} {id:?} died"),
        }
        self.events.push(GameEvent::Died { id, category });
        if category == Category::Player {
            self.stop();
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Everything that happened since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the event log. Long-running callers must drain it every tick or
    /// it keeps growing.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
