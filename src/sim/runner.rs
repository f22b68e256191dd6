//! Runner enemy
//!
//! A melee enemy that patrols until it spots a player, chases it and
//! finishes with a stomp: a jump whose landing hurts every grounded player
//! standing in its hit zone.
//!
//! Per tick: gravity, stomp cooldown, target acquisition, state transition,
//! state behaviour, then collision and boundaries.

use glam::Vec2;

use super::body::Body;
use super::collision::{is_blocked, move_and_collide};
use super::fsm::{State, StateMachine, StateName, Transition};
use super::geom::Rect;
use super::health::{Damageable, Health};
use super::physics::{apply_gravity, check_boundaries};
use super::tick::TickInput;
use super::world::{Behavior, Entity, EntityId, GameEvent, World, ZoneId};
use crate::Direction;
use crate::settings::RunnerTuning;

pub const WALK: StateName = "walk";
pub const RUN: StateName = "run";
pub const PREPARE_ATTACK: StateName = "prepare_attack";
pub const STOMP: StateName = "stomp";

/// Sensing zones registered for one runner
#[derive(Debug, Clone, Copy)]
pub struct RunnerZones {
    /// Target acquisition
    pub detect: ZoneId,
    /// Entering the attack
    pub attack: ZoneId,
    /// Staying in the attack; wider than `attack`
    pub continue_attack: ZoneId,
    /// Stomp damage on landing
    pub hit: ZoneId,
}

/// Everything the runner's states act on
#[derive(Debug)]
pub struct RunnerAgent {
    id: EntityId,
    pub body: Body,
    pub health: Health,
    pub tuning: RunnerTuning,
    zones: RunnerZones,
    target: Option<EntityId>,
    /// Ticks the target has spent outside detect and attack zones
    lost_ticks: u32,
    /// Ticks left before turning towards a target behind us
    turn_countdown: u32,
    stomp_cooldown: u32,
}

impl RunnerAgent {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn zones(&self) -> &RunnerZones {
        &self.zones
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    #[inline]
    pub fn stomp_cooldown(&self) -> u32 {
        self.stomp_cooldown
    }

    fn target_body<'w>(&self, world: &'w World) -> Option<&'w Body> {
        world.body(self.target?)
    }

    fn target_in(&self, world: &World, zone: ZoneId) -> bool {
        self.target_body(world)
            .is_some_and(|target| world.zone_contains(zone, target))
    }

    fn faces_target(&self, world: &World) -> bool {
        self.target_body(world)
            .is_some_and(|target| self.body.is_facing(target))
    }

    /// Turn towards the target once it has been behind us for the turn delay
    fn face_target(&mut self, world: &World) {
        let Some(target) = self.target_body(world) else {
            return;
        };
        if self.body.is_facing(target) {
            self.turn_countdown = self.tuning.turn_delay;
        } else if self.turn_countdown == 0 {
            self.body.turn_around();
            self.turn_countdown = self.tuning.turn_delay;
        } else {
            self.turn_countdown -= 1;
        }
    }

    fn drop_target(&mut self, reason: &str) {
        if let Some(target) = self.target.take() {
            log::debug!("Runner {:?} dropped target {target:?}: {reason}", self.id);
        }
        self.lost_ticks = 0;
    }

    fn acquire_target(&mut self, world: &World) {
        if let Some(target) = self.target {
            if !world.is_alive(target) {
                self.drop_target("dead");
            } else if self.target_in(world, self.zones.detect)
                || self.target_in(world, self.zones.attack)
            {
                self.lost_ticks = 0;
            } else {
                self.lost_ticks += 1;
                if self.lost_ticks > self.tuning.target_grace {
                    self.drop_target("out of range");
                }
            }
        }

        if self.target.is_none() {
            self.target = world
                .players()
                .find(|player| {
                    let body = player.body();
                    world.zone_contains(self.zones.attack, body)
                        || (world.zone_contains(self.zones.detect, body)
                            && self.body.is_facing(body))
                })
                .map(Entity::id);
            if let Some(target) = self.target {
                log::debug!("Runner {:?} spotted {target:?}", self.id);
            }
        }
    }
}

type RunnerState = dyn State<RunnerAgent, World>;

/// Patrol at walking speed, turning before walking into an obstacle
struct Walk;

impl State<RunnerAgent, World> for Walk {
    fn update(&mut self, agent: &mut RunnerAgent, world: &mut World) -> Option<StateName> {
        agent.target?;
        if agent.target_in(world, agent.zones.attack) {
            Some(PREPARE_ATTACK)
        } else {
            Some(RUN)
        }
    }

    fn execute(&mut self, agent: &mut RunnerAgent, world: &mut World) {
        let speed = agent.tuning.speed;
        let step = Vec2::new(agent.body.direction.sign() * speed, 0.0);
        if is_blocked(&agent.body, step, &world.obstacles()) {
            agent.body.turn_around();
        }
        agent.body.velocity.x = agent.body.direction.sign() * speed;
    }
}

/// Chase the target
struct Run;

impl State<RunnerAgent, World> for Run {
    fn update(&mut self, agent: &mut RunnerAgent, world: &mut World) -> Option<StateName> {
        if agent.target.is_none() {
            Some(WALK)
        } else if agent.target_in(world, agent.zones.attack) {
            Some(PREPARE_ATTACK)
        } else {
            None
        }
    }

    fn execute(&mut self, agent: &mut RunnerAgent, world: &mut World) {
        agent.face_target(world);
        agent.body.velocity.x =
            agent.body.direction.sign() * agent.tuning.speed * agent.tuning.run_multiplier;
    }
}

/// Stand still, facing the target, until the stomp is ready
struct PrepareAttack;

impl State<RunnerAgent, World> for PrepareAttack {
    fn update(&mut self, agent: &mut RunnerAgent, world: &mut World) -> Option<StateName> {
        if agent.target.is_none() {
            Some(WALK)
        } else if !agent.target_in(world, agent.zones.continue_attack) {
            Some(RUN)
        } else if agent.faces_target(world) && agent.body.on_ground && agent.stomp_cooldown == 0
        {
            Some(STOMP)
        } else {
            None
        }
    }

    fn execute(&mut self, agent: &mut RunnerAgent, world: &mut World) {
        agent.body.velocity.x = 0.0;
        agent.face_target(world);
    }
}

/// Airborne until landing; damage is dealt on the way out
struct Stomp;

impl State<RunnerAgent, World> for Stomp {
    fn update(&mut self, agent: &mut RunnerAgent, world: &mut World) -> Option<StateName> {
        if !(agent.body.on_ground && agent.body.velocity.y >= 0.0) {
            return None;
        }
        if agent.target.is_none() {
            Some(WALK)
        } else if agent.target_in(world, agent.zones.attack) {
            Some(PREPARE_ATTACK)
        } else {
            Some(RUN)
        }
    }

    fn execute(&mut self, _agent: &mut RunnerAgent, _world: &mut World) {}

    fn enter(&mut self, agent: &mut RunnerAgent, _world: &mut World) {
        agent.body.velocity.y = agent.tuning.stomp_impulse;
        agent.body.on_ground = false;
        agent.stomp_cooldown = agent.tuning.stomp_cooldown;
    }

    fn exit(&mut self, agent: &mut RunnerAgent, world: &mut World) {
        let hit = agent.zones.hit;
        let victims: Vec<EntityId> = world
            .players()
            .filter(|player| {
                player.body().on_ground
                    && player.health().is_some_and(Health::can_take_damage)
                    && world.zone_contains(hit, player.body())
            })
            .map(Entity::id)
            .collect();
        for victim in victims {
            world.damage(victim, agent.id, agent.tuning.stomp_damage);
        }
    }
}

#[derive(Debug)]
pub struct Runner {
    agent: RunnerAgent,
    machine: StateMachine<RunnerAgent, World>,
}

impl Runner {
    /// Build a runner with its zones registered in `world`, walking
    pub fn new(id: EntityId, position: Vec2, direction: Direction, world: &mut World) -> Self {
        let tuning = world.settings().runner.clone();
        let rect = Rect::new(position.x, position.y, tuning.size.x, tuning.size.y);
        let body = Body::new(rect, direction);
        let zones = RunnerZones {
            detect: world.add_zone(id, tuning.detect_zone, &body),
            attack: world.add_zone(id, tuning.attack_zone, &body),
            continue_attack: world.add_zone(id, tuning.continue_attack_zone, &body),
            hit: world.add_zone(id, tuning.hit_zone, &body),
        };
        let mut agent = RunnerAgent {
            id,
            body,
            health: Health::new(tuning.health, true),
            turn_countdown: tuning.turn_delay,
            tuning,
            zones,
            target: None,
            lost_ticks: 0,
            stomp_cooldown: 0,
        };

        let mut machine = StateMachine::new();
        let states: [(StateName, Box<RunnerState>); 4] = [
            (WALK, Box::new(Walk)),
            (RUN, Box::new(Run)),
            (PREPARE_ATTACK, Box::new(PrepareAttack)),
            (STOMP, Box::new(Stomp)),
        ];
        for (name, state) in states {
            if let Err(e) = machine.add_state(name, state, name == WALK, &mut agent, world) {
                log::warn!("Runner {id:?}: {e}");
            }
        }
        Self { agent, machine }
    }

    #[inline]
    pub fn agent(&self) -> &RunnerAgent {
        &self.agent
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.agent.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.agent.body
    }

    /// Name of the active state
    pub fn state(&self) -> Option<StateName> {
        self.machine.current()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.agent.target
    }

    pub fn stomp_cooldown(&self) -> u32 {
        self.agent.stomp_cooldown
    }
}

impl Damageable for Runner {
    fn health(&self) -> &Health {
        &self.agent.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.agent.health
    }
}

impl Behavior for Runner {
    fn update(&mut self, id: EntityId, world: &mut World, _input: &TickInput) {
        let Runner { agent, machine } = self;
        world.track_zones(id, &agent.body);

        apply_gravity(&mut agent.body, agent.tuning.gravity);
        agent.stomp_cooldown = agent.stomp_cooldown.saturating_sub(1);
        agent.acquire_target(world);

        match machine.update(agent, world) {
            Ok(Transition::Changed { from, to }) => {
                world.push_event(GameEvent::StateChanged { id, from, to });
            }
            Ok(Transition::Unchanged) => {}
            Err(e) => log::warn!("Runner {id:?}: {e}"),
        }
        if let Err(e) = machine.execute(agent, world) {
            log::warn!("Runner {id:?}: {e}");
        }

        let obstacles = world.obstacles();
        move_and_collide(&mut agent.body, &obstacles);
        world.track_zones(id, &agent.body);

        if check_boundaries(&agent.body, world.boundaries()) {
            agent.health.deplete();
        }
        agent.health.tick_flash();
    }
}
