//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (registry order)
//! - No rendering or platform dependencies

pub mod actors;
pub mod body;
pub mod collision;
pub mod counter;
pub mod fsm;
pub mod geom;
pub mod health;
pub mod physics;
pub mod runner;
pub mod tick;
pub mod world;
pub mod zone;

pub use actors::{Bullet, Player, SniperGuy};
pub use body::Body;
pub use collision::{is_blocked, move_and_collide, resolve_x, resolve_y};
pub use counter::PingPong;
pub use fsm::{FsmError, State, StateMachine, StateName, Transition};
pub use geom::{Footprint, Mask, Rect};
pub use health::{DamageFlash, Damageable, Health};
pub use physics::{Boundaries, apply_gravity, check_boundaries};
pub use runner::{PREPARE_ATTACK, RUN, Runner, RunnerAgent, STOMP, WALK};
pub use tick::{TickInput, tick};
pub use world::{Behavior, Category, Entity, EntityId, EntityKind, GameEvent, World, ZoneId};
pub use zone::{Zone, ZoneShape, ZoneSpec};
