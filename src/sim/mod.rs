//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of every collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod particle;
pub mod player;
pub mod projectile;
pub mod puzzle;
pub mod rect;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Correction, Penetration, ResolveReport, resolve, resolve_body};
pub use enemy::Enemy;
pub use entity::{Body, BodyKind, EntityId, Motion};
pub use particle::Particle;
pub use player::{Inventory, Item, ItemEffect, Player};
pub use projectile::{Owner, Projectile, ProjectileOutcome, Shot};
pub use puzzle::{
    AnswerOutcome, GateState, LevelController, PuzzleGate, Question, QuestionBank,
    puzzle_count_for_level,
};
pub use rect::Aabb;
pub use state::{GameEvent, LevelPhase, LevelSimulation, SimulationContext};
pub use tick::{TickInput, tick};
pub use world::{Platform, PlatformKind};
