//! Artifact Hunter - 2D platformer simulation core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, collisions, AI, puzzle gates)
//! - `levels`: Level population data, validation and built-in layouts
//! - `settings`: Data-driven simulation tuning
//! - `audio`: Fire-and-forget sound triggers consumed by the host
//! - `render`: Rectangle-level render adapter

pub mod audio;
pub mod levels;
pub mod render;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, LogAudio, NullAudio, SoundEffect};
pub use levels::{LevelData, LevelError};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the host clock)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Default world width when a level does not declare one
    pub const DEFAULT_WORLD_WIDTH: f32 = 800.0;
    /// Edge length of one level tile
    pub const TILE_SIZE: f32 = 40.0;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = -800.0;
    pub const MOVE_SPEED: f32 = 300.0;
    pub const JUMP_SPEED: f32 = 400.0;
    pub const MAX_HEALTH: i32 = 100;

    /// Vertical speed forced on the player after bumping a ceiling
    pub const HEAD_BUMP_VELOCITY: f32 = -50.0;

    /// Player body
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const SHOOT_COOLDOWN: f32 = 0.3;

    /// Enemy body and AI
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_PATROL_SPEED: f32 = 100.0;
    pub const ENEMY_SHOOT_INTERVAL: f32 = 2.0;
    pub const ENEMY_AGGRO_RANGE: f32 = 300.0;
    pub const ENEMY_CONTACT_DAMAGE: i32 = 1;
    pub const ENEMY_MAX_HEALTH: i32 = 50;

    /// Projectiles
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 500.0;
    pub const PLAYER_PROJECTILE_DAMAGE: i32 = 25;
    pub const ENEMY_PROJECTILE_DAMAGE: i32 = 10;
    pub const PROJECTILE_DECAY: f32 = 2.0;

    /// Decorative particles spawned per projectile impact
    pub const PARTICLES_PER_HIT: usize = 6;
    pub const PARTICLE_SPEED: f32 = 120.0;
    pub const PARTICLE_LIFETIME: f32 = 0.4;
    pub const PARTICLE_SIZE: f32 = 4.0;

    /// Hazard tiles
    pub const HAZARD_DAMAGE: i32 = 20;

    /// Puzzle gates
    pub const GATE_SIZE: f32 = 40.0;
    pub const MAX_WRONG_ATTEMPTS: u32 = 2;
}
