//! Simulation tuning
//!
//! Loaded from JSON; every field is optional and falls back to the
//! built-in constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Motion;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    /// Grace period after leaving a ledge during which a ground jump still works
    pub coyote_time: f32,

    // === Player ===
    pub player_max_health: i32,
    pub shoot_cooldown: f32,
    pub player_projectile_damage: i32,

    // === Enemies ===
    pub enemy_max_health: i32,
    pub enemy_patrol_speed: f32,
    pub enemy_shoot_interval: f32,
    pub enemy_aggro_range: f32,
    pub enemy_contact_damage: i32,
    pub enemy_projectile_damage: i32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_decay: f32,

    // === World ===
    pub hazard_damage: i32,
    pub max_wrong_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            coyote_time: 0.05,

            player_max_health: MAX_HEALTH,
            shoot_cooldown: SHOOT_COOLDOWN,
            player_projectile_damage: PLAYER_PROJECTILE_DAMAGE,

            enemy_max_health: ENEMY_MAX_HEALTH,
            enemy_patrol_speed: ENEMY_PATROL_SPEED,
            enemy_shoot_interval: ENEMY_SHOOT_INTERVAL,
            enemy_aggro_range: ENEMY_AGGRO_RANGE,
            enemy_contact_damage: ENEMY_CONTACT_DAMAGE,
            enemy_projectile_damage: ENEMY_PROJECTILE_DAMAGE,

            projectile_speed: PROJECTILE_SPEED,
            projectile_decay: PROJECTILE_DECAY,

            hazard_damage: HAZARD_DAMAGE,
            max_wrong_attempts: MAX_WRONG_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Movement constants for bodies built from these settings
    pub fn motion(&self) -> Motion {
        Motion {
            gravity: self.gravity,
            move_speed: self.move_speed,
            jump_speed: self.jump_speed,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {}", value),
                })
            }
        }

        if !self.gravity.is_finite() || self.gravity > 0.0 {
            return Err(SettingsError::Invalid {
                field: "gravity",
                reason: format!("must pull downward (<= 0), got {}", self.gravity),
            });
        }
        positive("move_speed", self.move_speed)?;
        positive("jump_speed", self.jump_speed)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_decay", self.projectile_decay)?;
        positive("enemy_shoot_interval", self.enemy_shoot_interval)?;
        non_negative("shoot_cooldown", self.shoot_cooldown)?;
        non_negative("coyote_time", self.coyote_time)?;
        non_negative("enemy_aggro_range", self.enemy_aggro_range)?;
        non_negative("enemy_patrol_speed", self.enemy_patrol_speed)?;
        if self.hazard_damage <= 0 {
            return Err(SettingsError::Invalid {
                field: "hazard_damage",
                reason: format!("must be positive, got {}", self.hazard_damage),
            });
        }
        if self.player_max_health <= 0 || self.enemy_max_health <= 0 {
            return Err(SettingsError::Invalid {
                field: "max_health",
                reason: "health pools must be positive".to_string(),
            });
        }
        if self.max_wrong_attempts == 0 {
            return Err(SettingsError::Invalid {
                field: "max_wrong_attempts",
                reason: "must allow at least one attempt".to_string(),
            });
        }
        Ok(())
    }
}
