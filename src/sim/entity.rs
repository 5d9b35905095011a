//! Shared kinematic body
//!
//! Every simulated thing (player, enemy, projectile, artifact) carries the
//! same flat body data tagged with a [`BodyKind`]. Per-kind behaviour lives in
//! the owning module and operates on these fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Aabb;
use crate::consts::*;

/// Stable identifier handed out by the simulation
pub type EntityId = u32;

/// Capability tag for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    Enemy,
    Projectile,
    Artifact,
}

/// Movement constants of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
        }
    }
}

/// A simulated body with its own box and kinematic state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub name: String,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub motion: Motion,
    pub max_health: i32,
    pub current_health: i32,
}

impl Body {
    pub fn new(kind: BodyKind, name: impl Into<String>, pos: Vec2, size: Vec2, motion: Motion) -> Self {
        Self {
            kind,
            name: name.into(),
            pos,
            size,
            vel: Vec2::ZERO,
            on_ground: false,
            motion,
            max_health: MAX_HEALTH,
            current_health: MAX_HEALTH,
        }
    }

    pub fn with_health(mut self, max_health: i32) -> Self {
        self.max_health = max_health;
        self.current_health = max_health;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Advance one fixed step: gravity, position, world clamps
    ///
    /// The floor clamp at `y = 0` holds even when a level has no ground
    /// geometry.
    pub fn integrate(&mut self, dt: f32, world_width: f32) {
        if !self.on_ground {
            self.vel.y += self.motion.gravity * dt;
        }

        self.pos += self.vel * dt;

        let max_x = (world_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
            self.on_ground = true;
        }
    }

    // Velocity-only mutators; position changes happen in `integrate`.

    pub fn jump(&mut self) {
        if self.on_ground {
            self.vel.y = self.motion.jump_speed;
            self.on_ground = false;
        }
    }

    pub fn move_left(&mut self) {
        self.vel.x = -self.motion.move_speed;
    }

    pub fn move_right(&mut self) {
        self.vel.x = self.motion.move_speed;
    }

    pub fn stop_horizontal(&mut self) {
        self.vel.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(
            BodyKind::Player,
            "test",
            Vec2::new(x, y),
            Vec2::splat(40.0),
            Motion::default(),
        )
    }

    #[test]
    fn test_first_step_from_rest() {
        let mut body = body_at(0.0, 40.0);
        body.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
        assert!((body.vel.y - (-13.333)).abs() < 0.01);
        assert!((body.pos.y - 39.778).abs() < 0.01);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_floor_clamp() {
        let mut body = body_at(0.0, 40.0);
        for _ in 0..120 {
            body.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
        }
        assert_eq!(body.pos.y, 0.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut body = body_at(790.0, 0.0);
        body.on_ground = true;
        body.move_right();
        body.integrate(SIM_DT, 800.0);
        assert_eq!(body.pos.x, 760.0);

        body.pos.x = 1.0;
        body.move_left();
        body.integrate(SIM_DT, 800.0);
        assert_eq!(body.pos.x, 0.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut body = body_at(0.0, 100.0);
        body.jump();
        assert_eq!(body.vel.y, 0.0);

        body.on_ground = true;
        body.jump();
        assert_eq!(body.vel.y, JUMP_SPEED);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_movement_only_touches_velocity() {
        let mut body = body_at(100.0, 0.0);
        body.move_left();
        assert_eq!(body.vel.x, -MOVE_SPEED);
        assert_eq!(body.pos.x, 100.0);
        body.move_right();
        assert_eq!(body.vel.x, MOVE_SPEED);
        body.stop_horizontal();
        assert_eq!(body.vel.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_airborne_velocity_decreases_by_gravity(
            y in 500.0f32..5000.0,
            vy in -200.0f32..200.0,
            dt in 0.001f32..0.05,
        ) {
            let mut body = body_at(100.0, y);
            body.vel.y = vy;
            body.integrate(dt, DEFAULT_WORLD_WIDTH);
            prop_assert!(body.vel.y < vy);
            prop_assert!((vy - body.vel.y - GRAVITY.abs() * dt).abs() < 1e-3);
        }

        #[test]
        fn prop_never_below_floor(
            y in 0.0f32..200.0,
            vy in -2000.0f32..0.0,
        ) {
            let mut body = body_at(100.0, y);
            body.vel.y = vy;
            for _ in 0..30 {
                body.integrate(SIM_DT, DEFAULT_WORLD_WIDTH);
                prop_assert!(body.pos.y >= 0.0);
            }
        }
    }
}
