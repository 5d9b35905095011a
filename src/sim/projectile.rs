//! Projectiles: straight-line travel, decay, bounce, hit

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entity::{Body, BodyKind, EntityId, Motion};
use super::player::Player;
use super::world::Platform;
use crate::consts::PROJECTILE_SIZE;

/// Who fired a projectile; decides what it can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A request to spawn a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Center of the projectile at spawn
    pub origin: Vec2,
    pub direction: Vec2,
    pub damage: i32,
    pub max_bounces: u32,
}

/// Result of one projectile update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    /// Still travelling
    Flying,
    /// Lived past its decay time
    Expired,
    /// Reflected off a platform
    Bounced,
    /// Stopped by a platform
    Blocked,
    /// Struck the enemy at this index
    HitEnemy { index: usize, point: Vec2 },
    /// Struck the player
    HitPlayer { point: Vec2 },
    /// Already detached; nothing happens
    Inert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub body: Body,
    /// Unit travel direction
    pub direction: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub owner: Owner,
    /// Simulation time at spawn (seconds)
    pub spawned_at: f64,
    /// Lifetime in seconds
    pub decay: f32,
    pub bounces: u32,
    pub max_bounces: u32,
    /// False once removed from the world; updates become no-ops
    pub attached: bool,
    prev_pos: Vec2,
}

impl Projectile {
    pub fn from_shot(id: EntityId, shot: Shot, owner: Owner, speed: f32, decay: f32, now: f64) -> Self {
        let size = Vec2::splat(PROJECTILE_SIZE);
        let direction = shot.direction.normalize_or_zero();
        let pos = shot.origin - size / 2.0;
        let mut body = Body::new(
            BodyKind::Projectile,
            "Projectile",
            pos,
            size,
            Motion {
                gravity: 0.0,
                move_speed: speed,
                jump_speed: 0.0,
            },
        );
        body.vel = direction * speed;
        Self {
            id,
            body,
            direction,
            speed,
            damage: shot.damage,
            owner,
            spawned_at: now,
            decay,
            bounces: 0,
            max_bounces: shot.max_bounces,
            attached: true,
            prev_pos: pos,
        }
    }

    #[inline]
    pub fn age(&self, now: f64) -> f32 {
        (now - self.spawned_at) as f32
    }

    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) >= self.decay
    }

    /// Move along the velocity. Returns true if the projectile has expired.
    pub fn advance(&mut self, dt: f32, now: f64) -> bool {
        self.prev_pos = self.body.pos;
        self.body.pos += self.body.vel * dt;
        self.is_expired(now)
    }

    /// Check world geometry; bounce while under budget, otherwise stop
    pub fn check_platforms(&mut self, platforms: &[Platform]) -> Option<ProjectileOutcome> {
        let hit_box = self.body.aabb();
        let hit = platforms
            .iter()
            .any(|p| p.blocks_projectiles() && p.rect.overlaps(&hit_box));
        if !hit {
            return None;
        }

        if self.bounces < self.max_bounces {
            self.body.pos = self.prev_pos;
            self.body.vel.x = -self.body.vel.x;
            self.direction.x = -self.direction.x;
            self.bounces += 1;
            Some(ProjectileOutcome::Bounced)
        } else {
            Some(ProjectileOutcome::Blocked)
        }
    }

    /// Check valid targets: enemies for player shots, the player for enemy shots
    pub fn check_targets(&self, enemies: &[Enemy], player: &Player) -> Option<ProjectileOutcome> {
        let hit_box = self.body.aabb();
        let point = self.body.center();
        match self.owner {
            Owner::Player => enemies
                .iter()
                .position(|e| e.body.is_alive() && e.body.aabb().overlaps(&hit_box))
                .map(|index| ProjectileOutcome::HitEnemy { index, point }),
            Owner::Enemy => {
                if !player.dead && player.body.aabb().overlaps(&hit_box) {
                    Some(ProjectileOutcome::HitPlayer { point })
                } else {
                    None
                }
            }
        }
    }

    /// Full per-frame lifecycle up to (not including) applying a hit
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        platforms: &[Platform],
        enemies: &[Enemy],
        player: &Player,
    ) -> ProjectileOutcome {
        if !self.attached {
            return ProjectileOutcome::Inert;
        }
        if self.advance(dt, now) {
            self.attached = false;
            return ProjectileOutcome::Expired;
        }
        if let Some(outcome) = self.check_platforms(platforms) {
            if outcome == ProjectileOutcome::Blocked {
                self.attached = false;
            }
            return outcome;
        }
        match self.check_targets(enemies, player) {
            Some(outcome) => {
                self.attached = false;
                outcome
            }
            None => ProjectileOutcome::Flying,
        }
    }
}
