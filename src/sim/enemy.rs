//! Enemy AI: patrol with ledge/wall detection, contact damage, ranged attack

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_body;
use super::entity::{Body, BodyKind, EntityId};
use super::player::Player;
use super::projectile::Shot;
use super::world::Platform;
use crate::consts::ENEMY_SIZE;
use crate::settings::Settings;

/// What an enemy did to the world this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyUpdate {
    /// Contact damage that landed on the player
    pub contact_damage: i32,
    pub shot: Option<Shot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    /// +1 right, -1 left
    pub direction: f32,
    pub patrol_speed: f32,
    pub shoot_interval: f32,
    pub aggro_range: f32,
    /// Simulation time of the last shot (spawn time before the first)
    pub last_shot: f64,
    pub contact_damage: i32,
    pub projectile_damage: i32,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, settings: &Settings, now: f64) -> Self {
        Self {
            id,
            body: Body::new(
                BodyKind::Enemy,
                "Enemy",
                pos,
                Vec2::splat(ENEMY_SIZE),
                settings.motion(),
            )
            .with_health(settings.enemy_max_health),
            direction: 1.0,
            patrol_speed: settings.enemy_patrol_speed,
            shoot_interval: settings.enemy_shoot_interval,
            aggro_range: settings.enemy_aggro_range,
            last_shot: now,
            contact_damage: settings.enemy_contact_damage,
            projectile_damage: settings.enemy_projectile_damage,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Point one unit past the leading edge at the given height
    fn probe(&self, y: f32) -> Vec2 {
        let bounds = self.body.aabb();
        let x = if self.direction > 0.0 {
            bounds.right() + 1.0
        } else {
            bounds.left() - 1.0
        };
        Vec2::new(x, y)
    }

    /// Whether there is something to stand on just ahead of the leading foot
    pub fn ground_ahead(&self, platforms: &[Platform]) -> bool {
        if self.body.pos.y <= 0.0 {
            // World floor
            return true;
        }
        let probe = self.probe(self.body.pos.y - 1.0);
        platforms
            .iter()
            .any(|p| !p.is_trigger() && p.rect.contains_point(probe))
    }

    /// Whether a blocking platform sits just ahead at mid-height
    pub fn wall_ahead(&self, platforms: &[Platform]) -> bool {
        let probe = self.probe(self.body.center().y);
        platforms
            .iter()
            .any(|p| p.is_solid() && p.rect.contains_point(probe))
    }

    fn at_world_edge(&self, world_width: f32) -> bool {
        (self.direction < 0.0 && self.body.pos.x <= 0.0)
            || (self.direction > 0.0 && self.body.pos.x >= world_width - self.body.size.x)
    }

    /// Choose direction and set horizontal velocity
    pub fn patrol(&mut self, platforms: &[Platform], world_width: f32) {
        let reverse = self.at_world_edge(world_width)
            || self.wall_ahead(platforms)
            || (self.body.on_ground && !self.ground_ahead(platforms));
        if reverse {
            self.direction = -self.direction;
        }
        self.body.vel.x = self.direction * self.patrol_speed;
    }

    /// One frame of AI, physics, and attacks against the player
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        player: &mut Player,
        platforms: &[Platform],
        world_width: f32,
    ) -> EnemyUpdate {
        let mut result = EnemyUpdate::default();
        if !self.is_alive() {
            return result;
        }

        self.patrol(platforms, world_width);
        resolve_body(&mut self.body, platforms);
        self.body.integrate(dt, world_width);

        // No cooldown: every frame of overlap hurts
        if self.body.aabb().overlaps(&player.body.aabb()) && player.take_damage(self.contact_damage) {
            result.contact_damage = self.contact_damage;
        }

        let elapsed = (now - self.last_shot) as f32;
        let distance = self.body.center().distance(player.body.center());
        if !player.dead && elapsed >= self.shoot_interval && distance <= self.aggro_range {
            self.last_shot = now;
            result.shot = Some(Shot {
                origin: self.body.center(),
                direction: (player.body.center() - self.body.center()).normalize_or_zero(),
                damage: self.projectile_damage,
                max_bounces: 0,
            });
        }

        result
    }
}
