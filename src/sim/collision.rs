//! Collision detection and response against world geometry
//!
//! The densest part of the simulation: every frame the player is swept
//! against every platform in insertion order. Overlaps fire the platform's
//! side effect first, then push the player out along the axis of minimum
//! penetration, gated on the direction the player is moving.

use super::entity::Body;
use super::player::{Item, Player};
use super::rect::Aabb;
use super::world::{Platform, PlatformKind};
use crate::consts::HEAD_BUMP_VELOCITY;

/// Penetration depth of a body into a platform along each side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Body's right edge past the platform's left edge
    pub left: f32,
    /// Platform's right edge past the body's left edge
    pub right: f32,
    /// Platform's top past the body's bottom
    pub top: f32,
    /// Body's top past the platform's bottom
    pub bottom: f32,
}

impl Penetration {
    pub fn between(body: &Aabb, platform: &Aabb) -> Self {
        Self {
            left: body.right() - platform.left(),
            right: platform.right() - body.left(),
            top: platform.top() - body.bottom(),
            bottom: body.top() - platform.bottom(),
        }
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }
}

/// How a single overlap was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Overlap without a matching direction rule
    None,
    /// Snapped onto the platform top
    Landed,
    /// Hit the underside while rising
    HeadBump,
    /// Stopped while moving right
    BlockedRight,
    /// Stopped while moving left
    BlockedLeft,
}

/// Push a body out of one overlapping platform box
///
/// Callers must already know the boxes overlap.
pub fn correct(body: &mut Body, platform: &Aabb, one_way: bool) -> Correction {
    let pen = Penetration::between(&body.aabb(), platform);
    let min = pen.min();

    if body.vel.y <= 0.0 && min == pen.top {
        body.pos.y = platform.top();
        body.vel.y = 0.0;
        return Correction::Landed;
    }
    if one_way {
        return Correction::None;
    }

    if body.vel.y > 0.0 && min == pen.bottom {
        body.vel.y = HEAD_BUMP_VELOCITY;
        Correction::HeadBump
    } else if body.vel.x > 0.0 && min == pen.left {
        body.vel.x = 0.0;
        Correction::BlockedRight
    } else if body.vel.x < 0.0 && min == pen.right {
        body.vel.x = 0.0;
        Correction::BlockedLeft
    } else {
        Correction::None
    }
}

/// What the player sweep touched this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    pub landed: bool,
    /// Hazard damage actually applied
    pub damage_taken: i32,
    /// Artifacts picked up (already in the inventory)
    pub collected: Vec<Item>,
    pub reached_exit: bool,
}

/// Sweep the player against every platform
///
/// Hazards damage on any overlap even if a later platform pushes the player
/// clear. Picked-up artifacts are removed from `platforms`. The player's
/// grounded flag is recomputed from scratch.
pub fn resolve(player: &mut Player, platforms: &mut Vec<Platform>) -> ResolveReport {
    let mut report = ResolveReport::default();
    let mut picked = Vec::new();

    for platform in platforms.iter() {
        if !player.body.aabb().overlaps(&platform.rect) {
            continue;
        }

        match &platform.kind {
            PlatformKind::Hazard { damage } => {
                if player.take_damage(*damage) {
                    report.damage_taken += *damage;
                }
            }
            PlatformKind::Artifact(item) => {
                log::info!("Picked up artifact '{}'", item.name);
                player.collect(item.clone());
                report.collected.push(item.clone());
                picked.push(platform.id);
            }
            PlatformKind::Exit => report.reached_exit = true,
            PlatformKind::Solid | PlatformKind::OneWay => {}
        }

        if platform.is_trigger() {
            continue;
        }
        if correct(&mut player.body, &platform.rect, platform.is_one_way()) == Correction::Landed {
            report.landed = true;
        }
    }

    if !picked.is_empty() {
        platforms.retain(|p| !picked.contains(&p.id));
    }

    player.body.on_ground = report.landed;
    report
}

/// Side-effect-free sweep for non-player bodies. Returns whether it landed.
pub fn resolve_body(body: &mut Body, platforms: &[Platform]) -> bool {
    let mut landed = false;
    for platform in platforms {
        if platform.is_trigger() || !body.aabb().overlaps(&platform.rect) {
            continue;
        }
        if correct(body, &platform.rect, platform.is_one_way()) == Correction::Landed {
            landed = true;
        }
    }
    body.on_ground = landed;
    landed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::player::ItemEffect;
    use glam::Vec2;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &Settings::default())
    }

    fn solid(id: u32, x: f32, y: f32, w: f32, h: f32) -> Platform {
        Platform::new(id, Aabb::new(x, y, w, h), PlatformKind::Solid)
    }

    #[test]
    fn test_penetration_depths() {
        let body = Aabb::new(100.0, 115.0, 40.0, 40.0);
        let platform = Aabb::new(80.0, 100.0, 200.0, 20.0);
        let pen = Penetration::between(&body, &platform);
        assert_eq!(pen.left, 60.0);
        assert_eq!(pen.right, 180.0);
        assert_eq!(pen.top, 5.0);
        assert_eq!(pen.bottom, 55.0);
        assert_eq!(pen.min(), 5.0);
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let mut player = player_at(100.0, 117.0);
        player.body.vel.y = -200.0;
        let mut platforms = vec![solid(1, 50.0, 100.0, 200.0, 20.0)];

        let report = resolve(&mut player, &mut platforms);
        assert!(report.landed);
        assert_eq!(player.body.pos.y, 120.0);
        assert_eq!(player.body.vel.y, 0.0);
        assert!(player.body.on_ground);
    }

    #[test]
    fn test_head_bump_forces_fall() {
        let mut player = player_at(100.0, 62.0);
        player.body.vel.y = 300.0;
        let mut platforms = vec![solid(1, 50.0, 100.0, 200.0, 20.0)];

        let report = resolve(&mut player, &mut platforms);
        assert!(!report.landed);
        assert_eq!(player.body.vel.y, HEAD_BUMP_VELOCITY);
        assert!(!player.body.on_ground);
    }

    #[test]
    fn test_side_blocks() {
        let mut player = player_at(62.0, 100.0);
        player.body.vel.x = MOVE_SPEED;
        let mut platforms = vec![solid(1, 100.0, 50.0, 40.0, 200.0)];
        resolve(&mut player, &mut platforms);
        assert_eq!(player.body.vel.x, 0.0);

        let mut player = player_at(138.0, 100.0);
        player.body.vel.x = -MOVE_SPEED;
        resolve(&mut player, &mut platforms);
        assert_eq!(player.body.vel.x, 0.0);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let mut player = player_at(100.0, 120.0);
        player.body.on_ground = true;
        let mut platforms = vec![solid(1, 50.0, 100.0, 200.0, 20.0)];

        let report = resolve(&mut player, &mut platforms);
        assert!(!report.landed);
        assert!(!player.body.on_ground);
    }

    #[test]
    fn test_hazard_damages_even_when_pushed_out() {
        let mut player = player_at(100.0, 100.0);
        let mut platforms = vec![
            Platform::new(1, Aabb::new(100.0, 100.0, 40.0, 40.0), PlatformKind::Hazard { damage: 20 }),
            solid(2, 0.0, 0.0, 400.0, 110.0),
        ];

        let report = resolve(&mut player, &mut platforms);
        assert_eq!(report.damage_taken, 20);
        assert_eq!(player.body.current_health, MAX_HEALTH - 20);
        // Hazards are solid too: the player ends up standing on it
        assert!(report.landed);
        assert_eq!(player.body.pos.y, 140.0);
    }

    #[test]
    fn test_artifact_pickup_removes_it() {
        let mut player = player_at(100.0, 0.0);
        let boots = Item::new("Marioowo", ItemEffect::DoubleJump);
        let mut platforms = vec![
            solid(1, 0.0, 200.0, 50.0, 20.0),
            Platform::new(2, Aabb::new(110.0, 10.0, 40.0, 40.0), PlatformKind::Artifact(boots.clone())),
        ];

        let report = resolve(&mut player, &mut platforms);
        assert_eq!(report.collected, vec![boots]);
        assert!(player.can_double_jump);
        assert_eq!(player.inventory.names(), vec!["Marioowo"]);
        assert_eq!(platforms.len(), 1);
        // Triggers never move the player
        assert_eq!(player.body.pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_exit_reported() {
        let mut player = player_at(100.0, 0.0);
        let mut platforms = vec![Platform::new(1, Aabb::new(120.0, 0.0, 40.0, 80.0), PlatformKind::Exit)];
        assert!(resolve(&mut player, &mut platforms).reached_exit);
        assert_eq!(platforms.len(), 1);
    }

    #[test]
    fn test_one_way_only_lands() {
        let one_way = Platform::new(1, Aabb::new(50.0, 100.0, 200.0, 20.0), PlatformKind::OneWay);

        let mut rising = player_at(100.0, 62.0);
        rising.body.vel.y = 300.0;
        resolve(&mut rising, &mut vec![one_way.clone()]);
        assert_eq!(rising.body.vel.y, 300.0);

        let mut falling = player_at(100.0, 117.0);
        falling.body.vel.y = -100.0;
        assert!(resolve(&mut falling, &mut vec![one_way]).landed);
        assert_eq!(falling.body.pos.y, 120.0);
    }

    #[test]
    fn test_later_platforms_still_resolved() {
        let mut player = player_at(100.0, 117.0);
        player.body.vel = Vec2::new(MOVE_SPEED, -100.0);
        let mut platforms = vec![
            solid(1, 50.0, 100.0, 200.0, 20.0),
            solid(2, 138.0, 125.0, 40.0, 100.0),
        ];
        let report = resolve(&mut player, &mut platforms);
        assert!(report.landed);
        assert_eq!(player.body.vel.x, 0.0);
    }

    #[test]
    fn test_resolve_body_ignores_triggers() {
        let mut body = player_at(100.0, 117.0).body;
        body.vel.y = -50.0;
        let platforms = vec![
            Platform::new(1, Aabb::new(50.0, 100.0, 200.0, 20.0), PlatformKind::Exit),
        ];
        assert!(!resolve_body(&mut body, &platforms));
        assert_eq!(body.pos.y, 117.0);
    }
}
