//! Rectangle-level render adapter
//!
//! The simulation never draws. Hosts implement [`RenderSurface`] and call
//! [`draw`] once per frame after stepping.

use crate::sim::{Aabb, GateState, LevelSimulation, Owner, PlatformKind};

/// Linear RGBA color
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const PLATFORM: Color = [0.6, 0.4, 0.2, 1.0];
    pub const ONE_WAY: Color = [0.75, 0.6, 0.35, 1.0];
    pub const HAZARD: Color = [0.9, 0.15, 0.1, 1.0];
    pub const ARTIFACT: Color = [0.9, 0.85, 0.3, 1.0]; // Gold
    pub const EXIT: Color = [0.2, 0.8, 0.4, 1.0];
    pub const ENEMY: Color = [0.7, 0.1, 0.5, 1.0];
    pub const PLAYER_SHOT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY_SHOT: Color = [1.0, 0.4, 0.2, 1.0];
    pub const PARTICLE: Color = [1.0, 0.8, 0.3, 0.8];
    pub const GATE: Color = [0.4, 0.7, 1.0, 1.0];
    pub const GATE_LOCKED: Color = [0.7, 0.7, 0.8, 1.0];
    pub const PLAYER: Color = [0.2, 0.4, 1.0, 1.0];
    /// Player while an invincibility effect is running
    pub const PLAYER_INVINCIBLE: Color = [0.6, 0.8, 1.0, 1.0];
}

/// Anything that can fill axis-aligned rectangles in world coordinates
pub trait RenderSurface {
    fn fill_rect(&mut self, rect: Aabb, color: Color);
}

/// Collects draw calls; useful for tests and for hosts that batch by frame
impl RenderSurface for Vec<(Aabb, Color)> {
    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.push((rect, color));
    }
}

/// Draw the whole level back to front
pub fn draw(sim: &LevelSimulation, surface: &mut dyn RenderSurface) {
    for platform in &sim.platforms {
        let color = match platform.kind {
            PlatformKind::Solid => colors::PLATFORM,
            PlatformKind::OneWay => colors::ONE_WAY,
            PlatformKind::Hazard { .. } => colors::HAZARD,
            PlatformKind::Artifact(_) => colors::ARTIFACT,
            PlatformKind::Exit => colors::EXIT,
        };
        surface.fill_rect(platform.rect, color);
    }

    for enemy in sim.enemies.iter().filter(|e| e.is_alive()) {
        surface.fill_rect(enemy.body.aabb(), colors::ENEMY);
    }

    for projectile in sim.projectiles.iter().filter(|p| p.attached) {
        let color = match projectile.owner {
            Owner::Player => colors::PLAYER_SHOT,
            Owner::Enemy => colors::ENEMY_SHOT,
        };
        surface.fill_rect(projectile.body.aabb(), color);
    }

    for particle in &sim.particles {
        let half = particle.size / 2.0;
        let rect = Aabb::new(
            particle.pos.x - half,
            particle.pos.y - half,
            particle.size,
            particle.size,
        );
        surface.fill_rect(rect, colors::PARTICLE);
    }

    for gate in &sim.puzzles {
        let color = match gate.state() {
            GateState::Locked => colors::GATE_LOCKED,
            _ => colors::GATE,
        };
        surface.fill_rect(gate.rect, color);
    }

    let player_color = if sim.player.is_invincible() {
        colors::PLAYER_INVINCIBLE
    } else {
        colors::PLAYER
    };
    surface.fill_rect(sim.player.body.aabb(), player_color);
}
