//! Decorative impact particles (never affect gameplay)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= 0.9;
        self.life -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Evenly spread burst at an impact point
pub fn burst(point: Vec2) -> impl Iterator<Item = Particle> {
    (0..PARTICLES_PER_HIT).map(move |i| {
        let angle = i as f32 / PARTICLES_PER_HIT as f32 * std::f32::consts::TAU;
        Particle {
            pos: point,
            vel: Vec2::from_angle(angle) * PARTICLE_SPEED,
            life: PARTICLE_LIFETIME,
            size: PARTICLE_SIZE,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_count_and_spread() {
        let particles: Vec<_> = burst(Vec2::new(10.0, 10.0)).collect();
        assert_eq!(particles.len(), PARTICLES_PER_HIT);
        let sum: Vec2 = particles.iter().map(|p| p.vel).sum();
        assert!(sum.length() < 1e-3);
    }

    #[test]
    fn test_particles_fade() {
        let mut p = burst(Vec2::ZERO).next().unwrap();
        for _ in 0..30 {
            p.update(SIM_DT);
        }
        assert!(!p.is_alive());
    }
}
