//! Fixed timestep simulation tick
//!
//! One call advances a level by exactly one frame. Stage order is fixed:
//! input, projectiles, enemies, player collision, player integration,
//! puzzle gates, particles. Removals happen after each stage's sweep so no
//! entity is skipped or visited twice.

use super::collision;
use super::particle::burst;
use super::projectile::{Owner, ProjectileOutcome};
use super::state::{EnemyRoster, GameEvent, LevelPhase, LevelSimulation};

/// Keys held during a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (wins over `right` when both are held)
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Leave the level (edge-triggered)
    pub exit: bool,
    /// Toggle the inventory overlay (edge-triggered)
    pub inventory: bool,
}

/// Advance the level by one fixed timestep
pub fn tick(sim: &mut LevelSimulation, input: &TickInput, dt: f32) {
    // Checked once; nothing below mutates state while paused or finished
    if sim.is_disposed() || sim.ctx.paused || sim.phase != LevelPhase::Running {
        return;
    }

    sim.time_ticks += 1;
    sim.time += dt as f64;
    let now = sim.time;

    // === Input ===
    let intents = sim.player.process_input(input);
    if intents.exit_requested {
        sim.events.push(GameEvent::ExitRequested);
    }
    if intents.inventory_toggled {
        sim.events.push(GameEvent::InventoryToggled);
    }
    if let Some(shot) = intents.shot {
        sim.spawn_projectile(shot, Owner::Player);
    }

    // === Projectiles ===
    update_projectiles(sim, dt, now);
    if sim.check_player_death() {
        return;
    }

    // === Enemies ===
    update_enemies(sim, dt, now);
    if sim.check_player_death() {
        return;
    }

    // === Player collision ===
    let report = collision::resolve(&mut sim.player, &mut sim.platforms);
    for item in report.collected {
        sim.events.push(GameEvent::ArtifactCollected { name: item.name });
    }
    if sim.check_player_death() {
        return;
    }
    if report.reached_exit {
        sim.complete();
        return;
    }

    sim.player.integrate(dt, sim.world_width);

    // === Puzzle gates ===
    update_puzzles(sim);

    // === Particles ===
    for particle in &mut sim.particles {
        particle.update(dt);
    }
    sim.particles.retain(|p| p.is_alive());
}

fn update_projectiles(sim: &mut LevelSimulation, dt: f32, now: f64) {
    let LevelSimulation {
        projectiles,
        platforms,
        enemies,
        player,
        particles,
        events,
        ..
    } = sim;

    for projectile in projectiles.iter_mut() {
        match projectile.update(dt, now, platforms, enemies, player) {
            ProjectileOutcome::HitEnemy { index, point } => {
                let enemy = &mut enemies[index];
                enemy.body.current_health -= projectile.damage;
                particles.extend(burst(point));
                log::debug!(
                    "Enemy {} hit for {} ({} left)",
                    enemy.id,
                    projectile.damage,
                    enemy.body.current_health
                );
            }
            ProjectileOutcome::HitPlayer { point } => {
                player.take_damage(projectile.damage);
                particles.extend(burst(point));
            }
            _ => {}
        }
    }
    projectiles.retain(|p| p.attached);

    for enemy in enemies.iter().filter(|e| !e.is_alive()) {
        log::info!("Enemy {} killed", enemy.id);
        events.push(GameEvent::EnemyKilled { id: enemy.id });
    }
    enemies.retain(|e| e.is_alive());
}

fn update_enemies(sim: &mut LevelSimulation, dt: f32, now: f64) {
    let world_width = sim.world_width;
    let mut shots = Vec::new();
    for enemy in &mut sim.enemies {
        let update = enemy.update(dt, now, &mut sim.player, &sim.platforms, world_width);
        if let Some(shot) = update.shot {
            shots.push(shot);
        }
    }
    for shot in shots {
        sim.spawn_projectile(shot, Owner::Enemy);
    }
}

fn update_puzzles(sim: &mut LevelSimulation) {
    let roster = EnemyRoster {
        enemies: &sim.enemies,
        paused: sim.ctx.paused,
    };
    let player_box = sim.player.body.aabb();

    let mut opened = None;
    for gate in &mut sim.puzzles {
        if gate.update(&player_box, &roster) {
            opened = Some((gate.id, gate.question.clone()));
            break;
        }
    }

    if let Some((gate, question)) = opened {
        log::info!("Gate {} opened: {}", gate, question.prompt);
        sim.active_gate = Some(gate);
        sim.ctx.paused = true;
        sim.events.push(GameEvent::PuzzleOpened { gate, question });
    }
    sim.puzzles.retain(|g| !g.solved);
}

impl LevelSimulation {
    /// Advance by one fixed timestep; see [`tick`]
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }
}
