//! Level simulation state
//!
//! Owns every entity collection for one level plus the lifecycle controls the
//! hosting screen calls between frames (pause, resume, reset, dispose).

use glam::Vec2;

use super::enemy::Enemy;
use super::entity::EntityId;
use super::particle::Particle;
use super::player::{Item, Player};
use super::projectile::{Owner, Projectile, Shot};
use super::puzzle::{AnswerOutcome, LevelController, PuzzleGate, Question, QuestionBank};
use super::rect::Aabb;
use super::world::{Platform, PlatformKind};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::levels::{LevelData, LevelError, TileKind};
use crate::settings::Settings;

/// State shared with the host: the global pause flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationContext {
    pub paused: bool,
}

/// Where the level run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    Running,
    /// Player reached the exit
    Complete,
    /// Player died
    GameOver,
}

/// Outward notifications for the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDied,
    LevelComplete,
    PuzzleOpened { gate: EntityId, question: Question },
    PuzzleClosed { gate: EntityId, outcome: AnswerOutcome },
    Hint(String),
    ArtifactCollected { name: String },
    EnemyKilled { id: EntityId },
    ExitRequested,
    InventoryToggled,
}

/// Enemy liveness view handed to puzzle gates
pub(crate) struct EnemyRoster<'a> {
    pub enemies: &'a [Enemy],
    pub paused: bool,
}

impl LevelController for EnemyRoster<'_> {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn enemies_alive(&self, tracked: &[EntityId]) -> bool {
        self.enemies
            .iter()
            .any(|e| e.is_alive() && tracked.contains(&e.id))
    }
}

/// One level's simulation
pub struct LevelSimulation {
    pub ctx: SimulationContext,
    pub phase: LevelPhase,
    pub settings: Settings,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub world_width: f32,
    pub player: Player,
    /// World geometry in population order
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub puzzles: Vec<PuzzleGate>,
    /// Gate currently prompting, if any
    pub active_gate: Option<EntityId>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) audio: Box<dyn AudioSink>,
    level: LevelData,
    /// Questions drawn at population; reused by `reset`
    questions: Vec<Question>,
    disposed: bool,
    next_id: EntityId,
}

impl LevelSimulation {
    /// Validate the level, draw its questions, and populate it
    pub fn new(
        level: LevelData,
        settings: Settings,
        bank: &mut QuestionBank,
        ctx: SimulationContext,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, LevelError> {
        level.validate()?;
        let questions = bank.draw(level.puzzles.len());

        let mut sim = Self {
            ctx,
            phase: LevelPhase::Running,
            world_width: level.world_width(),
            player: Player::new(level.spawn_point(), &settings),
            settings,
            time: 0.0,
            time_ticks: 0,
            platforms: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            puzzles: Vec::new(),
            active_gate: None,
            events: Vec::new(),
            audio,
            level,
            questions,
            disposed: false,
            next_id: 1,
        };
        sim.populate();

        log::info!(
            "Level '{}' ready: {} platforms, {} enemies, {} puzzles",
            sim.level.name,
            sim.platforms.len(),
            sim.enemies.len(),
            sim.puzzles.len()
        );
        Ok(sim)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    /// Build every entity from the static level data
    fn populate(&mut self) {
        self.next_id = 1;
        self.time = 0.0;
        self.time_ticks = 0;
        self.active_gate = None;
        self.projectiles.clear();
        self.particles.clear();
        self.events.clear();

        let hazard_damage = self.level.hazard_damage.unwrap_or(self.settings.hazard_damage);
        let mut platforms = Vec::new();
        for (rect, kind) in self.level.geometry() {
            let kind = match kind {
                TileKind::Solid => PlatformKind::Solid,
                TileKind::OneWay => PlatformKind::OneWay,
                TileKind::Hazard => PlatformKind::Hazard {
                    damage: hazard_damage,
                },
            };
            let id = self.next_entity_id();
            platforms.push(Platform::new(id, rect, kind));
        }
        if let Some(artifact) = self.level.artifact.clone() {
            let id = self.next_entity_id();
            let rect = Aabb::new(artifact.x, artifact.y, TILE_SIZE, TILE_SIZE);
            let item = Item::new(artifact.name, artifact.effect);
            platforms.push(Platform::new(id, rect, PlatformKind::Artifact(item)));
        }
        if let Some([x, y]) = self.level.exit {
            let id = self.next_entity_id();
            let rect = Aabb::new(x, y, TILE_SIZE, TILE_SIZE * 2.0);
            platforms.push(Platform::new(id, rect, PlatformKind::Exit));
        }
        self.platforms = platforms;

        self.player = Player::new(self.level.spawn_point(), &self.settings);
        for item in self.level.starting_items.clone() {
            self.player.collect(item);
        }

        let mut enemies = Vec::with_capacity(self.level.enemies.len());
        for spawn in self.level.enemies.clone() {
            let id = self.next_entity_id();
            enemies.push(Enemy::new(id, Vec2::from(spawn), &self.settings, 0.0));
        }
        let tracked: Vec<EntityId> = enemies.iter().map(|e| e.id).collect();
        self.enemies = enemies;

        if self.questions.len() < self.level.puzzles.len() {
            log::warn!(
                "Level '{}' wants {} puzzles but only {} questions were available",
                self.level.name,
                self.level.puzzles.len(),
                self.questions.len()
            );
        }
        let mut puzzles = Vec::with_capacity(self.questions.len());
        for (point, question) in self.level.puzzles.clone().into_iter().zip(self.questions.clone()) {
            let id = self.next_entity_id();
            let rect = Aabb::new(point[0], point[1], GATE_SIZE, GATE_SIZE);
            puzzles.push(
                PuzzleGate::new(id, rect, question, self.settings.max_wrong_attempts)
                    .tracking(tracked.clone()),
            );
        }
        self.puzzles = puzzles;
    }

    // === Host controls ===

    pub fn pause(&mut self) {
        if !self.ctx.paused {
            log::debug!("Simulation paused");
        }
        self.ctx.paused = true;
    }

    /// Clear the pause flag unless a puzzle is open or the run has ended
    pub fn resume(&mut self) {
        if self.active_gate.is_some() || self.phase != LevelPhase::Running || self.disposed {
            log::debug!("Resume ignored (phase {:?})", self.phase);
            return;
        }
        if self.ctx.paused {
            log::debug!("Simulation resumed");
        }
        self.ctx.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.paused
    }

    /// Discard all entity state and rebuild the level's first frame
    pub fn reset(&mut self) {
        self.populate();
        self.phase = LevelPhase::Running;
        self.ctx.paused = false;
        self.disposed = false;
        log::info!("Level '{}' reset", self.level.name);
    }

    /// Release input bindings and stop stepping. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.player.dispose();
        self.disposed = true;
        log::info!("Level '{}' disposed", self.level.name);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True if any enemy in the level is alive
    pub fn enemies_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.is_alive())
    }

    pub fn active_puzzle(&self) -> Option<&PuzzleGate> {
        let id = self.active_gate?;
        self.puzzles.iter().find(|g| g.id == id)
    }

    /// Answer the prompting gate. Ignored when nothing is prompting.
    pub fn answer_puzzle(&mut self, choice: usize) -> AnswerOutcome {
        let Some(id) = self.active_gate else {
            return AnswerOutcome::Ignored;
        };
        let Some(gate) = self.puzzles.iter_mut().find(|g| g.id == id) else {
            self.active_gate = None;
            return AnswerOutcome::Ignored;
        };

        let outcome = gate.submit(choice);
        if outcome == AnswerOutcome::Ignored {
            return outcome;
        }
        log::info!("Gate {} answered: {:?}", id, outcome);

        self.active_gate = None;
        self.ctx.paused = false;
        self.audio.play(if outcome == AnswerOutcome::Correct {
            SoundEffect::Correct
        } else {
            SoundEffect::Incorrect
        });
        self.events.push(GameEvent::PuzzleClosed { gate: id, outcome });
        if let Some(hint) = outcome.hint() {
            self.events.push(GameEvent::Hint(hint));
        }
        self.puzzles.retain(|g| !g.solved);
        outcome
    }

    /// Close the prompt without answering; the gate can prompt again
    pub fn dismiss_puzzle(&mut self) {
        let Some(id) = self.active_gate.take() else {
            return;
        };
        if let Some(gate) = self.puzzles.iter_mut().find(|g| g.id == id) {
            gate.dismiss();
        }
        self.ctx.paused = false;
        self.events.push(GameEvent::PuzzleClosed {
            gate: id,
            outcome: AnswerOutcome::Ignored,
        });
    }

    // === Step helpers ===

    pub(crate) fn spawn_projectile(&mut self, shot: Shot, owner: Owner) {
        let id = self.next_entity_id();
        let projectile = Projectile::from_shot(
            id,
            shot,
            owner,
            self.settings.projectile_speed,
            self.settings.projectile_decay,
            self.time,
        );
        self.projectiles.push(projectile);
        self.audio.play(SoundEffect::Shoot);
    }

    /// Run player death once health is gone. Returns true if the player is dead.
    pub(crate) fn check_player_death(&mut self) -> bool {
        if self.player.dead {
            return true;
        }
        if !self.player.is_out_of_health() {
            return false;
        }
        self.player.die();
        self.phase = LevelPhase::GameOver;
        self.ctx.paused = true;
        self.audio.play(SoundEffect::GameOver);
        self.events.push(GameEvent::PlayerDied);
        log::info!("Player died in '{}'", self.level.name);
        true
    }

    pub(crate) fn complete(&mut self) {
        if self.phase != LevelPhase::Running {
            return;
        }
        self.phase = LevelPhase::Complete;
        self.events.push(GameEvent::LevelComplete);
        log::info!("Level '{}' complete", self.level.name);
    }
}
