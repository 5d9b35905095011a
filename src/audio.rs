//! Audio triggers
//!
//! The simulation only names sounds; mixing and playback belong to the host.
//! Calls are fire-and-forget and never block the step.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player or enemy fired a projectile
    Shoot,
    /// Puzzle answered correctly
    Correct,
    /// Puzzle answered incorrectly
    Incorrect,
    /// Player died
    GameOver,
}

impl SoundEffect {
    /// Stable event name for host sound tables
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Correct => "correct",
            SoundEffect::Incorrect => "incorrect",
            SoundEffect::GameOver => "gameover",
        }
    }
}

/// Sink for sound triggers
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every trigger
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs triggers instead of playing them (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sound: {}", effect.name());
    }
}

/// Records triggers in order; handy for hosts that batch sounds per frame
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}
