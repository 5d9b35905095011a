//! Puzzle gates and the question bank they draw from
//!
//! A gate prompts when the player walks into it, pausing the simulation
//! until an answer arrives. Two wrong answers lock it until every enemy it
//! tracks has been killed.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::rect::Aabb;

/// Narrow view of the owning level that a gate may query
pub trait LevelController {
    fn is_paused(&self) -> bool;
    /// True if any of the given enemies is still alive
    fn enemies_alive(&self, tracked: &[EntityId]) -> bool;
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answers: Vec<String>,
    /// Index into `answers`
    pub correct: usize,
}

impl Question {
    pub fn new(prompt: &str, answers: &[&str], correct: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct,
        }
    }

    #[inline]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

/// Questions per built-in level (level 1 → 1, 2 → 2, 3 → 3)
pub fn puzzle_count_for_level(level: u32) -> usize {
    level.clamp(1, 3) as usize
}

/// Shared question pool, drawn from without replacement for a whole run
///
/// Owned by the application and lent to each level at population time.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pool: Vec<Question>,
    used: Vec<bool>,
    rng: Pcg32,
}

impl QuestionBank {
    pub fn new(pool: Vec<Question>, seed: u64) -> Self {
        let used = vec![false; pool.len()];
        Self {
            pool,
            used,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_default_pool(seed: u64) -> Self {
        Self::new(default_pool(), seed)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Questions not yet handed out this run
    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|u| !**u).count()
    }

    /// Draw up to `count` unused questions in shuffled order, marking them used
    pub fn draw(&mut self, count: usize) -> Vec<Question> {
        let mut unused: Vec<usize> = (0..self.pool.len()).filter(|&i| !self.used[i]).collect();
        unused.shuffle(&mut self.rng);

        if unused.len() < count {
            log::warn!(
                "Question pool exhausted: wanted {}, only {} left",
                count,
                unused.len()
            );
        }

        unused
            .into_iter()
            .take(count)
            .map(|i| {
                self.used[i] = true;
                self.pool[i].clone()
            })
            .collect()
    }

    pub fn draw_for_level(&mut self, level: u32) -> Vec<Question> {
        self.draw(puzzle_count_for_level(level))
    }

    /// Forget which questions were used (new run)
    pub fn reset(&mut self) {
        self.used.iter_mut().for_each(|u| *u = false);
    }
}

/// Observable state of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Dormant,
    Prompting,
    /// Waiting for tracked enemies to die
    Locked,
    Solved,
}

/// Result of submitting an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Gate was not prompting
    Ignored,
    Correct,
    Incorrect { remaining: u32 },
    /// Wrong-attempt threshold reached
    Locked,
}

impl AnswerOutcome {
    /// Message for the host UI
    pub fn hint(&self) -> Option<String> {
        match self {
            AnswerOutcome::Incorrect { remaining } => Some(format!(
                "Wrong answer! {} attempt{} left before the gate locks.",
                remaining,
                if *remaining == 1 { "" } else { "s" }
            )),
            AnswerOutcome::Locked => {
                Some("Too many wrong answers. Defeat the enemies to unlock this gate.".to_string())
            }
            AnswerOutcome::Ignored | AnswerOutcome::Correct => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleGate {
    pub id: EntityId,
    pub rect: Aabb,
    pub question: Question,
    pub solved: bool,
    pub prompting: bool,
    pub wrong_attempts: u32,
    pub max_wrong_attempts: u32,
    pub locked_until_enemies_dead: bool,
    pub tracked_enemies: Vec<EntityId>,
}

impl PuzzleGate {
    pub fn new(id: EntityId, rect: Aabb, question: Question, max_wrong_attempts: u32) -> Self {
        Self {
            id,
            rect,
            question,
            solved: false,
            prompting: false,
            wrong_attempts: 0,
            max_wrong_attempts,
            locked_until_enemies_dead: false,
            tracked_enemies: Vec::new(),
        }
    }

    pub fn tracking(mut self, enemies: Vec<EntityId>) -> Self {
        self.tracked_enemies = enemies;
        self
    }

    pub fn state(&self) -> GateState {
        if self.solved {
            GateState::Solved
        } else if self.prompting {
            GateState::Prompting
        } else if self.locked_until_enemies_dead {
            GateState::Locked
        } else {
            GateState::Dormant
        }
    }

    /// Check for the player walking in. Returns true when prompting starts.
    pub fn update(&mut self, player_box: &Aabb, level: &dyn LevelController) -> bool {
        if self.solved || self.prompting || level.is_paused() {
            return false;
        }
        if !self.rect.overlaps(player_box) {
            return false;
        }

        if self.locked_until_enemies_dead {
            if level.enemies_alive(&self.tracked_enemies) {
                return false;
            }
            log::info!("Gate {} unlocked: tracked enemies defeated", self.id);
            self.locked_until_enemies_dead = false;
            self.wrong_attempts = 0;
        }

        log::debug!("Gate {} prompting", self.id);
        self.prompting = true;
        true
    }

    pub fn submit(&mut self, choice: usize) -> AnswerOutcome {
        if self.solved || !self.prompting {
            return AnswerOutcome::Ignored;
        }
        self.prompting = false;

        if self.question.is_correct(choice) {
            self.solved = true;
            return AnswerOutcome::Correct;
        }

        self.wrong_attempts += 1;
        if self.wrong_attempts >= self.max_wrong_attempts {
            self.locked_until_enemies_dead = true;
            AnswerOutcome::Locked
        } else {
            AnswerOutcome::Incorrect {
                remaining: self.max_wrong_attempts - self.wrong_attempts,
            }
        }
    }

    /// Close the prompt without answering
    pub fn dismiss(&mut self) {
        self.prompting = false;
    }
}

fn default_pool() -> Vec<Question> {
    vec![
        Question::new(
            "Which civilization built the pyramids of Giza?",
            &["Romans", "Ancient Egyptians", "Aztecs", "Mongols"],
            1,
        ),
        Question::new(
            "What material was the Terracotta Army made of?",
            &["Bronze", "Marble", "Fired clay", "Jade"],
            2,
        ),
        Question::new(
            "The Rosetta Stone helped decode which script?",
            &["Hieroglyphs", "Cuneiform", "Linear B", "Runes"],
            0,
        ),
        Question::new(
            "Angkor Wat is located in which present-day country?",
            &["Thailand", "Vietnam", "Laos", "Cambodia"],
            3,
        ),
        Question::new(
            "Which city was buried by Mount Vesuvius in 79 AD?",
            &["Pompeii", "Athens", "Carthage", "Troy"],
            0,
        ),
        Question::new(
            "Machu Picchu was built by which people?",
            &["Maya", "Olmec", "Inca", "Toltec"],
            2,
        ),
        Question::new(
            "Stonehenge stands in which country?",
            &["Ireland", "England", "France", "Norway"],
            1,
        ),
        Question::new(
            "The Dong Son drums are bronze artifacts from which region?",
            &["Northern Vietnam", "Southern India", "Central Asia", "Korea"],
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakeLevel {
        paused: bool,
        alive: bool,
    }

    impl LevelController for FakeLevel {
        fn is_paused(&self) -> bool {
            self.paused
        }

        fn enemies_alive(&self, _tracked: &[EntityId]) -> bool {
            self.alive
        }
    }

    fn six_questions() -> Vec<Question> {
        (0..6)
            .map(|i| Question::new(&format!("Q{}", i), &["a", "b", "c"], i % 3))
            .collect()
    }

    fn gate() -> PuzzleGate {
        PuzzleGate::new(
            1,
            Aabb::new(100.0, 0.0, 40.0, 40.0),
            Question::new("?", &["yes", "no"], 0),
            2,
        )
    }

    const INSIDE: Aabb = Aabb {
        x: 110.0,
        y: 0.0,
        width: 40.0,
        height: 40.0,
    };

    const RUNNING: FakeLevel = FakeLevel {
        paused: false,
        alive: true,
    };

    #[test]
    fn test_draw_without_replacement_across_levels() {
        let mut bank = QuestionBank::new(six_questions(), 7);

        let level2 = bank.draw_for_level(2);
        assert_eq!(level2.len(), 2);
        assert_ne!(level2[0].prompt, level2[1].prompt);
        assert_eq!(bank.remaining(), 4);

        let level3 = bank.draw_for_level(3);
        assert_eq!(level3.len(), 3);
        assert_eq!(bank.remaining(), 1);

        let prompts: HashSet<_> = level2.iter().chain(level3.iter()).map(|q| q.prompt.clone()).collect();
        assert_eq!(prompts.len(), 5);
    }

    #[test]
    fn test_draw_when_exhausted() {
        let mut bank = QuestionBank::new(six_questions(), 7);
        assert_eq!(bank.draw(10).len(), 6);
        assert!(bank.draw(1).is_empty());
        bank.reset();
        assert_eq!(bank.remaining(), 6);
    }

    #[test]
    fn test_draw_is_seeded() {
        let mut a = QuestionBank::with_default_pool(42);
        let mut b = QuestionBank::with_default_pool(42);
        assert_eq!(a.draw(3), b.draw(3));
    }

    #[test]
    fn test_prompt_requires_overlap_and_unpaused() {
        let mut g = gate();
        assert!(!g.update(&Aabb::new(500.0, 0.0, 40.0, 40.0), &RUNNING));

        let paused = FakeLevel {
            paused: true,
            alive: false,
        };
        assert!(!g.update(&INSIDE, &paused));

        assert!(g.update(&INSIDE, &RUNNING));
        assert_eq!(g.state(), GateState::Prompting);
        // Already prompting
        assert!(!g.update(&INSIDE, &RUNNING));
    }

    #[test]
    fn test_correct_answer_solves() {
        let mut g = gate();
        g.update(&INSIDE, &RUNNING);
        assert_eq!(g.submit(0), AnswerOutcome::Correct);
        assert_eq!(g.state(), GateState::Solved);
        assert!(!g.update(&INSIDE, &RUNNING));
        assert_eq!(g.submit(0), AnswerOutcome::Ignored);
    }

    #[test]
    fn test_wrong_answers_lock_at_threshold() {
        let mut g = gate();
        g.update(&INSIDE, &RUNNING);
        assert_eq!(g.submit(1), AnswerOutcome::Incorrect { remaining: 1 });
        assert_eq!(g.wrong_attempts, 1);
        assert!(!g.locked_until_enemies_dead);

        g.update(&INSIDE, &RUNNING);
        assert_eq!(g.submit(1), AnswerOutcome::Locked);
        assert_eq!(g.wrong_attempts, 2);
        assert!(g.locked_until_enemies_dead);
        assert_eq!(g.state(), GateState::Locked);

        // Locked while enemies live
        assert!(!g.update(&INSIDE, &RUNNING));

        let cleared = FakeLevel {
            paused: false,
            alive: false,
        };
        assert!(g.update(&INSIDE, &cleared));
        assert!(!g.locked_until_enemies_dead);
        assert_eq!(g.wrong_attempts, 0);
    }

    #[test]
    fn test_submit_without_prompt_is_ignored() {
        let mut g = gate();
        assert_eq!(g.submit(1), AnswerOutcome::Ignored);
        assert_eq!(g.wrong_attempts, 0);
    }

    #[test]
    fn test_hints() {
        assert!(AnswerOutcome::Incorrect { remaining: 1 }.hint().unwrap().contains("1 attempt left"));
        assert!(AnswerOutcome::Locked.hint().is_some());
        assert!(AnswerOutcome::Correct.hint().is_none());
    }
}
