//! Artifact Hunter headless driver
//!
//! Runs one level with a scripted input sequence on a fixed-step clock and
//! logs what happens. Usage: `artifact-hunter [settings.json] [level.json]`.
//! Without a level path the first built-in level is played.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use artifact_hunter::consts::*;
    use artifact_hunter::render::{self, Color};
    use artifact_hunter::sim::{
        Aabb, GameEvent, LevelPhase, LevelSimulation, QuestionBank, SimulationContext, TickInput,
    };
    use artifact_hunter::{LevelData, LogAudio, Settings};

    /// Give up after this much simulated time
    const MAX_SECONDS: f32 = 120.0;
    /// Seed for question selection
    const QUESTION_SEED: u64 = 0x5eed;

    /// Host frame lengths; uneven on purpose to exercise the accumulator
    const FRAME_TIMES: [f32; 3] = [1.0 / 50.0, 1.0 / 144.0, 1.0 / 60.0];

    /// Walk right, hop every second, fire whenever the gun is ready
    fn scripted_input(tick: u64) -> TickInput {
        TickInput {
            right: true,
            jump: tick % 60 < 12,
            shoot: true,
            ..Default::default()
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args: Vec<String> = std::env::args().collect();

        let settings = match args.get(1) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let level = match args.get(2) {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                log::info!("Loaded level from {}", path);
                LevelData::from_json(&json)?
            }
            None => LevelData::builtin(1)?,
        };

        let mut bank = QuestionBank::with_default_pool(QUESTION_SEED);
        let mut sim = LevelSimulation::new(
            level,
            settings,
            &mut bank,
            SimulationContext::default(),
            Box::new(LogAudio),
        )?;

        let mut accumulator = 0.0f32;
        let mut elapsed = 0.0f32;
        let mut frame = 0usize;
        let mut draw_calls: Vec<(Aabb, Color)> = Vec::new();

        while sim.phase == LevelPhase::Running && elapsed < MAX_SECONDS {
            let dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
            frame += 1;
            elapsed += dt;
            accumulator += dt.min(0.1);

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = scripted_input(sim.time_ticks);
                sim.step(&input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            // Stand-in for the puzzle dialog: always pick the right answer
            if let Some(gate) = sim.active_puzzle() {
                let choice = gate.question.correct;
                log::info!("Q: {} -> {}", gate.question.prompt, gate.question.answers[choice]);
                sim.answer_puzzle(choice);
            }

            for event in sim.drain_events() {
                match event {
                    GameEvent::PuzzleOpened { .. } | GameEvent::PuzzleClosed { .. } => {
                        log::debug!("{:?}", event)
                    }
                    other => log::info!("event: {:?}", other),
                }
            }

            draw_calls.clear();
            render::draw(&sim, &mut draw_calls);
        }

        log::info!(
            "Finished in phase {:?} after {:.1}s ({} ticks): health {}/{}, items [{}], {} rects last frame",
            sim.phase,
            sim.time,
            sim.time_ticks,
            sim.player.body.current_health,
            sim.player.body.max_health,
            sim.player.inventory.names().join(", "),
            draw_calls.len()
        );

        sim.dispose();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Artifact Hunter (headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly
}
