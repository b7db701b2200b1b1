//! Tile Recall headless demo
//!
//! Plays a seeded game with a scripted player at a fixed timestep and logs
//! every transition. Run with `RUST_LOG=info tile-recall [SEED] [SETTINGS]`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use clap::Parser;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tile_recall::consts::*;
    use tile_recall::sim::{
        EventKind, GameEvent, ResourceHandle, TargetId, TargetRegistry, TickInput, TurnController,
        TurnState, Urgency,
    };
    use tile_recall::{GameSettings, SettingsError};

    /// Nine floor tiles, each with its own visual and sound
    const TILE_COUNT: u64 = 9;
    /// Seconds between the scripted player's steps
    const REACTION_TIME: f64 = 0.7;
    /// Hard stop for the demo (simulated seconds)
    const MAX_SIM_SECONDS: f64 = 600.0;

    #[derive(Parser, Debug)]
    #[command(
        name = "tile-recall",
        version,
        about = "Plays a seeded Tile Recall game with a scripted player"
    )]
    pub struct Cli {
        /// Seed for pattern generation and the scripted player
        #[arg(default_value_t = 12345)]
        pub seed: u64,

        /// JSON settings file; defaults are used when omitted
        pub settings: Option<PathBuf>,
    }

    /// What the scripted player remembers and intends to do next
    #[derive(Default)]
    struct Memory {
        pattern: Vec<TargetId>,
        prompted: bool,
        critical: bool,
    }

    pub fn run(seed: u64, settings: GameSettings) {
        let registry = TargetRegistry::from_resources(
            (0..TILE_COUNT).map(|i| (Some(ResourceHandle(100 + i)), Some(ResourceHandle(200 + i)))),
        );
        let mut game = TurnController::with_seed(registry, settings, seed);
        // Separate stream so player mistakes don't perturb pattern generation
        let mut player_rng = Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);

        let memory = Rc::new(RefCell::new(Memory::default()));
        {
            let m = memory.clone();
            game.subscribe(EventKind::PatternStart, move |_| m.borrow_mut().pattern.clear());
            let m = memory.clone();
            game.subscribe(EventKind::TargetHighlighted, move |e| {
                if let GameEvent::TargetHighlighted { target, .. } = e {
                    m.borrow_mut().pattern.push(*target);
                }
            });
            let m = memory.clone();
            game.subscribe(EventKind::NextLevelPrompt, move |_| m.borrow_mut().prompted = true);
            let m = memory.clone();
            game.subscribe(EventKind::RemainingTimeChanged, move |e| {
                if let GameEvent::RemainingTimeChanged { urgency, .. } = e {
                    m.borrow_mut().critical = *urgency == Urgency::Critical;
                }
            });
        }
        game.subscribe(EventKind::PlayerSuccess, |e| println!("  {:?}", e));
        game.subscribe(EventKind::PlayerFail, |e| println!("  {:?}", e));

        let mut input = TickInput {
            start_game: true,
            ..Default::default()
        };
        let mut next_step_at = 0.0f64;
        let mut bonus_available = true;

        while game.clock() < MAX_SIM_SECONDS {
            game.tick(&input, SIM_DT);
            input = TickInput::default();

            match game.state() {
                TurnState::AwaitingInput if game.clock() >= next_step_at => {
                    let cursor = game.input_index();
                    let remembered = memory.borrow().pattern.get(cursor).copied();
                    if let Some(expected) = remembered {
                        // Mistakes get likelier as patterns grow
                        let slip = 0.02 * game.progress().level as f64;
                        let target = if player_rng.random_bool(slip.min(0.5)) {
                            TargetId(player_rng.random_range(0..TILE_COUNT as usize))
                        } else {
                            expected
                        };
                        input.steps.push(target);
                    }
                    next_step_at = game.clock() + REACTION_TIME;

                    if bonus_available && memory.borrow().critical {
                        input.time_bonus = Some(POWER_UP_BONUS_SECS);
                        bonus_available = false;
                    }
                }
                TurnState::Success if memory.borrow().prompted => {
                    memory.borrow_mut().prompted = false;
                    input.entered_reset_zone = true;
                }
                TurnState::Failed => break,
                _ => {}
            }
        }

        let progress = game.progress();
        println!(
            "Game over after {:.1}s: reached level {}, score {}",
            game.clock(),
            progress.level,
            progress.score
        );
    }

    pub fn load_settings(path: Option<PathBuf>) -> Result<GameSettings, SettingsError> {
        match path {
            Some(path) => GameSettings::load(path),
            None => Ok(GameSettings::default()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();

    let cli = demo::Cli::parse();
    let seed = cli.seed;
    let settings = match demo::load_settings(cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Tile Recall (native demo) starting with seed {}", seed);
    demo::run(seed, settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host; there is no standalone web entry point
}
