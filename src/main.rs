//! Recycle Rush entry point
//!
//! Headless native driver: runs the simulation in demo mode on a fixed-step
//! accumulator, forwards audio cues to a logging backend and prints the
//! ranking when done.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use recycle_rush::audio::AudioManager;
use recycle_rush::consts::*;
use recycle_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use recycle_rush::{Settings, TextFileStore, Tuning};

#[derive(Debug, Parser)]
#[command(name = "recycle-rush", version, about = "Falling-waste sorting game (headless demo)")]
struct Args {
    /// Settings file (JSON)
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Balance override file (JSON); takes precedence over the settings entry
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Ranking file; takes precedence over the settings entry
    #[arg(long)]
    ranking: Option<PathBuf>,

    /// RNG seed; random when neither this nor the settings give one
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Host frame length fed to the accumulator (seconds)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame: f32,

    /// Write the effective settings back to the settings file and exit
    #[arg(long)]
    write_settings: bool,
}

/// Host loop state
struct Game {
    state: GameState<TextFileStore>,
    audio: AudioManager,
    accumulator: f32,
    input: TickInput,
    sessions: u32,
}

impl Game {
    fn new(state: GameState<TextFileStore>, settings: &Settings) -> Self {
        let mut audio = AudioManager::default();
        audio.apply_settings(settings);
        Self {
            state,
            audio,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            sessions: 0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.intents.clear();

            self.handle_events();
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Cue(cue) => self.audio.dispatch(cue),
                GameEvent::PhaseChanged { to: GamePhase::GameOver, .. } => {
                    self.sessions += 1;
                    if let Some(over) = self.state.snapshot().highlight {
                        log::info!("Session {} placed #{}", self.sessions, over + 1);
                    }
                }
                GameEvent::TierUp { tier } => log::debug!("Tier {}", tier),
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Recycle Rush (headless) starting...");

    let mut settings = Settings::load(&args.settings);
    if let Some(path) = args.tuning {
        settings.tuning_path = Some(path);
    }
    if let Some(path) = args.ranking {
        settings.ranking_path = path;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }

    if args.write_settings {
        settings
            .save(&args.settings)
            .with_context(|| format!("writing {}", args.settings.display()))?;
        return Ok(());
    }

    let tuning = Tuning::load_or_default(settings.tuning_path.as_deref());
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Seed {}", seed);

    let store = TextFileStore::new(&settings.ranking_path);
    let state = GameState::new(seed, tuning, store, &settings.player_name);
    let mut game = Game::new(state, &settings);

    let frames = (args.seconds / args.frame.max(f32::EPSILON)).ceil() as u64;
    for _ in 0..frames {
        game.update(args.frame);
        if game.state.quit_requested {
            break;
        }
    }

    println!(
        "{} ticks, {} finished sessions, phase {:?}",
        game.state.time_ticks,
        game.sessions,
        game.state.phase()
    );
    if let Some(session) = game.state.session() {
        println!(
            "Current session: score {}, misses {}/{}, tier {}",
            session.score,
            session.misses,
            game.state.tuning.max_misses,
            session.difficulty.tier
        );
    }
    println!("Ranking ({}):", settings.ranking_path.display());
    for (i, entry) in game.state.ranking_display().iter().enumerate() {
        println!("{:>2}. {:<16} {:>5}", i + 1, entry.name, entry.score);
    }
    Ok(())
}
