//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collector::Steer;
use super::collision::resolve;
use super::state::{GameEvent, GamePhase, GameState, Screen};
use crate::category::Category;
use crate::ranking::RankingStore;

/// Discrete player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Switch the collector's category (Playing only)
    SelectCategory(Category),
    /// Pause; also resumes when already paused
    Pause,
    Resume,
    /// Start from Home, restart from GameOver
    Confirm,
    /// New session from Paused or GameOver
    Restart,
    /// Back to Home from Paused or GameOver
    Back,
    Quit,
    /// Name entry on Home
    NameChar(char),
    NameBackspace,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held steering keys
    pub move_left: bool,
    pub move_right: bool,
    /// One-shot intents, applied in order before the tick advances
    pub intents: Vec<Intent>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl Intent {
    /// Category hotkeys 1..=5
    pub fn select_key(key: u8) -> Option<Self> {
        Category::from_key(key).map(Intent::SelectCategory)
    }
}

impl TickInput {
    pub fn with_intent(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<S: RankingStore>(state: &mut GameState<S>, input: &TickInput, dt: f32) {
    for &intent in &input.intents {
        apply_intent(state, intent);
    }

    // Idle/demo mode - skip the menus once their intro has played
    if input.idle_mode {
        let intro_done = match &state.screen {
            Screen::Home(home) => home.progress() >= 1.0,
            Screen::GameOver(over) => over.progress() >= 1.0,
            _ => false,
        };
        if intro_done {
            state.start_session();
        }
    }

    state.time_ticks += 1;

    let mut game_over = false;
    match &mut state.screen {
        Screen::Home(home) => {
            home.timer += dt;
            home.field.tick(dt, &mut state.rng);
        }
        Screen::Playing(session) => {
            session.ticks += 1;

            if input.idle_mode {
                // Chase the entity closest to the ground and match its category
                if let Some(i) = session.entities.lowest() {
                    let target = session.entities.entities()[i];
                    session.collector.select(target.category);
                    session.collector.move_toward(target.pos.x, dt);
                }
            } else {
                let steer = Steer::from_held(input.move_left, input.move_right);
                session.collector.steer(steer, dt);
            }

            session.entities.tick_spawner(&mut state.rng, &session.difficulty);
            session.entities.tick(dt);
            game_over = resolve(session, &mut state.rng, &state.tuning, &mut state.events);
        }
        Screen::Paused(_) => {}
        Screen::GameOver(over) => {
            over.animate(dt);
            over.field.tick(dt, &mut state.rng);
        }
    }

    if game_over {
        state.end_session();
    }
}

/// Apply one intent. Intents that mean nothing in the current phase are
/// ignored.
pub fn apply_intent<S: RankingStore>(state: &mut GameState<S>, intent: Intent) {
    if intent == Intent::Quit {
        if !state.quit_requested {
            log::info!("Quit requested");
            state.quit_requested = true;
            state.emit(GameEvent::QuitRequested);
        }
        return;
    }

    match (state.phase(), intent) {
        (GamePhase::Home, Intent::Confirm) => state.start_session(),
        (GamePhase::Home, Intent::NameChar(c)) => {
            let len = state.player_name.chars().count();
            if (c.is_ascii_graphic() || c == ' ') && len < state.tuning.max_name_len {
                state.player_name.push(c);
            }
        }
        (GamePhase::Home, Intent::NameBackspace) => {
            state.player_name.pop();
        }

        (GamePhase::Playing, Intent::SelectCategory(category)) => {
            if let Screen::Playing(session) = &mut state.screen {
                session.collector.select(category);
            }
        }
        (GamePhase::Playing, Intent::Pause) => {
            state.pause();
        }

        (GamePhase::Paused, Intent::Pause | Intent::Resume) => {
            state.resume();
        }
        (GamePhase::Paused, Intent::Restart) => state.start_session(),
        (GamePhase::Paused, Intent::Back) => state.go_home(),

        (GamePhase::GameOver, Intent::Confirm | Intent::Restart) => state.start_session(),
        (GamePhase::GameOver, Intent::Back) => state.go_home(),

        (phase, intent) => log::trace!("Ignoring {:?} in {:?}", intent, phase),
    }
}
