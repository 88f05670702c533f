//! Game state and the screens it moves between
//!
//! Everything a screen owns lives inside its [`Screen`] variant, so leaving a
//! screen drops its state: the session is gone once the game ends, the
//! ambient field is gone once play starts.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collector::Collector;
use super::difficulty::Difficulty;
use super::entity::{FallingEntity, FallingEntityManager};
use super::particles::{Particle, ParticleField};
use crate::audio::{AudioCue, MusicTrack};
use crate::consts::*;
use crate::ranking::{Ranking, RankingEntry, RankingStore};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with drifting debris and name entry
    Home,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; trash rain and ranking
    GameOver,
}

/// Why a miss was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissKind {
    /// Reached the ground uncollected
    Floor,
    /// Collected with the wrong category selected
    WrongBin,
}

/// Events produced during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(AudioCue),
    Scored { score: u32 },
    Missed { kind: MissKind, misses: u32 },
    TierUp { tier: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    QuitRequested,
}

/// One play session: score, misses, difficulty and everything on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub score: u32,
    pub misses: u32,
    pub difficulty: Difficulty,
    pub entities: FallingEntityManager,
    pub collector: Collector,
    /// Playing ticks elapsed
    pub ticks: u64,
}

impl Session {
    /// Fresh tier-1 session with one entity already falling
    pub fn new<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        let difficulty = Difficulty::initial(tuning);
        let mut entities = FallingEntityManager::new();
        entities.spawn_one(rng, &difficulty);
        Self {
            score: 0,
            misses: 0,
            difficulty,
            entities,
            collector: Collector::default(),
            ticks: 0,
        }
    }

    /// Count a miss, never past the budget
    pub fn record_miss(&mut self, tuning: &Tuning) {
        self.misses = (self.misses + 1).min(tuning.max_misses);
    }
}

/// Title screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeScreen {
    pub field: ParticleField,
    /// Seconds on this screen
    pub timer: f32,
    /// Intro length (seconds)
    pub duration: f32,
}

impl HomeScreen {
    pub fn new(field: ParticleField, duration: f32) -> Self {
        Self {
            field,
            timer: 0.0,
            duration,
        }
    }

    /// Intro progress (0..1)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.timer / self.duration).min(1.0)
        }
    }
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new(
            ParticleField::new(super::particles::FieldMode::Ambient(Default::default())),
            0.0,
        )
    }
}

/// Terminal tilt of the collector sprite (degrees)
pub const GAMEOVER_FINAL_TILT: f32 = -90.0;
/// Tilt change per tick (degrees)
pub const GAMEOVER_TILT_STEP: f32 = 2.0;
/// Displayed score closes 1/N of the remaining gap per tick
pub const SCORE_CHASE_DIVISOR: u32 = 15;

/// Game-over screen and its presentation animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverScreen {
    pub final_score: u32,
    /// Counts up toward `final_score`
    pub displayed_score: u32,
    pub field: ParticleField,
    /// Seconds on this screen
    pub timer: f32,
    pub duration: f32,
    /// Progress fraction after which text overlays show
    pub overlay_threshold: f32,
    /// Collector sprite pose: tilt in degrees, 0 upright
    pub tilt: f32,
    pub collector: Collector,
    start_y: f32,
    /// Index of this run's entry in the displayed ranking
    pub highlight: Option<usize>,
}

impl GameOverScreen {
    pub fn new(
        final_score: u32,
        collector: Collector,
        field: ParticleField,
        tuning: &Tuning,
        highlight: Option<usize>,
    ) -> Self {
        Self {
            final_score,
            displayed_score: 0,
            field,
            timer: 0.0,
            duration: tuning.gameover_duration,
            overlay_threshold: tuning.gameover_overlay_threshold,
            tilt: 0.0,
            start_y: collector.y,
            collector,
            highlight,
        }
    }

    /// Animation progress (0..1)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.timer / self.duration).min(1.0)
        }
    }

    pub fn overlays_visible(&self) -> bool {
        self.progress() > self.overlay_threshold
    }

    /// Advance the presentation by one tick (does not touch the particles)
    pub fn animate(&mut self, dt: f32) {
        self.timer += dt;

        let remaining = self.final_score - self.displayed_score;
        if remaining > 0 {
            self.displayed_score += (remaining / SCORE_CHASE_DIVISOR).max(1);
        }

        self.tilt = (self.tilt - GAMEOVER_TILT_STEP).max(GAMEOVER_FINAL_TILT);
        // Lying on its side the box rests on its long edge
        let target_y = FLOOR_Y + self.collector.width / 2.0;
        let t = (self.tilt / GAMEOVER_FINAL_TILT).abs();
        self.collector.y = self.start_y + (target_y - self.start_y) * t;
    }
}

/// What the game is doing right now, with the state that belongs to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    Home(HomeScreen),
    Playing(Session),
    Paused(Session),
    GameOver(GameOverScreen),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Home(HomeScreen::default())
    }
}

impl Screen {
    pub fn phase(&self) -> GamePhase {
        match self {
            Screen::Home(_) => GamePhase::Home,
            Screen::Playing(_) => GamePhase::Playing,
            Screen::Paused(_) => GamePhase::Paused,
            Screen::GameOver(_) => GamePhase::GameOver,
        }
    }

    /// The session, while one exists
    pub fn session(&self) -> Option<&Session> {
        match self {
            Screen::Playing(session) | Screen::Paused(session) => Some(session),
            _ => None,
        }
    }
}

/// Read-only view handed to the renderer after each tick
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub entities: &'a [FallingEntity],
    pub collector: Option<Collector>,
    pub particles: &'a [Particle],
    pub score: u32,
    pub misses: u32,
    pub tier: u32,
    /// Home intro or game-over animation progress (0..1); 0 elsewhere
    pub progress: f32,
    /// Game over: the counting-up score and whether text is shown yet
    pub displayed_score: u32,
    pub overlays_visible: bool,
    /// Collector sprite tilt (degrees)
    pub tilt: f32,
    pub ranking: &'a [RankingEntry],
    pub highlight: Option<usize>,
    pub player_name: &'a str,
}

/// Complete game state
///
/// Owns the seeded RNG and the ranking store. Only [`super::tick::tick`]
/// and the transition methods below mutate it.
pub struct GameState<S: RankingStore> {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub(crate) screen: Screen,
    /// Ranking as last loaded for display
    pub(crate) ranking: Ranking,
    pub(crate) store: S,
    pub player_name: String,
    pub(crate) events: Vec<GameEvent>,
    pub quit_requested: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl<S: RankingStore> GameState<S> {
    /// Create a game sitting on the home screen
    pub fn new(seed: u64, tuning: Tuning, store: S, player_name: &str) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = ParticleField::ambient(&tuning, &mut rng);
        let home = HomeScreen::new(field, tuning.home_duration);
        let mut player_name: String = player_name
            .chars()
            .filter(|c| !c.is_control())
            .take(tuning.max_name_len)
            .collect();
        if player_name.trim().is_empty() {
            player_name = DEFAULT_PLAYER_NAME.to_string();
        }
        let mut state = Self {
            seed,
            rng,
            tuning,
            screen: Screen::Home(home),
            ranking: Ranking::new(),
            store,
            player_name,
            events: Vec::new(),
            quit_requested: false,
            time_ticks: 0,
        };
        state.reload_ranking();
        state.emit(GameEvent::Cue(AudioCue::Music(MusicTrack::Menu)));
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.screen.phase()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.screen.session()
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Entries shown on screen
    pub fn ranking_display(&self) -> &[RankingEntry] {
        self.ranking.top(self.tuning.ranking_display)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let mut snap = Snapshot {
            phase: self.phase(),
            entities: &[],
            collector: None,
            particles: &[],
            score: 0,
            misses: 0,
            tier: 0,
            progress: 0.0,
            displayed_score: 0,
            overlays_visible: false,
            tilt: 0.0,
            ranking: self.ranking_display(),
            highlight: None,
            player_name: &self.player_name,
        };
        match &self.screen {
            Screen::Home(home) => {
                snap.particles = home.field.particles();
                snap.progress = home.progress();
            }
            Screen::Playing(session) | Screen::Paused(session) => {
                snap.entities = session.entities.entities();
                snap.collector = Some(session.collector);
                snap.score = session.score;
                snap.misses = session.misses;
                snap.tier = session.difficulty.tier;
            }
            Screen::GameOver(over) => {
                snap.particles = over.field.particles();
                snap.collector = Some(over.collector);
                snap.score = over.final_score;
                snap.progress = over.progress();
                snap.displayed_score = over.displayed_score;
                snap.overlays_visible = over.overlays_visible();
                snap.tilt = over.tilt;
                snap.highlight = over.highlight;
            }
        }
        snap
    }

    fn change_screen(&mut self, from: GamePhase, screen: Screen) {
        self.screen = screen;
        let to = self.phase();
        if from != to {
            log::info!("{:?} -> {:?}", from, to);
            self.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Start a new session (from Home, Paused or GameOver)
    pub fn start_session(&mut self) {
        if self.player_name.trim().is_empty() {
            self.player_name = DEFAULT_PLAYER_NAME.to_string();
        }
        let from = self.phase();
        let session = Session::new(&mut self.rng, &self.tuning);
        self.change_screen(from, Screen::Playing(session));
        self.emit(GameEvent::Cue(AudioCue::Music(MusicTrack::Gameplay)));
    }

    /// Suspend the running session. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        match std::mem::take(&mut self.screen) {
            Screen::Playing(session) => {
                self.change_screen(GamePhase::Playing, Screen::Paused(session));
                true
            }
            other => {
                self.screen = other;
                false
            }
        }
    }

    /// Resume a paused session exactly where it stopped
    pub fn resume(&mut self) -> bool {
        match std::mem::take(&mut self.screen) {
            Screen::Paused(session) => {
                self.change_screen(GamePhase::Paused, Screen::Playing(session));
                true
            }
            other => {
                self.screen = other;
                false
            }
        }
    }

    /// Back to the title screen, discarding any session
    pub fn go_home(&mut self) {
        let from = self.phase();
        self.reload_ranking();
        let field = ParticleField::ambient(&self.tuning, &mut self.rng);
        let home = HomeScreen::new(field, self.tuning.home_duration);
        self.change_screen(from, Screen::Home(home));
        self.emit(GameEvent::Cue(AudioCue::Music(MusicTrack::Menu)));
    }

    /// End the running session: record the score and show the game-over screen
    pub fn end_session(&mut self) {
        let from = self.phase();
        let session = match std::mem::take(&mut self.screen) {
            Screen::Playing(session) | Screen::Paused(session) => session,
            other => {
                self.screen = other;
                return;
            }
        };

        let final_score = session.score;
        self.record_score(final_score);
        // First row with this name and score, as long as it is on screen
        let highlight = self
            .ranking
            .position_of(&self.player_name, final_score)
            .filter(|&i| i < self.tuning.ranking_display);

        let field = ParticleField::cascade(&self.tuning);
        let over = GameOverScreen::new(final_score, session.collector, field, &self.tuning, highlight);
        self.change_screen(from, Screen::GameOver(over));
        self.emit(GameEvent::Cue(AudioCue::Music(MusicTrack::GameOver)));
    }

    /// Merge a result into the stored ranking and refresh the display copy
    fn record_score(&mut self, score: u32) {
        let mut merged = match self.store.load() {
            Ok(entries) => Ranking::from_entries(entries),
            Err(err) => {
                // Saving over a file we couldn't read would lose its records
                log::warn!("{err}; result kept in memory only");
                self.ranking.insert(self.player_name.clone(), score);
                return;
            }
        };

        let rank = merged.insert(self.player_name.clone(), score);
        if let Some(cap) = self.tuning.ranking_storage_cap {
            merged.truncate(cap);
        }

        match self.store.save(merged.entries()) {
            Ok(()) => {
                log::info!("Recorded {} for {} (rank {})", score, self.player_name, rank);
                self.ranking = merged;
                self.reload_ranking();
            }
            Err(err) => {
                log::warn!("{err}; ranking not saved");
                self.ranking = merged;
            }
        }
    }

    /// Load the ranking from the store; keep the current one on failure
    pub fn reload_ranking(&mut self) {
        match self.store.load() {
            Ok(entries) => self.ranking = Ranking::from_entries(entries),
            Err(err) => log::warn!("{err}; keeping previous ranking"),
        }
    }
}
