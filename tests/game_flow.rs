//! Whole-game scenarios driven through the public tick API

use std::io;
use std::path::PathBuf;

use proptest::prelude::*;

use recycle_rush::consts::SIM_DT;
use recycle_rush::error::{RankingError, RankingResult};
use recycle_rush::sim::{GameEvent, GamePhase, GameState, Intent, TickInput, tick};
use recycle_rush::{MemoryStore, Ranking, RankingEntry, RankingStore, TextFileStore, Tuning};

/// Store that can read but never write
struct ReadOnlyStore(Vec<RankingEntry>);

impl RankingStore for ReadOnlyStore {
    fn load(&self) -> RankingResult<Vec<RankingEntry>> {
        Ok(self.0.clone())
    }

    fn save(&mut self, _entries: &[RankingEntry]) -> RankingResult<()> {
        Err(RankingError::Write {
            path: PathBuf::from("read-only"),
            source: io::Error::other("read-only store"),
        })
    }
}

fn idle() -> TickInput {
    TickInput {
        idle_mode: true,
        ..Default::default()
    }
}

/// Tick until the game is over, checking session invariants on the way
fn play_until_game_over<S: RankingStore>(state: &mut GameState<S>, input: &TickInput) -> u64 {
    let max_misses = state.tuning.max_misses;
    let mut last_count = 0;
    for t in 0..200_000u64 {
        tick(state, input, SIM_DT);
        match state.session() {
            Some(session) => {
                assert!(session.misses <= max_misses);
                let count = session.entities.len();
                assert!(count >= last_count, "entity count shrank at tick {t}");
                assert!(count >= 1 && count <= session.difficulty.max_entities);
                last_count = count;
            }
            None => {
                assert_eq!(state.phase(), GamePhase::GameOver);
                return t;
            }
        }
    }
    panic!("session never ended");
}

#[test]
fn test_unattended_session_ends_and_is_recorded() {
    let mut state = GameState::new(2024, Tuning::default(), MemoryStore::new(), "Nobody");
    tick(&mut state, &TickInput::with_intent(Intent::Confirm), SIM_DT);

    play_until_game_over(&mut state, &TickInput::default());

    let snapshot = state.snapshot();
    assert_eq!(snapshot.phase, GamePhase::GameOver);
    assert_eq!(state.store().saves, 1);
    assert_eq!(state.ranking().len(), 1);
    assert_eq!(state.ranking().entries()[0].name, "Nobody");
    assert_eq!(state.ranking().entries()[0].score, snapshot.score);
    assert_eq!(snapshot.highlight, Some(0));
}

#[test]
fn test_miss_events_count_up_to_budget() {
    let mut state = GameState::new(77, Tuning::default(), MemoryStore::new(), "Counter");
    tick(&mut state, &TickInput::with_intent(Intent::Confirm), SIM_DT);
    state.drain_events();

    play_until_game_over(&mut state, &TickInput::default());

    let misses: Vec<u32> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::Missed { misses, .. } => Some(misses),
            _ => None,
        })
        .collect();
    let max = Tuning::default().max_misses;
    assert_eq!(misses, (1..=max).collect::<Vec<_>>());
}

#[test]
fn test_demo_sessions_persist_across_restarts() {
    let path = std::env::temp_dir().join(format!(
        "recycle_rush_flow_{}.txt",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let tuning = Tuning {
        max_misses: 2,
        ..Default::default()
    };
    let mut state = GameState::new(5, tuning.clone(), TextFileStore::new(&path), "Demo");
    let mut finished = 0;
    for _ in 0..500_000 {
        tick(&mut state, &idle(), SIM_DT);
        let ended = state.drain_events().into_iter().any(|e| {
            matches!(e, GameEvent::PhaseChanged { to: GamePhase::GameOver, .. })
        });
        if ended {
            finished += 1;
            if finished == 2 {
                break;
            }
        }
    }
    assert_eq!(finished, 2);

    let reopened = GameState::new(6, tuning, TextFileStore::new(&path), "Other");
    let entries = reopened.ranking().entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].score >= entries[1].score);
    assert!(entries.iter().all(|e| e.name == "Demo"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_unwritable_store_keeps_result_in_memory() {
    let store = ReadOnlyStore(vec![RankingEntry::new("old", 3)]);
    let mut state = GameState::new(11, Tuning::default(), store, "New");
    tick(&mut state, &TickInput::with_intent(Intent::Confirm), SIM_DT);

    play_until_game_over(&mut state, &TickInput::default());

    assert_eq!(state.ranking().len(), 2);
    assert!(state.ranking().position_of("New", state.snapshot().score).is_some());

    // Returning home reloads from the store, which never changed
    tick(&mut state, &TickInput::with_intent(Intent::Back), SIM_DT);
    assert_eq!(state.phase(), GamePhase::Home);
    assert_eq!(state.ranking().entries(), &[RankingEntry::new("old", 3)]);
}

#[test]
fn test_pause_resume_round_trip_mid_game() {
    let mut state = GameState::new(8, Tuning::default(), MemoryStore::new(), "P");
    tick(&mut state, &TickInput::with_intent(Intent::Confirm), SIM_DT);
    for _ in 0..400 {
        tick(&mut state, &idle(), SIM_DT);
    }
    let before = state.screen().clone();

    recycle_rush::sim::apply_intent(&mut state, Intent::Pause);
    recycle_rush::sim::apply_intent(&mut state, Intent::Resume);

    assert_eq!(state.screen(), &before);
}

proptest! {
    #[test]
    fn prop_ranking_stays_sorted(scores in proptest::collection::vec(0u32..1000, 0..40)) {
        let mut ranking = Ranking::new();
        for (i, &score) in scores.iter().enumerate() {
            let rank = ranking.insert(format!("p{i}"), score);
            prop_assert!(rank >= 1 && rank <= ranking.len());
        }
        prop_assert_eq!(ranking.len(), scores.len());
        prop_assert!(ranking.entries().windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert!(ranking.top(5).len() <= 5);
    }

    #[test]
    fn prop_text_store_load_is_sorted(scores in proptest::collection::vec(0u32..1000, 1..20)) {
        let path = std::env::temp_dir().join(format!(
            "recycle_rush_prop_{}.txt",
            std::process::id()
        ));
        let mut store = TextFileStore::new(&path);
        let entries: Vec<RankingEntry> = scores
            .iter()
            .map(|&s| RankingEntry::new("name with spaces", s))
            .collect();
        store.save(&entries).unwrap();
        let loaded = Ranking::from_entries(store.load().unwrap());
        let _ = std::fs::remove_file(&path);

        prop_assert_eq!(loaded.len(), scores.len());
        prop_assert!(loaded.entries().windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert!(loaded.entries().iter().all(|e| e.name == "name with spaces"));
    }
}
