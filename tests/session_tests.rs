//! Game session integration tests.
//!
//! Sessions here deal seeded 2x2 grids, so a game is two pairs long. Each
//! `play` call clicks two cards and runs the engine for two seconds, which
//! covers one full cycle with the default timing.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use rust_pairs::cards::DisplayState;
use rust_pairs::core::{CardId, GridConfig, MatchId, SessionConfig};
use rust_pairs::error::{SessionError, SessionWarning, StoreError};
use rust_pairs::persistence::{
    BestRecord, GameSummary, GridKey, JsonFileStore, MemoryStore, RecordStore,
};
use rust_pairs::session::{AudioCue, CueLog, GamePhase, GameSession};

const GRID: GridConfig = GridConfig::new(2, 2);

fn config() -> SessionConfig {
    SessionConfig::new().with_seed(11)
}

fn plain_session() -> GameSession {
    GameSession::builder()
        .with_config(&config())
        .unwrap()
        .build()
        .unwrap()
}

/// The two pairs of the dealt grid, lowest face first.
fn pairs(session: &GameSession) -> Vec<(CardId, CardId)> {
    let faces = session.layout().unwrap().faces();
    let mut distinct: Vec<MatchId> = faces.to_vec();
    distinct.sort();
    distinct.dedup();

    distinct
        .into_iter()
        .map(|face| {
            let ids: Vec<CardId> = faces
                .iter()
                .enumerate()
                .filter(|(_, f)| **f == face)
                .map(|(i, _)| CardId(i as u32))
                .collect();
            (ids[0], ids[1])
        })
        .collect()
}

fn play(session: &mut GameSession, a: CardId, b: CardId) {
    session.click(a);
    session.click(b);
    session.tick(Duration::from_secs(2));
}

/// Miss once, then clear both pairs.
fn play_out(session: &mut GameSession) {
    let p = pairs(session);
    play(session, p[0].0, p[1].0);
    play(session, p[0].0, p[0].1);
    play(session, p[1].0, p[1].1);
}

/// Store whose writes always fail.
struct ReadOnlyStore;

impl RecordStore for ReadOnlyStore {
    fn get(&self, _key: GridKey) -> Result<Option<BestRecord>, StoreError> {
        Ok(None)
    }

    fn update(&mut self, _key: GridKey, _summary: &GameSummary) -> Result<BestRecord, StoreError> {
        Err(StoreError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn delete(&mut self, _key: GridKey) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<GridKey>, StoreError> {
        Ok(Vec::new())
    }
}

// =============================================================================
// Full games
// =============================================================================

#[test]
fn test_game_is_scored_and_saved() {
    let store = Rc::new(RefCell::new(MemoryStore::new()));
    let audio = Rc::new(RefCell::new(CueLog::new()));
    let mut session = GameSession::builder()
        .with_config(&config())
        .unwrap()
        .with_store(Rc::clone(&store))
        .with_audio(Rc::clone(&audio))
        .build()
        .unwrap();

    session.start(GRID).unwrap();
    play_out(&mut session);

    assert_eq!(session.phase(), GamePhase::Over);
    let summary = session.last_summary().unwrap().clone();
    assert_eq!(summary.turns, 3);
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.score, 250);
    assert_eq!(summary.combo, 2);
    assert_eq!(summary.time, Duration::from_secs(6));

    let record = store.borrow().get(GridKey::new(2, 2)).unwrap().unwrap();
    assert_eq!(record.high_score, 250);
    assert_eq!(record.games_played, 1);
    assert_eq!(session.last_record(), Some(&record));
    assert_eq!(session.best_record(GRID), Some(record));
    assert!(session.warnings().is_empty());

    use AudioCue::*;
    assert_eq!(
        audio.borrow().cues(),
        &[Flip, Flip, Mismatch, Flip, Flip, Match, Flip, Flip, Match, Victory]
    );
}

#[test]
fn test_game_saved_to_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let mut session = GameSession::builder()
        .with_config(&config())
        .unwrap()
        .with_store(JsonFileStore::open(&path).unwrap())
        .build()
        .unwrap();
    session.start(GRID).unwrap();
    play_out(&mut session);

    let reopened = JsonFileStore::open(&path).unwrap();
    let record = reopened.get(GridKey::new(2, 2)).unwrap().unwrap();
    assert_eq!(record.last_turns, 3);
    assert_eq!(record.last_time_secs, 6.0);
}

#[test]
fn test_save_failure_is_a_warning() {
    let mut session = GameSession::builder()
        .with_config(&config())
        .unwrap()
        .with_store(ReadOnlyStore)
        .build()
        .unwrap();

    session.start(GRID).unwrap();
    play_out(&mut session);

    assert_eq!(session.phase(), GamePhase::Over);
    assert!(session.last_summary().is_some());
    assert!(session.last_record().is_none());
    assert!(matches!(
        session.warnings(),
        [SessionWarning::SaveFailed { key, .. }] if key == "2x2"
    ));

    assert_eq!(session.take_warnings().len(), 1);
    assert!(session.warnings().is_empty());
}

#[test]
fn test_game_without_store_still_ends() {
    let mut session = plain_session();
    session.start(GRID).unwrap();
    play_out(&mut session);

    assert_eq!(session.phase(), GamePhase::Over);
    assert!(session.last_record().is_none());
    assert!(session.warnings().is_empty());
}

#[test]
fn test_over_keeps_animating_but_not_timing() {
    let mut session = plain_session();
    session.start(GRID).unwrap();
    play_out(&mut session);

    let elapsed = session.elapsed();
    let now = session.engine().now();
    session.tick(Duration::from_secs(1));

    assert_eq!(session.elapsed(), elapsed);
    assert_eq!(session.engine().now(), now + Duration::from_secs(1));
    assert!(!session.click(CardId(0)));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_restart_same_grid() {
    let store = Rc::new(RefCell::new(MemoryStore::new()));
    let mut session = GameSession::builder()
        .with_config(&config())
        .unwrap()
        .with_store(Rc::clone(&store))
        .build()
        .unwrap();

    session.start(GRID).unwrap();
    let faces = session.layout().unwrap().faces().to_vec();
    play_out(&mut session);

    session.restart().unwrap();
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.elapsed(), Duration::ZERO);
    assert_eq!(session.stats().score, 0);
    assert!(session.last_summary().is_none());
    assert_eq!(session.layout().unwrap().faces(), faces.as_slice());
    for id in session.engine().card_ids() {
        assert_eq!(
            session.engine().card(id).unwrap().display_state(),
            DisplayState::FaceDown
        );
    }

    play_out(&mut session);
    let record = store.borrow().get(GridKey::new(2, 2)).unwrap().unwrap();
    assert_eq!(record.games_played, 2);
}

#[test]
fn test_restart_mid_game_drops_pending_cycle() {
    let mut session = plain_session();
    session.start(GRID).unwrap();

    let p = pairs(&session);
    session.click(p[0].0);
    session.click(p[1].0);
    session.tick(Duration::from_millis(400));
    assert_eq!(session.stats().turns, 1);

    session.restart().unwrap();
    session.tick(Duration::from_secs(5));

    assert_eq!(session.stats().turns, 0);
    assert!(!session.engine().is_processing());
}

#[test]
fn test_new_grid_replaces_old() {
    let mut session = plain_session();
    session.start(GRID).unwrap();
    session.click(CardId(0));

    session.start(GridConfig::new(4, 4)).unwrap();
    assert_eq!(session.engine().total_cards(), 16);
    assert_eq!(session.engine().queued_count(), 0);
    assert_eq!(session.layout().unwrap().config(), GridConfig::new(4, 4));
}

#[test]
fn test_invalid_grid_keeps_current_game() {
    let mut session = plain_session();
    session.start(GRID).unwrap();
    session.tick(Duration::from_millis(250));

    let err = session.start(GridConfig::new(5, 5)).unwrap_err();
    assert!(matches!(err, SessionError::Grid(_)));

    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.layout().unwrap().config(), GRID);
    assert_eq!(session.elapsed(), Duration::from_millis(250));
    assert_eq!(session.engine().total_cards(), 4);
}

#[test]
fn test_too_few_faces() {
    let mut session = GameSession::builder()
        .with_config(&config().with_face_count(2))
        .unwrap()
        .build()
        .unwrap();

    assert!(session.start(GridConfig::new(2, 2)).is_ok());
    assert!(matches!(
        session.start(GridConfig::new(2, 3)),
        Err(SessionError::Grid(_))
    ));
}

#[test]
fn test_quit_returns_to_idle() {
    let mut session = plain_session();
    session.start(GRID).unwrap();
    session.tick(Duration::from_millis(100));

    session.quit();
    assert_eq!(session.phase(), GamePhase::Idle);
    assert!(session.layout().is_none());
    assert_eq!(session.engine().total_cards(), 0);
    assert!(!session.click(CardId(0)));

    session.tick(Duration::from_secs(1));
    assert_eq!(session.elapsed(), Duration::ZERO);
    assert!(matches!(session.restart(), Err(SessionError::NoActiveGrid)));
}

#[test]
fn test_pause_blocks_input_and_time() {
    let mut session = plain_session();
    session.start(GRID).unwrap();

    let p = pairs(&session);
    session.click(p[0].0);
    session.click(p[0].1);
    assert!(session.pause());
    assert!(!session.pause());

    session.tick(Duration::from_secs(5));
    assert_eq!(session.stats().matches, 0);
    assert!(!session.click(p[1].0));

    assert!(session.resume());
    session.tick(Duration::from_millis(300));
    assert_eq!(session.stats().matches, 1);
}

#[test]
fn test_config_from_json() {
    let config = SessionConfig::from_json_str(
        r#"{
            "seed": 5,
            "face_count": 3,
            "scoring": { "base_points": 10, "combo_bonus_per_step": 1, "max_combo": 2 },
            "timing": { "reveal_hold": { "secs": 0, "nanos": 100000000 } }
        }"#,
    )
    .unwrap();

    let mut session = GameSession::builder()
        .with_config(&config)
        .unwrap()
        .build()
        .unwrap();
    session.start(GridConfig::new(2, 3)).unwrap();

    let p = pairs(&session);
    session.click(p[0].0);
    session.click(p[0].1);
    session.tick(Duration::from_millis(100));
    assert_eq!(session.stats().score, 10);
}
