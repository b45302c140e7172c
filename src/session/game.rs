//! The game session: owns the engine and its collaborators and runs one game
//! at a time.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;

use super::audio::{AudioCue, AudioSink};
use crate::core::{CardId, GridConfig, SessionConfig};
use crate::engine::MatchEngine;
use crate::error::{SessionError, SessionWarning};
use crate::events::{EventLog, MatchEvent};
use crate::grid::{CardFactory, GridLayout, GridProvider, SimCardFactory};
use crate::persistence::{BestRecord, GameSummary, GridKey, RecordStore};
use crate::scoring::{ScoreStats, ScoreTracker};

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// No game dealt.
    #[default]
    Idle,
    Playing,
    /// Time and the engine are frozen.
    Paused,
    /// Every pair is matched. Animations still run.
    Over,
}

/// One player's game, from deal to saved result.
///
/// Built with [`GameSession::builder`]. The session subscribes the score
/// tracker and its own event inbox to the engine, so scoring happens as the
/// engine emits; audio cues and game over are handled on the next
/// [`tick`](Self::tick).
///
/// ```
/// use std::time::Duration;
///
/// use rust_pairs::core::{GridConfig, SessionConfig};
/// use rust_pairs::session::{GamePhase, GameSession};
///
/// let config = SessionConfig::new().with_seed(1);
/// let mut session = GameSession::builder().with_config(&config).unwrap().build().unwrap();
///
/// session.start(GridConfig::new(2, 2)).unwrap();
/// assert_eq!(session.phase(), GamePhase::Playing);
///
/// session.tick(Duration::from_millis(16));
/// assert_eq!(session.elapsed(), Duration::from_millis(16));
/// ```
pub struct GameSession {
    engine: MatchEngine,
    tracker: Rc<RefCell<ScoreTracker>>,
    inbox: Rc<RefCell<EventLog<MatchEvent>>>,
    grid: GridProvider,
    factory: Box<dyn CardFactory>,
    store: Option<Box<dyn RecordStore>>,
    audio: Option<Box<dyn AudioSink>>,

    phase: GamePhase,
    layout: Option<GridLayout>,
    elapsed: Duration,
    last_summary: Option<GameSummary>,
    last_record: Option<BestRecord>,
    warnings: Vec<SessionWarning>,
}

impl GameSession {
    /// Start building a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Deal a new game on `grid` and start playing.
    ///
    /// An invalid grid is reported before anything changes; the previous
    /// game, if any, is left as it was.
    pub fn start(&mut self, grid: GridConfig) -> Result<(), SessionError> {
        let layout = self.grid.generate(grid)?;

        self.engine.clear_all();
        self.engine.register_all(layout.deal(self.factory.as_mut()));
        self.layout = Some(layout);
        self.begin();

        log::info!("game started on {} grid", grid);
        Ok(())
    }

    /// Start the current grid over: every card face down, score zeroed.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let grid = self
            .layout
            .as_ref()
            .map(GridLayout::config)
            .ok_or(SessionError::NoActiveGrid)?;

        self.engine.reset_game();
        self.begin();

        log::info!("game restarted on {} grid", grid);
        Ok(())
    }

    fn begin(&mut self) {
        self.tracker.borrow_mut().reset();
        self.inbox.borrow_mut().take();
        self.elapsed = Duration::ZERO;
        self.last_summary = None;
        self.last_record = None;
        self.phase = GamePhase::Playing;
    }

    /// Freeze a running game. Returns `false` unless the game was playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    /// Continue a paused game. Returns `false` unless the game was paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Abandon the game and return to [`GamePhase::Idle`]. Nothing is saved.
    pub fn quit(&mut self) {
        self.engine.clear_all();
        self.tracker.borrow_mut().reset();
        self.inbox.borrow_mut().take();
        self.layout = None;
        self.elapsed = Duration::ZERO;
        self.phase = GamePhase::Idle;
    }

    // =========================================================================
    // Input and time
    // =========================================================================

    /// Forward a click to the engine. Only honored while playing.
    pub fn click(&mut self, id: CardId) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let accepted = self.engine.handle_click(id);
        if accepted {
            self.cue(AudioCue::Flip);
        }
        accepted
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, dt: Duration) {
        match self.phase {
            GamePhase::Playing => {
                self.elapsed += dt;
                self.engine.tick(dt);
            }
            GamePhase::Over => self.engine.tick(dt),
            GamePhase::Paused | GamePhase::Idle => return,
        }
        self.drain_inbox();
    }

    fn drain_inbox(&mut self) {
        let events = self.inbox.borrow_mut().take();
        for event in events {
            match event {
                MatchEvent::Matched(_) => self.cue(AudioCue::Match),
                MatchEvent::Mismatched(_) => self.cue(AudioCue::Mismatch),
                MatchEvent::AllMatched => self.finish(),
            }
        }
    }

    fn finish(&mut self) {
        if self.phase == GamePhase::Over {
            return;
        }
        self.phase = GamePhase::Over;
        self.cue(AudioCue::Victory);

        let stats = self.tracker.borrow().snapshot();
        let summary = GameSummary {
            score: stats.score,
            combo: stats.highest_combo,
            efficiency: stats.efficiency,
            turns: stats.turns,
            matches: stats.matches,
            time: self.elapsed,
            played_at: Utc::now(),
        };
        log::info!(
            "game over: score {} in {} turns ({:.1}s)",
            summary.score,
            summary.turns,
            summary.time.as_secs_f64()
        );

        if let (Some(store), Some(layout)) = (self.store.as_mut(), self.layout.as_ref()) {
            let key = GridKey::from(layout.config());
            match store.update(key, &summary) {
                Ok(record) => self.last_record = Some(record),
                Err(source) => {
                    log::warn!("failed to save result for {}: {}", key, source);
                    self.warnings.push(SessionWarning::SaveFailed {
                        key: key.to_string(),
                        source,
                    });
                }
            }
        }
        self.last_summary = Some(summary);
    }

    fn cue(&mut self, cue: AudioCue) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play(cue);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Playing time of the current game. Pauses excluded.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Current score numbers.
    #[must_use]
    pub fn stats(&self) -> ScoreStats {
        self.tracker.borrow().snapshot()
    }

    #[must_use]
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// The layout in play, if a game was started.
    #[must_use]
    pub fn layout(&self) -> Option<&GridLayout> {
        self.layout.as_ref()
    }

    /// Result of the last finished game.
    #[must_use]
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }

    /// Record saved for the last finished game, if a store accepted it.
    #[must_use]
    pub fn last_record(&self) -> Option<&BestRecord> {
        self.last_record.as_ref()
    }

    /// Stored record for `grid`. `None` without a store or on a read error.
    #[must_use]
    pub fn best_record(&self, grid: GridConfig) -> Option<BestRecord> {
        let store = self.store.as_ref()?;
        match store.get(GridKey::from(grid)) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("failed to read record for {}: {}", grid, e);
                None
            }
        }
    }

    /// Non-fatal problems so far.
    #[must_use]
    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    /// Take and clear the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<SessionWarning> {
        std::mem::take(&mut self.warnings)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`GameSession`].
///
/// The engine, score tracker and grid provider are required. The card
/// factory defaults to [`SimCardFactory`]; without a record store results
/// are not saved, and without an audio sink cues are dropped.
#[derive(Default)]
pub struct SessionBuilder {
    engine: Option<MatchEngine>,
    tracker: Option<ScoreTracker>,
    grid: Option<GridProvider>,
    factory: Option<Box<dyn CardFactory>>,
    store: Option<Box<dyn RecordStore>>,
    audio: Option<Box<dyn AudioSink>>,
}

impl SessionBuilder {
    /// Fill the engine, tracker and grid provider from `config`.
    pub fn with_config(self, config: &SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(self
            .with_engine(MatchEngine::new(config.timing))
            .with_tracker(ScoreTracker::new(config.scoring))
            .with_grid_provider(GridProvider::from_config(config)))
    }

    #[must_use]
    pub fn with_engine(mut self, engine: MatchEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_tracker(mut self, tracker: ScoreTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    #[must_use]
    pub fn with_grid_provider(mut self, grid: GridProvider) -> Self {
        self.grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_card_factory(mut self, factory: impl CardFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: impl RecordStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Wire everything together.
    pub fn build(self) -> Result<GameSession, SessionError> {
        let mut engine = self
            .engine
            .ok_or(SessionError::MissingCollaborator("match engine"))?;
        let tracker = self
            .tracker
            .ok_or(SessionError::MissingCollaborator("score tracker"))?;
        let grid = self
            .grid
            .ok_or(SessionError::MissingCollaborator("grid provider"))?;

        let tracker = Rc::new(RefCell::new(tracker));
        let inbox = EventLog::shared();
        engine.subscribe(&tracker);
        engine.subscribe(&inbox);

        Ok(GameSession {
            engine,
            tracker,
            inbox,
            grid,
            factory: self
                .factory
                .unwrap_or_else(|| Box::new(SimCardFactory::new())),
            store: self.store,
            audio: self.audio,
            phase: GamePhase::Idle,
            layout: None,
            elapsed: Duration::ZERO,
            last_summary: None,
            last_record: None,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, MatchId};

    fn session() -> GameSession {
        GameSession::builder()
            .with_config(&SessionConfig::new().with_seed(3))
            .unwrap()
            .build()
            .unwrap()
    }

    /// Ids of the two cards showing `face`.
    fn pair_of(session: &GameSession, face: MatchId) -> (CardId, CardId) {
        let ids: Vec<CardId> = session
            .layout()
            .unwrap()
            .faces()
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == face)
            .map(|(i, _)| CardId::new(i as u32))
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn test_missing_collaborators() {
        let err = GameSession::builder().build().err().unwrap();
        assert!(matches!(err, SessionError::MissingCollaborator("match engine")));

        let err = GameSession::builder()
            .with_engine(MatchEngine::default())
            .with_tracker(ScoreTracker::default())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::MissingCollaborator("grid provider")));
    }

    #[test]
    fn test_optional_collaborators() {
        let session = GameSession::builder()
            .with_engine(MatchEngine::default())
            .with_tracker(ScoreTracker::default())
            .with_grid_provider(GridProvider::new(4, GameRng::new(1)))
            .build()
            .unwrap();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.best_record(GridConfig::new(2, 2)), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig::new().with_timing(
            crate::core::TimingConfig::new().with_reveal_hold(Duration::ZERO),
        );
        assert!(matches!(
            GameSession::builder().with_config(&config),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_bad_grid_leaves_session_alone() {
        let mut session = session();
        assert!(matches!(
            session.start(GridConfig::new(3, 3)),
            Err(SessionError::Grid(_))
        ));
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(session.layout().is_none());
    }

    #[test]
    fn test_restart_without_grid() {
        assert!(matches!(session().restart(), Err(SessionError::NoActiveGrid)));
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut session = session();
        session.start(GridConfig::new(2, 2)).unwrap();

        session.tick(Duration::from_millis(100));
        assert!(session.pause());
        session.tick(Duration::from_millis(500));
        assert!(!session.click(CardId(0)));
        assert_eq!(session.elapsed(), Duration::from_millis(100));

        assert!(session.resume());
        assert!(!session.resume());
        session.tick(Duration::from_millis(50));
        assert_eq!(session.elapsed(), Duration::from_millis(150));
    }

    #[test]
    fn test_full_game_ends_over() {
        let mut session = session();
        session.start(GridConfig::new(2, 2)).unwrap();

        let mut faces = session.layout().unwrap().faces().to_vec();
        faces.sort();
        faces.dedup();
        assert_eq!(faces.len(), 2);

        for face in faces {
            let (a, b) = pair_of(&session, face);
            session.click(a);
            session.click(b);
            session.tick(Duration::from_secs(2));
        }

        assert_eq!(session.phase(), GamePhase::Over);
        let summary = session.last_summary().unwrap();
        assert_eq!(summary.matches, 2);
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.score, 250);
    }
}
