//! # rust-pairs
//!
//! A memory-matching ("pairs") game engine with no rendering attached.
//!
//! ## Design Principles
//!
//! 1. **Click Order Is Law**: clicked cards queue up and are paired strictly
//!    first-in, first-out, even while an earlier pair is still resolving.
//!
//! 2. **Time Is Injected**: every delay lives in a cancellable scheduler that
//!    only moves when the host calls `tick`. Tests drive time by hand.
//!
//! 3. **Cards Are a Capability**: the engine talks to a `Card` trait. What a
//!    flip looks like is the host's business.
//!
//! ## Modules
//!
//! - `core`: Card ids, configuration, RNG, scheduler
//! - `cards`: `Card` trait and the headless `SimCard`
//! - `events`: `MatchEvent` and the weak listener channel
//! - `engine`: Click queue and pair resolution
//! - `scoring`: Score, turns, combos, efficiency
//! - `grid`: Validated, shuffled deals
//! - `persistence`: Best records per board size
//! - `session`: The `GameSession` that ties it together
//! - `error`: Error types

pub mod core;
pub mod cards;
pub mod events;
pub mod engine;
pub mod scoring;
pub mod grid;
pub mod persistence;
pub mod session;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    CardId, CardPair, MatchId,
    GameRng, GameRngState,
    GridConfig, ScoringConfig, SessionConfig, TimingConfig,
    Scheduler,
};

pub use crate::cards::{Card, DisplayState, SimCard};

pub use crate::events::{EventChannel, EventLog, Listener, ListenerId, MatchEvent};

pub use crate::engine::{ClickQueue, MatchEngine};

pub use crate::scoring::{ScoreStats, ScoreTracker};

pub use crate::grid::{CardFactory, GridLayout, GridProvider, SimCardFactory};

pub use crate::persistence::{
    BestRecord, GameSummary, GridKey,
    RecordStore, MemoryStore, JsonFileStore,
};

pub use crate::session::{AudioCue, AudioSink, GamePhase, GameSession, SessionBuilder};

pub use crate::error::{ConfigError, GridError, SessionError, SessionWarning, StoreError};
