//! Core building blocks: card ids, configuration, RNG, and the scheduler.
//!
//! Nothing here knows about game rules. The engine, scoring and session
//! modules are built on top of these types.

pub mod entity;
pub mod config;
pub mod rng;
pub mod clock;

pub use entity::{CardId, CardPair, MatchId};
pub use config::{GridConfig, ScoringConfig, SessionConfig, TimingConfig};
pub use rng::{GameRng, GameRngState};
pub use clock::{Scheduler, TaskId};
