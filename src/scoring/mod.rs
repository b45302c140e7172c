//! Scoring: turns, combos and efficiency, fed by engine events.
//!
//! `ScoreTracker` implements [`Listener<MatchEvent>`](crate::events::Listener),
//! so it is usually shared as `Rc<RefCell<ScoreTracker>>` and subscribed to
//! the engine.

mod tracker;

pub use tracker::{ScoreStats, ScoreTracker};
