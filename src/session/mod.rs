//! Game orchestration.
//!
//! [`GameSession`] is the root object a host creates: it deals grids, routes
//! clicks and frame time to the engine, turns engine events into audio cues,
//! and saves the result when the last pair is found.

mod audio;
mod game;

pub use audio::{AudioCue, AudioSink, CueLog};
pub use game::{GamePhase, GameSession, SessionBuilder};
