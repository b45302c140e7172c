//! Cards: the capability trait the engine drives, and a headless implementation.
//!
//! ## Key Types
//!
//! - `Card`: identity, display state, and animation commands
//! - `DisplayState`: `FaceDown | Flipping | FaceUp | Matched | Disappeared`
//! - `SimCard`: timed transitions without rendering

pub mod card;
pub mod sim;

pub use card::{AnimationCallback, Card, DisplayState};
pub use sim::SimCard;
