//! The card capability consumed by the engine.
//!
//! The engine never draws anything. It reads a card's face value and
//! display state and issues three commands: flip to front, flip to back,
//! and play the matched animation. How a card animates is up to the host;
//! [`SimCard`](super::SimCard) is the headless implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, MatchId};

/// Invoked exactly once when a commanded transition finishes.
pub type AnimationCallback = Box<dyn FnOnce(CardId)>;

/// What the player currently sees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayState {
    /// Back showing; the only state that accepts clicks.
    #[default]
    FaceDown,
    /// Mid-flip in either direction.
    Flipping,
    /// Face showing.
    FaceUp,
    /// Playing the matched animation.
    Matched,
    /// Gone from the table after a match.
    Disappeared,
}

impl DisplayState {
    /// Check if the card is in a transitional state.
    #[must_use]
    pub const fn is_transitional(self) -> bool {
        matches!(self, Self::Flipping | Self::Matched)
    }
}

/// A card on the table.
///
/// Implementations must call each command's callback exactly once, after
/// the visual transition finishes. Issuing a new command while one is
/// still running finishes the running one first.
pub trait Card: std::fmt::Debug {
    /// Instance id.
    fn id(&self) -> CardId;

    /// Face value compared against the other card of a pair.
    fn identity(&self) -> MatchId;

    /// Current display state.
    fn display_state(&self) -> DisplayState;

    /// Whether a click on this card should notify the engine.
    ///
    /// Cards only raise a click while face down.
    fn accepts_click(&self) -> bool {
        self.display_state() == DisplayState::FaceDown
    }

    /// Reveal the face.
    fn flip_to_front(&mut self, on_complete: Option<AnimationCallback>);

    /// Hide the face.
    fn flip_to_back(&mut self, on_complete: Option<AnimationCallback>);

    /// Play the matched animation; the card ends up `Disappeared`.
    fn play_matched_animation(&mut self, on_complete: Option<AnimationCallback>);

    /// Advance any running animation by `dt`.
    fn update(&mut self, _dt: Duration) {}
}
