//! Headless card with timed transitions.
//!
//! `SimCard` is what the grid factory deals by default. It has no visuals;
//! transitions just take time. With zero durations every command settles
//! immediately, which is what most tests want.

use std::time::Duration;

use crate::core::{CardId, MatchId};

use super::card::{AnimationCallback, Card, DisplayState};

/// A running transition.
struct Animation {
    remaining: Duration,
    settle: DisplayState,
    on_complete: Option<AnimationCallback>,
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("remaining", &self.remaining)
            .field("settle", &self.settle)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Headless card implementation.
///
/// ```
/// use std::time::Duration;
/// use rust_pairs::cards::{Card, DisplayState, SimCard};
/// use rust_pairs::core::{CardId, MatchId};
///
/// let mut card = SimCard::new(CardId::new(0), MatchId::new(3))
///     .with_flip_duration(Duration::from_millis(200));
///
/// card.flip_to_front(None);
/// assert_eq!(card.display_state(), DisplayState::Flipping);
///
/// card.update(Duration::from_millis(200));
/// assert_eq!(card.display_state(), DisplayState::FaceUp);
/// ```
#[derive(Debug)]
pub struct SimCard {
    id: CardId,
    identity: MatchId,
    state: DisplayState,

    /// Grid position (row, column), if dealt from a layout.
    slot: Option<(u32, u32)>,

    flip_duration: Duration,
    vanish_duration: Duration,
    animation: Option<Animation>,
}

impl SimCard {
    /// Create a face-down card whose transitions settle instantly.
    #[must_use]
    pub fn new(id: CardId, identity: MatchId) -> Self {
        Self {
            id,
            identity,
            state: DisplayState::FaceDown,
            slot: None,
            flip_duration: Duration::ZERO,
            vanish_duration: Duration::ZERO,
            animation: None,
        }
    }

    /// Set how long a flip takes in either direction.
    #[must_use]
    pub fn with_flip_duration(mut self, duration: Duration) -> Self {
        self.flip_duration = duration;
        self
    }

    /// Set how long the matched animation takes.
    #[must_use]
    pub fn with_vanish_duration(mut self, duration: Duration) -> Self {
        self.vanish_duration = duration;
        self
    }

    /// Place the card at a grid slot.
    #[must_use]
    pub fn at_slot(mut self, row: u32, column: u32) -> Self {
        self.slot = Some((row, column));
        self
    }

    /// Grid position, if any.
    #[must_use]
    pub fn slot(&self) -> Option<(u32, u32)> {
        self.slot
    }

    /// Check if a transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn start(
        &mut self,
        moving: DisplayState,
        settle: DisplayState,
        duration: Duration,
        on_complete: Option<AnimationCallback>,
    ) {
        self.finish_animation();

        if duration.is_zero() {
            self.state = settle;
            if let Some(callback) = on_complete {
                callback(self.id);
            }
            return;
        }

        self.state = moving;
        self.animation = Some(Animation {
            remaining: duration,
            settle,
            on_complete,
        });
    }

    fn finish_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            self.state = animation.settle;
            if let Some(callback) = animation.on_complete {
                callback(self.id);
            }
        }
    }
}

impl Card for SimCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn identity(&self) -> MatchId {
        self.identity
    }

    fn display_state(&self) -> DisplayState {
        self.state
    }

    fn flip_to_front(&mut self, on_complete: Option<AnimationCallback>) {
        self.start(
            DisplayState::Flipping,
            DisplayState::FaceUp,
            self.flip_duration,
            on_complete,
        );
    }

    fn flip_to_back(&mut self, on_complete: Option<AnimationCallback>) {
        self.start(
            DisplayState::Flipping,
            DisplayState::FaceDown,
            self.flip_duration,
            on_complete,
        );
    }

    fn play_matched_animation(&mut self, on_complete: Option<AnimationCallback>) {
        self.start(
            DisplayState::Matched,
            DisplayState::Disappeared,
            self.vanish_duration,
            on_complete,
        );
    }

    fn update(&mut self, dt: Duration) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        animation.remaining = animation.remaining.saturating_sub(dt);
        if animation.remaining.is_zero() {
            self.finish_animation();
        }
    }
}
