//! Card identification.
//!
//! Two ids travel with every card:
//! - `CardId`: unique per card instance on the table. The engine uses it as
//!   the opaque handle for queueing, pairing and commanding cards.
//! - `MatchId`: the face value. In a well-formed grid exactly two cards
//!   share each `MatchId`, and comparing them decides match vs mismatch.
//!
//! ```
//! use rust_pairs::core::{CardId, MatchId};
//!
//! let left = CardId::new(0);
//! let right = CardId::new(1);
//! assert_ne!(left, right);
//!
//! // Both cards show the same face.
//! let face = MatchId::new(7);
//! assert_eq!(face.raw(), 7);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
///
/// Ids are allocated by the grid factory in layout order (row-major),
/// so `CardId(0)` is the top-left slot of a freshly generated grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Face value of a card. Two cards match when their `MatchId`s are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u32);

impl MatchId {
    /// Create a new match ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Face({})", self.0)
    }
}

/// Two cards taken from the queue together, in click order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardPair {
    /// The earlier click.
    pub first: CardId,
    /// The later click.
    pub second: CardId,
}

impl CardPair {
    /// Create a pair from two cards in click order.
    #[must_use]
    pub const fn new(first: CardId, second: CardId) -> Self {
        Self { first, second }
    }

    /// Check whether `card` is either member of the pair.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.first == card || self.second == card
    }

    /// Both members, first click first.
    #[must_use]
    pub const fn members(&self) -> [CardId; 2] {
        [self.first, self.second]
    }
}

impl std::fmt::Display for CardPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
