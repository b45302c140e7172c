//! Outcome notifications emitted by the match engine.

use serde::{Deserialize, Serialize};

use crate::core::CardPair;

/// Something the engine decided.
///
/// ## Ordering
///
/// For one pair, `Matched`/`Mismatched` is emitted at comparison time.
/// `AllMatched` follows the last `Matched` once the display hold has
/// elapsed and the matched animations have been commanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchEvent {
    /// The two cards share a face and are out of play.
    Matched(CardPair),

    /// The two cards differ and will be flipped back.
    Mismatched(CardPair),

    /// Every registered card is matched. Fires once per game.
    AllMatched,
}

/// Discriminant of a [`MatchEvent`], for filtering and counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchEventKind {
    Matched,
    Mismatched,
    AllMatched,
}

impl MatchEvent {
    /// The event's kind.
    #[must_use]
    pub const fn kind(&self) -> MatchEventKind {
        match self {
            Self::Matched(_) => MatchEventKind::Matched,
            Self::Mismatched(_) => MatchEventKind::Mismatched,
            Self::AllMatched => MatchEventKind::AllMatched,
        }
    }

    /// The resolved pair, if this event is about one.
    #[must_use]
    pub const fn pair(&self) -> Option<CardPair> {
        match self {
            Self::Matched(pair) | Self::Mismatched(pair) => Some(*pair),
            Self::AllMatched => None,
        }
    }
}

impl std::fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched(pair) => write!(f, "Matched{}", pair),
            Self::Mismatched(pair) => write!(f, "Mismatched{}", pair),
            Self::AllMatched => write!(f, "AllMatched"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;

    #[test]
    fn test_kind_and_pair() {
        let pair = CardPair::new(CardId(0), CardId(1));

        assert_eq!(MatchEvent::Matched(pair).kind(), MatchEventKind::Matched);
        assert_eq!(MatchEvent::Mismatched(pair).pair(), Some(pair));
        assert_eq!(MatchEvent::AllMatched.pair(), None);
    }

    #[test]
    fn test_display() {
        let pair = CardPair::new(CardId(2), CardId(5));
        assert_eq!(
            format!("{}", MatchEvent::Mismatched(pair)),
            "Mismatched(Card(2), Card(5))"
        );
        assert_eq!(format!("{}", MatchEvent::AllMatched), "AllMatched");
    }

    #[test]
    fn test_serialization() {
        let event = MatchEvent::Matched(CardPair::new(CardId(0), CardId(3)));
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
