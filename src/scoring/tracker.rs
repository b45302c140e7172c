//! Score, turn and combo bookkeeping driven by engine events.

use serde::{Deserialize, Serialize};

use crate::core::ScoringConfig;
use crate::events::{Listener, MatchEvent};

/// Point-in-time copy of the tracker's numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    /// Running score.
    pub score: u64,

    /// Pairs matched.
    pub matches: u32,

    /// Pairs resolved, matched or not.
    pub turns: u32,

    /// Current streak of consecutive matches.
    pub combo: u32,

    /// Longest streak this game.
    pub highest_combo: u32,

    /// `matches / turns * 100`.
    pub efficiency: f64,
}

/// Converts `Matched`/`Mismatched` into score, turns and combo streaks.
///
/// ```
/// use rust_pairs::core::{CardId, CardPair, ScoringConfig};
/// use rust_pairs::events::{Listener, MatchEvent};
/// use rust_pairs::scoring::ScoreTracker;
///
/// let mut tracker = ScoreTracker::new(ScoringConfig::default());
/// let pair = CardPair::new(CardId(0), CardId(1));
///
/// tracker.on_event(&MatchEvent::Matched(pair));
/// tracker.on_event(&MatchEvent::Matched(pair));
///
/// // 100 for the first match, 100 + 50 for the second.
/// assert_eq!(tracker.score(), 250);
/// assert_eq!(tracker.combo(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ScoreTracker {
    config: ScoringConfig,
    score: u64,
    matches: u32,
    turns: u32,
    combo: u32,
    highest_combo: u32,
}

impl ScoreTracker {
    /// Create a tracker with zeroed stats.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            score: 0,
            matches: 0,
            turns: 0,
            combo: 0,
            highest_combo: 0,
        }
    }

    /// The scoring rules.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Record a match. Returns the points awarded.
    pub fn record_match(&mut self) -> u64 {
        self.turns += 1;
        self.matches += 1;
        self.combo += 1;
        self.highest_combo = self.highest_combo.max(self.combo);

        let points = self.points_for_combo(self.combo);
        self.score += points;
        points
    }

    /// Record a mismatch. The streak ends.
    pub fn record_mismatch(&mut self) {
        self.turns += 1;
        self.combo = 0;
    }

    /// Points a match at streak length `combo` is worth.
    #[must_use]
    pub fn points_for_combo(&self, combo: u32) -> u64 {
        let steps = combo.min(self.config.max_combo).saturating_sub(1);
        u64::from(self.config.base_points)
            + u64::from(steps) * u64::from(self.config.combo_bonus_per_step)
    }

    /// Zero everything for a new game.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Running score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Pairs matched.
    #[must_use]
    pub fn matches(&self) -> u32 {
        self.matches
    }

    /// Pairs resolved.
    #[must_use]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Current streak.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Longest streak.
    #[must_use]
    pub fn highest_combo(&self) -> u32 {
        self.highest_combo
    }

    /// Matches per turn as a percentage; 0 before the first turn.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            f64::from(self.matches) / f64::from(self.turns) * 100.0
        }
    }

    /// Copy the current numbers.
    #[must_use]
    pub fn snapshot(&self) -> ScoreStats {
        ScoreStats {
            score: self.score,
            matches: self.matches,
            turns: self.turns,
            combo: self.combo,
            highest_combo: self.highest_combo,
            efficiency: self.efficiency(),
        }
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl Listener<MatchEvent> for ScoreTracker {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::Matched(_) => {
                let points = self.record_match();
                log::debug!("match +{} (combo {}, score {})", points, self.combo, self.score);
            }
            MatchEvent::Mismatched(_) => self.record_mismatch(),
            MatchEvent::AllMatched => {}
        }
    }
}
