//! Game configuration types.
//!
//! Hosts configure the library at startup by providing:
//! - `TimingConfig`: the four delays of the pair resolution cycle
//! - `ScoringConfig`: points per match and combo bonuses
//! - `GridConfig`: board dimensions for one game
//! - `SessionConfig`: combines timing, scoring and the deal seed
//!
//! Durations serialize as serde's `{ "secs": .., "nanos": .. }` form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Delays of the pair resolution cycle.
///
/// All four must be positive. Defaults: reveal hold 0.3s, display hold
/// 0.5s, flip-back 1.0s, inter-pair 0.2s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long both faces stay visible before the comparison.
    pub reveal_hold: Duration,

    /// Pause between a confirmed match and the matched animation.
    pub display_hold: Duration,

    /// Pause between a mismatch and flipping both cards back.
    pub flip_back_delay: Duration,

    /// Pause after resolving a pair before taking the next one.
    pub inter_pair_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_hold: Duration::from_millis(300),
            display_hold: Duration::from_millis(500),
            flip_back_delay: Duration::from_millis(1000),
            inter_pair_delay: Duration::from_millis(200),
        }
    }
}

impl TimingConfig {
    /// Create the default timing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reveal hold.
    #[must_use]
    pub fn with_reveal_hold(mut self, delay: Duration) -> Self {
        self.reveal_hold = delay;
        self
    }

    /// Set the display hold before the matched animation.
    #[must_use]
    pub fn with_display_hold(mut self, delay: Duration) -> Self {
        self.display_hold = delay;
        self
    }

    /// Set the mismatch flip-back delay.
    #[must_use]
    pub fn with_flip_back_delay(mut self, delay: Duration) -> Self {
        self.flip_back_delay = delay;
        self
    }

    /// Set the inter-pair delay.
    #[must_use]
    pub fn with_inter_pair_delay(mut self, delay: Duration) -> Self {
        self.inter_pair_delay = delay;
        self
    }

    /// Reject zero durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("reveal_hold", self.reveal_hold),
            ("display_hold", self.display_hold),
            ("flip_back_delay", self.flip_back_delay),
            ("inter_pair_delay", self.inter_pair_delay),
        ];
        for (name, value) in named {
            if value.is_zero() {
                return Err(ConfigError::NonPositiveDuration { name });
            }
        }
        Ok(())
    }
}

/// Scoring rules.
///
/// A match awards `base_points + (min(combo, max_combo) - 1) * combo_bonus_per_step`,
/// where `combo` already counts the match being scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for any match.
    pub base_points: u32,

    /// Extra points per combo step above the first.
    pub combo_bonus_per_step: u32,

    /// Combo level at which the bonus stops growing. The streak itself
    /// keeps counting past this.
    pub max_combo: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: 100,
            combo_bonus_per_step: 50,
            max_combo: 5,
        }
    }
}

impl ScoringConfig {
    /// Create the default scoring rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base points per match.
    #[must_use]
    pub fn with_base_points(mut self, points: u32) -> Self {
        self.base_points = points;
        self
    }

    /// Set the bonus per combo step.
    #[must_use]
    pub fn with_combo_bonus(mut self, bonus: u32) -> Self {
        self.combo_bonus_per_step = bonus;
        self
    }

    /// Set the combo cap.
    #[must_use]
    pub fn with_max_combo(mut self, max_combo: u32) -> Self {
        self.max_combo = max_combo;
        self
    }

    /// The combo cap must be at least 1. A cap of 0 would silently switch
    /// the combo bonus off; set `combo_bonus_per_step` to 0 for that.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_combo == 0 {
            return Err(ConfigError::InvalidScoring(
                "max_combo must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    pub rows: u32,

    /// Number of columns.
    pub columns: u32,
}

impl GridConfig {
    /// Create a grid configuration.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells, or `None` if it does not fit in a `u32`.
    #[must_use]
    pub const fn cell_count(&self) -> Option<u32> {
        self.rows.checked_mul(self.columns)
    }

    /// Number of pairs a full grid needs. Only meaningful for even cell counts.
    #[must_use]
    pub const fn pair_count(&self) -> Option<u32> {
        match self.cell_count() {
            Some(cells) => Some(cells / 2),
            None => None,
        }
    }
}

impl std::fmt::Display for GridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Resolution cycle delays.
    pub timing: TimingConfig,

    /// Scoring rules.
    pub scoring: ScoringConfig,

    /// Seed for dealing. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Number of distinct faces available to the grid provider.
    pub face_count: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            seed: None,
            face_count: Self::DEFAULT_FACE_COUNT,
        }
    }
}

impl SessionConfig {
    /// Default number of distinct faces in the card set.
    pub const DEFAULT_FACE_COUNT: u32 = 18;

    /// Create a configuration with default timing and scoring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timing.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set the scoring rules.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Fix the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how many distinct faces exist.
    #[must_use]
    pub fn with_face_count(mut self, faces: u32) -> Self {
        self.face_count = faces;
        self
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate timing and scoring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.scoring.validate()
    }
}
