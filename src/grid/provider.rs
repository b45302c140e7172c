//! Grid generation: validated, shuffled layouts of paired faces.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, SimCard};
use crate::core::{CardId, GameRng, GameRngState, GridConfig, MatchId, SessionConfig};
use crate::error::GridError;

/// A dealt grid: one face per cell, row-major.
///
/// Every face appears exactly twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    config: GridConfig,
    faces: Vec<MatchId>,
    /// RNG state right before this deal, for replaying it.
    deal_state: GameRngState,
}

impl GridLayout {
    /// Board dimensions.
    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Faces in row-major order.
    #[must_use]
    pub fn faces(&self) -> &[MatchId] {
        &self.faces
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check if the layout has no cells. Never true for a generated layout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// (row, column) of cell `index`.
    #[must_use]
    pub fn slot_of(&self, index: usize) -> (u32, u32) {
        let columns = self.config.columns as usize;
        ((index / columns) as u32, (index % columns) as u32)
    }

    /// Build one card per cell. Card ids follow cell order starting at 0.
    pub fn deal(&self, factory: &mut dyn CardFactory) -> Vec<Box<dyn Card>> {
        self.faces
            .iter()
            .enumerate()
            .map(|(index, &face)| {
                factory.make_card(CardId::new(index as u32), face, self.slot_of(index))
            })
            .collect()
    }
}

/// Turns a layout cell into a card the engine can drive.
pub trait CardFactory {
    /// Create the card for one cell.
    fn make_card(&mut self, id: CardId, face: MatchId, slot: (u32, u32)) -> Box<dyn Card>;
}

/// Deals [`SimCard`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimCardFactory {
    /// Flip duration for every dealt card.
    pub flip_duration: Duration,
    /// Matched animation duration for every dealt card.
    pub vanish_duration: Duration,
}

impl SimCardFactory {
    /// Factory whose cards settle instantly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transition durations.
    #[must_use]
    pub fn with_durations(mut self, flip: Duration, vanish: Duration) -> Self {
        self.flip_duration = flip;
        self.vanish_duration = vanish;
        self
    }
}

impl CardFactory for SimCardFactory {
    fn make_card(&mut self, id: CardId, face: MatchId, slot: (u32, u32)) -> Box<dyn Card> {
        Box::new(
            SimCard::new(id, face)
                .with_flip_duration(self.flip_duration)
                .with_vanish_duration(self.vanish_duration)
                .at_slot(slot.0, slot.1),
        )
    }
}

/// Produces shuffled grids from a fixed set of faces.
///
/// ```
/// use rust_pairs::core::{GameRng, GridConfig};
/// use rust_pairs::grid::GridProvider;
///
/// let mut provider = GridProvider::new(8, GameRng::new(42));
/// let layout = provider.generate(GridConfig::new(4, 4)).unwrap();
/// assert_eq!(layout.len(), 16);
///
/// // 3x3 has an odd cell count.
/// assert!(provider.generate(GridConfig::new(3, 3)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GridProvider {
    face_count: u32,
    rng: GameRng,
}

impl GridProvider {
    /// Create a provider over faces `0..face_count`.
    #[must_use]
    pub fn new(face_count: u32, rng: GameRng) -> Self {
        Self { face_count, rng }
    }

    /// Create a provider from session settings.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self::new(config.face_count, rng)
    }

    /// Number of distinct faces available.
    #[must_use]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    /// Check a request without dealing. Returns the number of pairs.
    pub fn validate(&self, grid: GridConfig) -> Result<u32, GridError> {
        let cells = grid.cell_count().ok_or(GridError::TooLarge {
            rows: grid.rows,
            columns: grid.columns,
        })?;
        if cells == 0 {
            return Err(GridError::EmptyGrid {
                rows: grid.rows,
                columns: grid.columns,
            });
        }
        if cells % 2 != 0 {
            return Err(GridError::OddCellCount {
                rows: grid.rows,
                columns: grid.columns,
            });
        }
        let pairs = cells / 2;
        if pairs > self.face_count {
            return Err(GridError::InsufficientIdentities {
                needed: pairs,
                available: self.face_count,
            });
        }
        Ok(pairs)
    }

    /// Deal a new grid. Nothing is consumed from the RNG if the request is
    /// invalid.
    pub fn generate(&mut self, grid: GridConfig) -> Result<GridLayout, GridError> {
        let pairs = self.validate(grid)?;
        let deal_state = self.rng.state();
        let faces = deal_faces(&mut self.rng, self.face_count, pairs);
        log::debug!("dealt {} grid ({} pairs)", grid, pairs);

        Ok(GridLayout {
            config: grid,
            faces,
            deal_state,
        })
    }

    /// Deal `layout` again, face for face.
    #[must_use]
    pub fn replay(&self, layout: &GridLayout) -> GridLayout {
        let mut rng = GameRng::from_state(&layout.deal_state);
        let pairs = (layout.faces.len() / 2) as u32;
        let faces = deal_faces(&mut rng, self.face_count, pairs);
        GridLayout {
            config: layout.config,
            faces,
            deal_state: layout.deal_state.clone(),
        }
    }
}

/// Pick `pairs` distinct faces, double them, shuffle.
fn deal_faces(rng: &mut GameRng, face_count: u32, pairs: u32) -> Vec<MatchId> {
    let mut faces: Vec<MatchId> = rng
        .sample_distinct(face_count as usize, pairs as usize)
        .into_iter()
        .flat_map(|face| [MatchId::new(face as u32); 2])
        .collect();
    rng.shuffle(&mut faces);
    faces
}
