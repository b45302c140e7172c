//! Best results per board size.
//!
//! Records are keyed by [`GridKey`] and updated from a finished game's
//! [`GameSummary`]. [`MemoryStore`] keeps them in process; [`JsonFileStore`]
//! writes them to a single JSON file.
//!
//! ```
//! use std::time::Duration;
//!
//! use chrono::Utc;
//! use rust_pairs::persistence::{GameSummary, GridKey, MemoryStore, RecordStore};
//!
//! let mut store = MemoryStore::new();
//! let key: GridKey = "4x4".parse().unwrap();
//! let summary = GameSummary {
//!     score: 900,
//!     combo: 4,
//!     efficiency: 80.0,
//!     turns: 10,
//!     matches: 8,
//!     time: Duration::from_secs(75),
//!     played_at: Utc::now(),
//! };
//!
//! let record = store.update(key, &summary).unwrap();
//! assert_eq!(record.high_score, 900);
//! assert_eq!(record.games_played, 1);
//! ```

mod json;
mod record;
mod store;

pub use json::JsonFileStore;
pub use record::{BestRecord, GameSummary, GridKey};
pub use store::{MemoryStore, RecordStore};
