//! Engine notifications and the channel that delivers them.
//!
//! The engine owns one `EventChannel<MatchEvent>`. Score tracking, audio,
//! UI, and the session each subscribe independently.
//!
//! ## Key Components
//!
//! - [`MatchEvent`]: `Matched`, `Mismatched`, `AllMatched`
//! - [`EventChannel`]: weak multi-listener registry with explicit unsubscribe
//! - [`Listener`]: implemented by anything that consumes events
//! - [`EventLog`]: a listener that records what it sees
//!
//! ## Example Usage
//!
//! ```
//! use rust_pairs::core::{CardId, CardPair};
//! use rust_pairs::events::{EventChannel, EventLog, MatchEvent};
//!
//! let mut channel = EventChannel::new();
//! let log = EventLog::shared();
//! channel.subscribe(&log);
//!
//! channel.emit(&MatchEvent::Matched(CardPair::new(CardId(0), CardId(1))));
//! channel.emit(&MatchEvent::AllMatched);
//!
//! assert_eq!(log.borrow().len(), 2);
//! ```

mod channel;
mod event;

pub use channel::{EventChannel, EventLog, Listener, ListenerId};
pub use event::{MatchEvent, MatchEventKind};
