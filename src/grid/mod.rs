//! Grid dealing.
//!
//! A [`GridProvider`] validates the requested dimensions before anything is
//! created, then returns a [`GridLayout`]. The layout is turned into cards
//! through a [`CardFactory`]; a bad request never yields a partial grid.

mod provider;

pub use provider::{CardFactory, GridLayout, GridProvider, SimCardFactory};
