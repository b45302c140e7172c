//! Turn processing and match resolution.
//!
//! ## Flow
//!
//! 1. A face-down card is clicked: it joins the [`ClickQueue`] and flips
//!    face up straight away.
//! 2. Once two cards wait and no cycle runs, the two oldest become the
//!    current pair.
//! 3. After the reveal hold the faces are compared:
//!    - **Match**: both cards are marked matched and `Matched` is emitted.
//!      After the display hold they play the matched animation, and
//!      `AllMatched` follows if nothing is left.
//!    - **Mismatch**: `Mismatched` is emitted; after the flip-back delay
//!      both cards turn face down and can be clicked again.
//! 4. After the inter-pair delay the next pair is taken, or the cycle ends.
//!
//! Clicks keep arriving throughout and are paired strictly in click order.
//!
//! ## Timing
//!
//! Every delay is a [`Scheduler`](crate::core::Scheduler) entry. Hosts call
//! [`MatchEngine::tick`] once per frame; tests advance it by hand.
//! `reset_game` and `clear_all` drop every pending entry.

mod match_engine;
mod queue;

pub use match_engine::{CycleStep, MatchEngine};
pub use queue::ClickQueue;
