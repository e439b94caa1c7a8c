//! Reveal aggregation: final residency to per-seat card counts.
//!
//! Output is keyed by permanent card id only. Names are a presentation
//! concern (see `report`).

pub mod aggregator;
pub mod counts;

pub use aggregator::{aggregate, RevealedCards};
pub use counts::{CardCount, CardCounts};
