//! # arena-log
//!
//! Match state reconstruction from MTG Arena client logs.
//!
//! The client log interleaves diagnostic text with JSON protocol messages.
//! This crate extracts those messages, splits them by match, and replays
//! each match's game-state stream to work out which cards every seat has
//! revealed and where each card instance finally rests.
//!
//! ## Design Principles
//!
//! 1. **Per-match state**: every match gets its own tracker, built on entry
//!    and dropped on return. A corrupt match never affects another.
//!
//! 2. **No guessing**: a match whose local seat cannot be resolved is
//!    reported as such, never attributed to seat 1. A card whose final zone
//!    cannot be confirmed is excluded from counts and listed separately.
//!
//! 3. **Ids only**: reconstruction works on permanent card ids. Names and
//!    types come from a `CardRegistry` at presentation time.
//!
//! ## Modules
//!
//! - `core`: identifiers, seats, zone layout, configuration
//! - `cards`: card ids, instances, metadata registry
//! - `zones`: zone residency bookkeeping
//! - `log`: message extraction and the typed protocol model
//! - `matches`: match segmentation and local seat resolution
//! - `tracker`: the per-match zone/instance state machine
//! - `reveal`: final state to per-seat revealed-card counts
//! - `engine`: whole-log and live entry points
//! - `report`: text rendering

pub mod cards;
pub mod core;
pub mod engine;
pub mod error;
pub mod log;
pub mod matches;
pub mod report;
pub mod reveal;
pub mod tracker;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{InstanceId, MatchId, ParseConfig, Seat, SeatMap, ZoneId, ZoneKind, ZoneVisibility};

pub use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry};

pub use crate::log::{LogMessage, LogTail, MessageExtractor};

pub use crate::matches::{resolve_local_seat, MatchSegmenter, MatchSummary};

pub use crate::tracker::ZoneTracker;

pub use crate::reveal::{aggregate, CardCounts, RevealedCards};

pub use crate::engine::{ArenaLog, LiveSession, MatchReport};

pub use crate::error::{CorruptState, ExtractionError, LogError, MatchError, MatchFailure};
