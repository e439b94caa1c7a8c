//! Per-match orchestration.
//!
//! ```text
//! raw log -> MessageExtractor -> MatchSegmenter -> per match:
//!     resolve_local_seat + ZoneTracker -> aggregate -> MatchReport
//! ```
//!
//! ## Key Types
//!
//! - `ArenaLog`: a complete log, parsed once
//! - `LiveSession`: a log that is still growing
//! - `MatchReport`: the reconstruction of one match

pub mod arena_log;
pub mod live;
pub mod reconstruct;

pub use arena_log::ArenaLog;
pub use live::LiveSession;
pub use reconstruct::{reconstruct_match, MatchReport, UnconfirmedCard};
