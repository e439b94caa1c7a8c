//! Match boundaries and seat identity.
//!
//! - `MatchSegmenter`: groups messages by match identifier
//! - `resolve_local_seat`: which seat the client occupied

pub mod seat;
pub mod segmenter;

pub use seat::resolve_local_seat;
pub use segmenter::{MatchBucket, MatchSegmenter, MatchSummary};
