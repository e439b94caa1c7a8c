//! Zone/instance tracking for one match.
//!
//! ## Key Types
//!
//! - `ZoneTracker`: the per-match state machine
//! - `RemapTable`: transitive instance-id renumbering

pub mod remap;
pub mod state;

pub use remap::RemapTable;
pub use state::ZoneTracker;
