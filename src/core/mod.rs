//! Core types: identifiers, seats, zones and configuration.
//!
//! Everything here is match-agnostic. Per-match state lives in
//! `tracker::ZoneTracker`.

pub mod config;
pub mod entity;
pub mod player;

pub use config::{ParseConfig, ZoneConfig, ZoneId, ZoneKind, ZoneLayout, ZoneVisibility};
pub use entity::{InstanceId, MatchId};
pub use player::{InvalidSeat, Seat, SeatMap};
