//! Zone residency.
//!
//! Zones are **server-described**, not hardcoded. The tracker learns each
//! zone's kind, owner and visibility from game-state messages (see
//! `core::ZoneLayout`); the `ZoneManager` only knows which instance sits in
//! which zone.

pub mod manager;

pub use manager::ZoneManager;

// Re-export zone types from core for convenience
pub use crate::core::config::{ZoneConfig, ZoneId, ZoneKind, ZoneLayout, ZoneVisibility};
