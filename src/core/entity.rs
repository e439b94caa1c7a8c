//! Identifiers for runtime objects and matches.
//!
//! ## Instance IDs
//!
//! The game server labels every object in a match with an `InstanceId`.
//! Instance IDs are **match-scoped**: the same number in two matches refers
//! to unrelated objects. A physical card also receives a fresh instance ID
//! each time it changes zones, announced through an id-change annotation
//! (see `tracker::RemapTable`).
//!
//! ## Usage
//!
//! ```
//! use arena_log::core::{InstanceId, MatchId};
//!
//! let card = InstanceId(284);
//! assert_eq!(card.raw(), 284);
//!
//! let id = MatchId::new("4c2b-9e1f");
//! assert_eq!(id.as_str(), "4c2b-9e1f");
//! assert_eq!(id.short(), "4c2b-9e1");
//! ```

use serde::{Deserialize, Serialize};

/// Runtime identifier of one game object within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Opaque key grouping every message that belongs to one match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Create a match ID from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The full identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact display.
    #[must_use]
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
