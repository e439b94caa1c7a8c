//! Card instances - runtime card state.
//!
//! `CardInstance` represents one physical card during a match. It is
//! created the first time the card is observed and mutated on every later
//! observation. Instances are never deleted: one that stops being referenced
//! keeps its last known state.
//!
//! Residency (which zone the card is in) is owned by `zones::ZoneManager`;
//! the instance records identity, ownership and visibility.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::{InstanceId, Seat, ZoneVisibility};

/// A physical card in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Current instance ID (changes on remap).
    pub instance_id: InstanceId,

    /// Instance ID under which the card was first observed.
    pub first_seen_as: InstanceId,

    /// Permanent card identifier. `None` until an object observation names it.
    pub card_id: Option<CardId>,

    /// Owning seat. `None` until observed.
    pub owner: Option<Seat>,

    /// Last observed visibility.
    pub visibility: ZoneVisibility,
}

impl CardInstance {
    /// Create an instance known only by its ID (e.g. listed in a hidden zone).
    #[must_use]
    pub fn unidentified(instance_id: InstanceId) -> Self {
        Self {
            instance_id,
            first_seen_as: instance_id,
            card_id: None,
            owner: None,
            visibility: ZoneVisibility::Hidden,
        }
    }

    /// Set the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ZoneVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Check if the last observation showed the card to both seats.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == ZoneVisibility::Public
    }

    /// Relabel under a new instance ID, keeping every other attribute.
    pub fn relabel(&mut self, to: InstanceId) {
        self.instance_id = to;
    }
}
