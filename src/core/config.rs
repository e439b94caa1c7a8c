//! Zone layout and parser configuration.
//!
//! The game server describes zones in game-state messages (id, kind, owner,
//! visibility). The tracker learns that layout as messages arrive and falls
//! back on `ZoneLayout::arena_default` for zones referenced before they are
//! described.
//!
//! `ParseConfig` bundles the policy knobs:
//! - which zone kinds are governed by authoritative membership snapshots
//! - which zone kinds count as revealed
//! - which object kinds are physical cards worth tracking

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::player::Seat;
use crate::log::ObjectKind;

/// Zone identifier as assigned by the game server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// What a zone is, as named by the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    #[serde(rename = "ZoneType_Hand")]
    Hand,
    #[serde(rename = "ZoneType_Library")]
    Library,
    #[serde(rename = "ZoneType_Battlefield")]
    Battlefield,
    #[serde(rename = "ZoneType_Graveyard")]
    Graveyard,
    #[serde(rename = "ZoneType_Exile")]
    Exile,
    #[serde(rename = "ZoneType_Stack")]
    Stack,
    #[serde(rename = "ZoneType_Command")]
    Command,
    #[serde(rename = "ZoneType_Revealed")]
    Revealed,
    #[serde(rename = "ZoneType_Limbo")]
    Limbo,
    #[serde(rename = "ZoneType_Sideboard")]
    Sideboard,
    /// Any zone kind the engine does not interpret (pending, suppressed, ...).
    #[serde(other)]
    Other,
}

impl ZoneKind {
    /// Visibility assumed when the server omits it.
    #[must_use]
    pub fn default_visibility(self) -> ZoneVisibility {
        match self {
            ZoneKind::Hand => ZoneVisibility::Private,
            ZoneKind::Library | ZoneKind::Sideboard | ZoneKind::Limbo => ZoneVisibility::Hidden,
            _ => ZoneVisibility::Public,
        }
    }
}

/// Visibility of a zone or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// Visible to both seats.
    #[serde(rename = "Visibility_Public")]
    Public,
    /// Visible only to the owner (a hand).
    #[serde(rename = "Visibility_Private")]
    Private,
    /// Visible to nobody (a face-down library).
    #[serde(rename = "Visibility_Hidden")]
    Hidden,
    /// Unrecognised visibility; treated like `Hidden`.
    #[serde(other)]
    Unknown,
}

/// Description of a single zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Unique identifier for this zone.
    pub id: ZoneId,

    /// Protocol zone kind.
    pub kind: ZoneKind,

    /// Zone owner. `None` for shared zones (battlefield, stack, exile).
    pub owner: Option<Seat>,

    /// Visibility of cards in this zone.
    pub visibility: ZoneVisibility,
}

impl ZoneConfig {
    /// Create a shared public zone.
    #[must_use]
    pub fn new(id: ZoneId, kind: ZoneKind) -> Self {
        Self {
            id,
            kind,
            owner: None,
            visibility: ZoneVisibility::Public,
        }
    }

    /// Set the zone owner.
    #[must_use]
    pub fn with_owner(mut self, owner: Seat) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the zone visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ZoneVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Known zones of a match, keyed by zone ID.
#[derive(Clone, Debug, Default)]
pub struct ZoneLayout {
    zones: FxHashMap<ZoneId, ZoneConfig>,
}

impl ZoneLayout {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard two-seat layout used by the Arena game server.
    #[must_use]
    pub fn arena_default() -> Self {
        use ZoneKind::*;
        use ZoneVisibility::*;

        let mut layout = Self::new();
        let shared = [
            (26, Command),
            (27, Stack),
            (28, Battlefield),
            (29, Exile),
            (30, Limbo),
        ];
        for (id, kind) in shared {
            layout.learn(ZoneConfig::new(ZoneId(id), kind));
        }

        let owned = [
            (18, Revealed, Public, Seat::ONE),
            (19, Revealed, Public, Seat::TWO),
            (31, Hand, Private, Seat::ONE),
            (32, Library, Hidden, Seat::ONE),
            (33, Graveyard, Public, Seat::ONE),
            (34, Sideboard, Hidden, Seat::ONE),
            (35, Hand, Private, Seat::TWO),
            (36, Library, Hidden, Seat::TWO),
            (37, Graveyard, Public, Seat::TWO),
            (38, Sideboard, Hidden, Seat::TWO),
        ];
        for (id, kind, visibility, owner) in owned {
            layout.learn(
                ZoneConfig::new(ZoneId(id), kind)
                    .with_owner(owner)
                    .with_visibility(visibility),
            );
        }

        layout
    }

    /// Record (or overwrite) a zone description.
    pub fn learn(&mut self, zone: ZoneConfig) {
        self.zones.insert(zone.id, zone);
    }

    /// Get a zone description.
    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&ZoneConfig> {
        self.zones.get(&id)
    }

    /// Get the kind of a zone, if known.
    #[must_use]
    pub fn kind_of(&self, id: ZoneId) -> Option<ZoneKind> {
        self.zones.get(&id).map(|z| z.kind)
    }

    /// Number of described zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if no zone is described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Reconstruction policy.
///
/// ## Example
///
/// ```
/// use arena_log::core::{ParseConfig, ZoneKind};
///
/// let config = ParseConfig::default().with_public_kind(ZoneKind::Stack);
/// assert!(config.is_snapshot_kind(ZoneKind::Hand));
/// assert!(config.is_public_kind(ZoneKind::Stack));
/// ```
#[derive(Clone, Debug)]
pub struct ParseConfig {
    /// Fallback layout for zones referenced before they are described.
    pub layout: ZoneLayout,

    /// Zone kinds whose membership lists are authoritative snapshots.
    pub snapshot_kinds: Vec<ZoneKind>,

    /// Zone kinds whose contents count as revealed to both seats.
    pub public_kinds: Vec<ZoneKind>,

    /// Object kinds tracked as physical cards.
    pub tracked_objects: Vec<ObjectKind>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            layout: ZoneLayout::arena_default(),
            snapshot_kinds: vec![ZoneKind::Hand, ZoneKind::Library],
            public_kinds: vec![ZoneKind::Battlefield, ZoneKind::Graveyard, ZoneKind::Exile],
            tracked_objects: vec![ObjectKind::Card, ObjectKind::SplitCard],
        }
    }
}

impl ParseConfig {
    /// Replace the fallback zone layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ZoneLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Treat membership lists of `kind` as authoritative snapshots.
    #[must_use]
    pub fn with_snapshot_kind(mut self, kind: ZoneKind) -> Self {
        if !self.snapshot_kinds.contains(&kind) {
            self.snapshot_kinds.push(kind);
        }
        self
    }

    /// Stop treating membership lists of `kind` as snapshots.
    #[must_use]
    pub fn without_snapshot_kind(mut self, kind: ZoneKind) -> Self {
        self.snapshot_kinds.retain(|&k| k != kind);
        self
    }

    /// Count cards resting in `kind` as revealed.
    #[must_use]
    pub fn with_public_kind(mut self, kind: ZoneKind) -> Self {
        if !self.public_kinds.contains(&kind) {
            self.public_kinds.push(kind);
        }
        self
    }

    /// Check if a zone kind is snapshot-governed.
    #[must_use]
    pub fn is_snapshot_kind(&self, kind: ZoneKind) -> bool {
        self.snapshot_kinds.contains(&kind)
    }

    /// Check if a zone kind counts as revealed.
    #[must_use]
    pub fn is_public_kind(&self, kind: ZoneKind) -> bool {
        self.public_kinds.contains(&kind)
    }

    /// Check if an object kind is tracked.
    #[must_use]
    pub fn is_tracked_object(&self, kind: ObjectKind) -> bool {
        self.tracked_objects.contains(&kind)
    }
}
