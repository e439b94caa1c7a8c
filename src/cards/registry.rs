//! Card registry for metadata lookup.
//!
//! The `CardRegistry` maps permanent card IDs to display metadata. It is a
//! presentation-time collaborator: reconstruction never consults it, and a
//! missing entry is surfaced as `CardLookup::Unknown` with the raw ID.
//!
//! The on-disk format is the JSON export of the client's card database:
//!
//! ```json
//! { "75000": { "name": "Fire /// Ice", "expansion": "MH2",
//!              "collector_number": "290", "types": ["Instant"] } }
//! ```
//!
//! Split cards appear both as the full card and as each half. The registry
//! indexes halves so `canonical` can fold a half back onto its full card.

use std::borrow::Cow;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{CardDefinition, CardId};
use crate::error::RegistryError;

/// Result of a metadata lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardLookup<'a> {
    Known(&'a CardDefinition),
    Unknown(CardId),
}

impl<'a> CardLookup<'a> {
    /// Name to show for the card; unknown IDs are shown raw.
    #[must_use]
    pub fn display_name(&self) -> Cow<'a, str> {
        match self {
            CardLookup::Known(def) => Cow::Borrowed(def.name.as_str()),
            CardLookup::Unknown(id) => Cow::Owned(format!("Unknown card #{}", id.raw())),
        }
    }

    /// The definition, if known.
    #[must_use]
    pub fn definition(&self) -> Option<&'a CardDefinition> {
        match self {
            CardLookup::Known(def) => Some(def),
            CardLookup::Unknown(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct RawCard {
    name: String,
    #[serde(default)]
    expansion: Option<String>,
    #[serde(default)]
    collector_number: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

/// Registry of card metadata.
///
/// ## Example
///
/// ```
/// use arena_log::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(10), "Fire /// Ice"));
/// registry.register(CardDefinition::new(CardId::new(11), "Fire"));
///
/// assert_eq!(registry.canonical(CardId::new(11)), CardId::new(10));
/// assert_eq!(registry.resolve(CardId::new(99)).display_name(), "Unknown card #99");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    by_name: FxHashMap<String, Vec<CardId>>,
    /// Half name -> lowest full split card carrying it.
    parent_by_half: FxHashMap<String, CardId>,
    split_parent: FxHashMap<CardId, CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from the JSON export on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Decode a registry from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, RegistryError> {
        let raw: FxHashMap<String, RawCard> = serde_json::from_slice(bytes)?;

        let mut entries = Vec::with_capacity(raw.len());
        for (key, card) in raw {
            let id = key
                .parse::<u32>()
                .map(CardId::new)
                .map_err(|_| RegistryError::BadKey(key.clone()))?;
            entries.push(CardDefinition {
                id,
                name: card.name,
                expansion: card.expansion.unwrap_or_default(),
                collector_number: card.collector_number.unwrap_or_default(),
                types: card.types,
            });
        }
        // Registration order only matters for split-half resolution; sort so
        // the lowest full-card ID wins when names collide.
        entries.sort_by_key(|def| def.id);

        let mut registry = Self::new();
        // Keys such as "07" and "7" name the same card; keep the first.
        entries.dedup_by_key(|def| def.id);
        for def in entries {
            registry.register(def);
        }
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }

        let id = card.id;
        if let Some((left, right)) = card.split_halves() {
            for half in [left, right] {
                for &half_id in self.by_name.get(half).into_iter().flatten() {
                    self.split_parent.entry(half_id).or_insert(id);
                }
                self.parent_by_half
                    .entry(half.to_owned())
                    .and_modify(|parent| *parent = (*parent).min(id))
                    .or_insert(id);
            }
        } else if let Some(&parent) = self.parent_by_half.get(&card.name) {
            self.split_parent.insert(id, parent);
        }

        self.by_name.entry(card.name.clone()).or_default().push(id);
        self.cards.insert(id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a card, tolerating unknown IDs.
    #[must_use]
    pub fn resolve(&self, id: CardId) -> CardLookup<'_> {
        match self.cards.get(&id) {
            Some(def) => CardLookup::Known(def),
            None => CardLookup::Unknown(id),
        }
    }

    /// Fold a split-card half onto its full card; other IDs are unchanged.
    #[must_use]
    pub fn canonical(&self, id: CardId) -> CardId {
        self.split_parent.get(&id).copied().unwrap_or(id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
