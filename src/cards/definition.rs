//! Card definitions - static card data.
//!
//! `CardId` is the permanent card identifier (the server's `grpId`). It is
//! stable across matches and is the key for everything the reveal
//! aggregator produces. `CardDefinition` holds the display metadata the
//! card database provides for it; the reconstruction engine never needs it.

use serde::{Deserialize, Serialize};

/// Permanent identifier of a card definition.
///
/// Identifies the printed card (e.g. one printing of "Lightning Bolt"),
/// not a specific physical copy in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Primary type used to group cards for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Planeswalker,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Land,
    Other,
}

impl CardType {
    /// Display order for grouped output.
    pub const DISPLAY_ORDER: [CardType; 8] = [
        CardType::Creature,
        CardType::Planeswalker,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Artifact,
        CardType::Enchantment,
        CardType::Land,
        CardType::Other,
    ];

    /// Parse a type name as stored in the card database.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Creature" => CardType::Creature,
            "Planeswalker" => CardType::Planeswalker,
            "Instant" => CardType::Instant,
            "Sorcery" => CardType::Sorcery,
            "Artifact" => CardType::Artifact,
            "Enchantment" => CardType::Enchantment,
            "Land" => CardType::Land,
            _ => CardType::Other,
        }
    }

    /// Plural heading for grouped output.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            CardType::Creature => "Creatures",
            CardType::Planeswalker => "Planeswalkers",
            CardType::Instant => "Instants",
            CardType::Sorcery => "Sorceries",
            CardType::Artifact => "Artifacts",
            CardType::Enchantment => "Enchantments",
            CardType::Land => "Lands",
            CardType::Other => "Other",
        }
    }
}

/// Display metadata for one card.
///
/// ## Example
///
/// ```
/// use arena_log::cards::{CardDefinition, CardId, CardType};
///
/// let bolt = CardDefinition::new(CardId::new(1), "Lightning Bolt")
///     .with_set("STA", "42")
///     .with_type("Instant");
///
/// assert_eq!(bolt.primary_type(), CardType::Instant);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Permanent identifier.
    pub id: CardId,

    /// Display name. Split cards use `"Left /// Right"`.
    pub name: String,

    /// Set code.
    pub expansion: String,

    /// Collector number within the set.
    pub collector_number: String,

    /// Type names in printed order.
    pub types: Vec<String>,
}

impl CardDefinition {
    /// Create a definition with a name only.
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expansion: String::new(),
            collector_number: String::new(),
            types: Vec::new(),
        }
    }

    /// Set expansion and collector number.
    #[must_use]
    pub fn with_set(mut self, expansion: impl Into<String>, collector_number: impl Into<String>) -> Self {
        self.expansion = expansion.into();
        self.collector_number = collector_number.into();
        self
    }

    /// Append a type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.push(type_name.into());
        self
    }

    /// First listed type, used for grouping.
    #[must_use]
    pub fn primary_type(&self) -> CardType {
        self.types
            .first()
            .map_or(CardType::Other, |t| CardType::from_name(t))
    }

    /// The two halves of a split card, if this is one.
    #[must_use]
    pub fn split_halves(&self) -> Option<(&str, &str)> {
        let (left, right) = self.name.split_once(" /// ")?;
        Some((left.trim(), right.trim()))
    }
}
