//! Ordered card-id multiset.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::cards::CardId;

/// One entry of a `CardCounts`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardCount {
    pub card_id: CardId,
    pub count: u32,
}

/// Card id -> count, iterated in order of first insertion.
///
/// ## Example
///
/// ```
/// use arena_log::cards::CardId;
/// use arena_log::reveal::CardCounts;
///
/// let mut counts = CardCounts::new();
/// counts.add(CardId::new(7));
/// counts.add(CardId::new(3));
/// counts.add(CardId::new(7));
///
/// assert_eq!(counts.count(CardId::new(7)), 2);
/// assert_eq!(counts.iter().next().unwrap().card_id, CardId::new(7));
/// assert_eq!(counts.total(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardCounts {
    entries: Vec<CardCount>,
    index: FxHashMap<CardId, usize>,
}

impl CardCounts {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of a card.
    pub fn add(&mut self, card_id: CardId) {
        self.add_many(card_id, 1);
    }

    /// Add `count` copies of a card.
    pub fn add_many(&mut self, card_id: CardId, count: u32) {
        match self.index.get(&card_id) {
            Some(&i) => self.entries[i].count += count,
            None => {
                self.index.insert(card_id, self.entries.len());
                self.entries.push(CardCount { card_id, count });
            }
        }
    }

    /// Copies of a card (0 if absent).
    #[must_use]
    pub fn count(&self, card_id: CardId) -> u32 {
        self.index.get(&card_id).map_or(0, |&i| self.entries[i].count)
    }

    /// Entries in order of first insertion.
    pub fn iter(&self) -> impl Iterator<Item = &CardCount> {
        self.entries.iter()
    }

    /// Number of distinct cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no card was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl FromIterator<CardId> for CardCounts {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        let mut counts = Self::new();
        for card_id in iter {
            counts.add(card_id);
        }
        counts
    }
}

impl Serialize for CardCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
