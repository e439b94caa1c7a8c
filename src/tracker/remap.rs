//! Instance id renumbering.
//!
//! The server gives a card a fresh instance id whenever it changes zone in
//! a way that hides its history (hand to stack, stack to battlefield). The
//! `RemapTable` records every `old -> new` directive so lookups by any
//! earlier id reach the card's current id.

use rustc_hash::FxHashMap;

use crate::core::InstanceId;
use crate::error::CorruptState;
use crate::log::InstanceRemap;

/// Transitive old-to-new instance id mapping.
///
/// ## Example
///
/// ```
/// use arena_log::core::InstanceId;
/// use arena_log::log::InstanceRemap;
/// use arena_log::tracker::RemapTable;
///
/// let mut table = RemapTable::new();
/// table.record(InstanceRemap { from: InstanceId(1), to: InstanceId(2) }).unwrap();
/// table.record(InstanceRemap { from: InstanceId(2), to: InstanceId(3) }).unwrap();
///
/// assert_eq!(table.resolve(InstanceId(1)), InstanceId(3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RemapTable {
    forward: FxHashMap<InstanceId, InstanceId>,
}

impl RemapTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directive.
    ///
    /// A self-remap is ignored. A directive whose target already resolves
    /// back to its source would make lookups loop forever and is rejected.
    pub fn record(&mut self, remap: InstanceRemap) -> Result<(), CorruptState> {
        if remap.from == remap.to {
            return Ok(());
        }

        let mut cursor = remap.to;
        loop {
            if cursor == remap.from {
                return Err(CorruptState::RemapCycle {
                    from: remap.from,
                    to: remap.to,
                });
            }
            match self.forward.get(&cursor) {
                Some(&next) => cursor = next,
                None => break,
            }
        }

        self.forward.insert(remap.from, remap.to);
        Ok(())
    }

    /// Follow directives from `id` to the newest id.
    #[must_use]
    pub fn resolve(&self, id: InstanceId) -> InstanceId {
        let mut current = id;
        while let Some(&next) = self.forward.get(&current) {
            current = next;
        }
        current
    }

    /// Number of recorded directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if no directive was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
