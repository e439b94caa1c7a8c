//! Zone manager for card residency.
//!
//! The `ZoneManager` tracks which zone each instance is in and keeps an
//! ordered member list per zone. It supports:
//! - Incremental placement (an object observed in a zone)
//! - Snapshot replacement (a zone's complete membership list)
//! - Eviction (an instance left a zone for an unknown destination)
//! - Relabelling (an instance ID was remapped)
//!
//! Every located instance is in exactly one zone's member list.

use rustc_hash::FxHashMap;

use crate::core::{InstanceId, ZoneId};

/// Manages instance residency across zones.
///
/// ## Usage
///
/// ```
/// use arena_log::core::{InstanceId, ZoneId};
/// use arena_log::zones::ZoneManager;
///
/// let mut manager = ZoneManager::new();
/// let hand = ZoneId::new(31);
/// let battlefield = ZoneId::new(28);
///
/// manager.replace_zone(hand, &[InstanceId(10), InstanceId(11)]);
/// manager.place(InstanceId(10), battlefield);
///
/// assert_eq!(manager.members(hand), &[InstanceId(11)]);
/// assert_eq!(manager.zone_of(InstanceId(10)), Some(battlefield));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Instance locations: instance_id -> zone_id
    locations: FxHashMap<InstanceId, ZoneId>,

    /// Members of each zone, in arrival (or snapshot) order.
    members: FxHashMap<ZoneId, Vec<InstanceId>>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn detach(&mut self, id: InstanceId) -> Option<ZoneId> {
        let zone = self.locations.remove(&id)?;
        if let Some(list) = self.members.get_mut(&zone) {
            list.retain(|&m| m != id);
        }
        Some(zone)
    }

    /// Place an instance in a zone, moving it if it was elsewhere.
    ///
    /// Returns the previous zone, or `None` if it was not located.
    pub fn place(&mut self, id: InstanceId, zone: ZoneId) -> Option<ZoneId> {
        if self.locations.get(&id) == Some(&zone) {
            return Some(zone);
        }

        let previous = self.detach(id);
        self.locations.insert(id, zone);
        self.members.entry(zone).or_default().push(id);
        previous
    }

    /// Remove an instance from its zone, leaving its location unknown.
    ///
    /// Returns the zone it was in.
    pub fn evict(&mut self, id: InstanceId) -> Option<ZoneId> {
        self.detach(id)
    }

    /// Replace a zone's complete membership.
    ///
    /// Listed instances are moved into the zone (from wherever they were);
    /// previous members that are not listed are evicted. Returns the
    /// evicted instances. Applying the same list twice is a no-op.
    pub fn replace_zone(&mut self, zone: ZoneId, ids: &[InstanceId]) -> Vec<InstanceId> {
        let mut listed: Vec<InstanceId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !listed.contains(&id) {
                listed.push(id);
            }
        }

        let previous = self.members.remove(&zone).unwrap_or_default();
        let mut evicted = Vec::new();
        for id in previous {
            if !listed.contains(&id) {
                self.locations.remove(&id);
                evicted.push(id);
            }
        }

        for &id in &listed {
            match self.locations.get(&id) {
                Some(&current) if current == zone => {}
                Some(_) => {
                    self.detach(id);
                }
                None => {}
            }
            self.locations.insert(id, zone);
        }
        self.members.insert(zone, listed);

        evicted
    }

    /// Move the residency of `from` onto `to`.
    ///
    /// Any residency `to` already had is replaced. Returns the zone that
    /// `to` now occupies, or `None` if `from` was not located.
    pub fn rename(&mut self, from: InstanceId, to: InstanceId) -> Option<ZoneId> {
        if from == to {
            return self.zone_of(from);
        }
        let zone = self.locations.remove(&from)?;
        self.detach(to);

        if let Some(list) = self.members.get_mut(&zone) {
            if let Some(slot) = list.iter_mut().find(|m| **m == from) {
                *slot = to;
            }
        }
        self.locations.insert(to, zone);
        Some(zone)
    }

    /// Get the zone an instance is in.
    #[must_use]
    pub fn zone_of(&self, id: InstanceId) -> Option<ZoneId> {
        self.locations.get(&id).copied()
    }

    /// Members of a zone, in order.
    #[must_use]
    pub fn members(&self, zone: ZoneId) -> &[InstanceId] {
        self.members.get(&zone).map_or(&[], |v| v.as_slice())
    }

    /// Get the number of instances in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: ZoneId) -> usize {
        self.members(zone).len()
    }

    /// Number of zone member lists that contain `id`.
    ///
    /// Always 0 or 1; exposed for invariant checks.
    #[must_use]
    pub fn membership_count(&self, id: InstanceId) -> usize {
        self.members.values().filter(|list| list.contains(&id)).count()
    }

    /// Get total number of located instances.
    #[must_use]
    pub fn total_located(&self) -> usize {
        self.locations.len()
    }

    /// Check if the manager has a location for an instance.
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.locations.contains_key(&id)
    }
}
