//! Per-match zone and instance state machine.
//!
//! `ZoneTracker` consumes game-state messages for one match, in order, and
//! maintains where every observed card instance currently resides.
//!
//! ## Transition order
//!
//! Within a single message, transitions are applied in this order:
//!
//! 1. **Id changes** (annotations): the tracked instance is relabelled under
//!    its new id. Everything else about it is kept.
//! 2. **Snapshots** (zone membership lists of snapshot-governed kinds): the
//!    list replaces the zone's membership. Instances no longer listed have
//!    left the zone; until another event places them they are *unconfirmed*.
//! 3. **Object observations**: identity, owner and visibility are upserted;
//!    the object's zone is applied unless a snapshot in the same message
//!    governs the zone involved.
//! 4. **Deleted ids**: ids the server retired lose their residency.
//!
//! Instances are never removed. One that stops being referenced keeps its
//! last known state.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::remap::RemapTable;
use crate::cards::{CardId, CardInstance};
use crate::core::{
    InstanceId, ParseConfig, Seat, SeatMap, ZoneConfig, ZoneId, ZoneKind, ZoneLayout,
    ZoneVisibility,
};
use crate::error::{CorruptState, MatchError};
use crate::log::{GameObject, GameStateMessage, InstanceRemap, ZoneInfo};
use crate::zones::ZoneManager;

/// Zones governed by a snapshot in the message being applied.
type SnapshotZones = SmallVec<[ZoneId; 4]>;

/// Zone/instance state of one match.
///
/// ## Usage
///
/// ```
/// use arena_log::core::{InstanceId, ParseConfig, ZoneId};
/// use arena_log::log::GameStateMessage;
/// use arena_log::tracker::ZoneTracker;
///
/// let message: GameStateMessage = serde_json::from_str(r#"{
///     "zones": [{ "zoneId": 31, "type": "ZoneType_Hand", "ownerSeatId": 1,
///                 "objectInstanceIds": [10, 11] }]
/// }"#).unwrap();
///
/// let mut tracker = ZoneTracker::new(ParseConfig::default());
/// tracker.apply(&message).unwrap();
///
/// assert_eq!(tracker.zone_of(InstanceId(10)), Some(ZoneId::new(31)));
/// ```
#[derive(Clone, Debug)]
pub struct ZoneTracker {
    config: ParseConfig,
    layout: ZoneLayout,
    zones: ZoneManager,
    remaps: RemapTable,

    /// Instances in first-observed order. A slot is emptied only when two
    /// records turn out to be the same card.
    slots: Vec<Option<CardInstance>>,
    /// Current instance id -> slot.
    index: FxHashMap<InstanceId, usize>,
    /// Slot -> zone the instance was last seen leaving.
    departed: FxHashMap<usize, ZoneId>,

    library_sizes: SeatMap<usize>,
    commanders: SeatMap<Vec<CardId>>,
    applied: usize,
}

impl ZoneTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new(config: ParseConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            config,
            zones: ZoneManager::new(),
            remaps: RemapTable::new(),
            slots: Vec::new(),
            index: FxHashMap::default(),
            departed: FxHashMap::default(),
            library_sizes: SeatMap::with_default(),
            commanders: SeatMap::with_default(),
            applied: 0,
        }
    }

    /// Apply one game-state message.
    ///
    /// On `CorruptState` the tracker must be discarded; it may have applied
    /// part of the message.
    pub fn apply(&mut self, message: &GameStateMessage) -> Result<(), MatchError> {
        for annotation in &message.annotations {
            if let Some(remap) = annotation.id_change() {
                self.apply_remap(remap)?;
            }
        }

        let mut snapshotted = SnapshotZones::new();
        for zone in &message.zones {
            self.learn_zone(zone);
            if self.config.is_snapshot_kind(zone.kind) {
                self.apply_snapshot(zone);
                snapshotted.push(zone.zone_id);
            }
        }

        for object in &message.game_objects {
            self.observe(object, &snapshotted)?;
        }

        // Retired ids are matched verbatim: an id retired because it was
        // renumbered is no longer indexed, so its card is unaffected.
        for &id in &message.diff_deleted_instance_ids {
            if let Some(&slot) = self.index.get(&id) {
                if let Some(zone) = self.zones.evict(id) {
                    debug!(%id, %zone, "instance deleted");
                    self.departed.insert(slot, zone);
                }
            }
        }

        self.applied += 1;
        Ok(())
    }

    fn apply_remap(&mut self, remap: InstanceRemap) -> Result<(), MatchError> {
        self.remaps.record(remap)?;

        let Some(slot) = self.index.remove(&remap.from) else {
            trace!(from = %remap.from, to = %remap.to, "id change for untracked instance");
            return Ok(());
        };
        debug!(from = %remap.from, to = %remap.to, "instance renumbered");

        if let Some(absorbed) = self.index.remove(&remap.to) {
            // The new id was observed first: both records are the same card.
            let newer = self.slots[absorbed].take();
            self.departed.remove(&absorbed);
            if let (Some(newer), Some(card)) = (newer, self.slots[slot].as_mut()) {
                card.card_id = newer.card_id.or(card.card_id);
                card.owner = newer.owner.or(card.owner);
            }
        }

        if self.zones.contains(remap.to) {
            self.zones.evict(remap.from);
        } else {
            self.zones.rename(remap.from, remap.to);
        }

        if let Some(card) = self.slots[slot].as_mut() {
            card.relabel(remap.to);
        }
        self.index.insert(remap.to, slot);
        Ok(())
    }

    fn learn_zone(&mut self, zone: &ZoneInfo) {
        let known = self.layout.get(zone.zone_id);
        let owner = zone.owner_seat_id.or_else(|| known.and_then(|z| z.owner));
        let visibility = zone
            .visibility
            .or_else(|| known.map(|z| z.visibility))
            .unwrap_or_else(|| zone.kind.default_visibility());

        let mut config = ZoneConfig::new(zone.zone_id, zone.kind).with_visibility(visibility);
        config.owner = owner;
        self.layout.learn(config);
    }

    fn apply_snapshot(&mut self, zone: &ZoneInfo) {
        let (owner, visibility) = self.zone_traits(zone.zone_id);
        let listed: Vec<InstanceId> = zone
            .object_instance_ids
            .iter()
            .map(|&id| self.remaps.resolve(id))
            .collect();

        for &id in &listed {
            let slot = self.ensure(id, owner, visibility);
            self.departed.remove(&slot);
        }

        let evicted = self.zones.replace_zone(zone.zone_id, &listed);
        for id in evicted {
            if let Some(&slot) = self.index.get(&id) {
                trace!(%id, zone = %zone.zone_id, "instance left snapshot zone");
                self.departed.insert(slot, zone.zone_id);
            }
        }

        if zone.kind == ZoneKind::Library {
            if let Some(owner) = owner {
                let size = &mut self.library_sizes[owner];
                *size = (*size).max(listed.len());
            }
        }
    }

    fn observe(&mut self, object: &GameObject, snapshotted: &SnapshotZones) -> Result<(), MatchError> {
        if !self.config.is_tracked_object(object.kind) {
            return Ok(());
        }

        let id = self.remaps.resolve(object.instance_id);
        let existing = self.get_current(id);

        let owner = object
            .owner_seat_id
            .or_else(|| existing.and_then(|c| c.owner))
            .ok_or(CorruptState::MissingOwner(id))?;
        // grpId 0 stands for a face-down object.
        let card_id = object
            .grp_id
            .filter(|c| c.raw() != 0)
            .or_else(|| existing.and_then(|c| c.card_id))
            .ok_or(CorruptState::MissingCardId(id))?;

        let zone_visibility = object.zone_id.map(|z| self.zone_traits(z).1);
        let visibility = object
            .visibility
            .or(zone_visibility)
            .or_else(|| existing.map(|c| c.visibility))
            .unwrap_or(ZoneVisibility::Hidden);

        let slot = self.ensure(id, Some(owner), visibility);
        if let Some(card) = self.slots[slot].as_mut() {
            card.card_id = Some(card_id);
            card.owner = Some(owner);
            card.visibility = visibility;
        }

        let Some(zone) = object.zone_id else {
            return Ok(());
        };

        let current = self.zones.zone_of(id);
        let governed = snapshotted.contains(&zone) || current.is_some_and(|c| snapshotted.contains(&c));
        if governed {
            trace!(%id, %zone, "snapshot governs placement");
        } else if current != Some(zone) {
            debug!(%id, card = %card_id, from = ?current, to = %zone, "instance moved");
            self.zones.place(id, zone);
            self.departed.remove(&slot);
        }

        if self.layout.kind_of(zone) == Some(ZoneKind::Command) {
            let commanders = &mut self.commanders[owner];
            if !commanders.contains(&card_id) {
                commanders.push(card_id);
            }
        }

        Ok(())
    }

    fn zone_traits(&self, zone: ZoneId) -> (Option<Seat>, ZoneVisibility) {
        match self.layout.get(zone) {
            Some(config) => (config.owner, config.visibility),
            None => (None, ZoneVisibility::Hidden),
        }
    }

    /// Slot of `id`, creating an unidentified instance if it is new.
    fn ensure(&mut self, id: InstanceId, owner: Option<Seat>, visibility: ZoneVisibility) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            if let Some(card) = self.slots[slot].as_mut() {
                if card.owner.is_none() {
                    card.owner = owner;
                }
            }
            return slot;
        }

        let mut card = CardInstance::unidentified(id).with_visibility(visibility);
        card.owner = owner;
        let slot = self.slots.len();
        self.slots.push(Some(card));
        self.index.insert(id, slot);
        slot
    }

    fn get_current(&self, id: InstanceId) -> Option<&CardInstance> {
        let &slot = self.index.get(&id)?;
        self.slots[slot].as_ref()
    }

    /// Look up an instance by any id it has ever had.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&CardInstance> {
        self.get_current(self.remaps.resolve(id))
    }

    /// Current zone of an instance, by any id it has ever had.
    #[must_use]
    pub fn zone_of(&self, id: InstanceId) -> Option<ZoneId> {
        self.zones.zone_of(self.remaps.resolve(id))
    }

    /// Kind of a zone, as learned or from the fallback layout.
    #[must_use]
    pub fn zone_kind(&self, zone: ZoneId) -> Option<ZoneKind> {
        self.layout.kind_of(zone)
    }

    /// All instances, in first-observed order.
    pub fn instances(&self) -> impl Iterator<Item = &CardInstance> {
        self.slots.iter().flatten()
    }

    /// Instances whose zone cannot be confirmed, with the zone they left.
    pub fn unconfirmed(&self) -> impl Iterator<Item = (&CardInstance, Option<ZoneId>)> {
        self.slots.iter().enumerate().filter_map(|(slot, card)| {
            let card = card.as_ref()?;
            if self.zones.contains(card.instance_id) {
                return None;
            }
            Some((card, self.departed.get(&slot).copied()))
        })
    }

    /// Largest library observed for a seat.
    #[must_use]
    pub fn library_size(&self, seat: Seat) -> usize {
        self.library_sizes[seat]
    }

    /// Cards observed in a seat's command zone, in order.
    #[must_use]
    pub fn commanders(&self, seat: Seat) -> &[CardId] {
        &self.commanders[seat]
    }

    /// Zone residency.
    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    /// Zones known so far.
    #[must_use]
    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    /// Reconstruction policy.
    #[must_use]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Number of tracked instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if nothing has been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of messages applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }
}
