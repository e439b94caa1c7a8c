//! Revealed-card aggregation.
//!
//! Counts come from **final** residency only. An instance counts for its
//! owner when the zone it rests in is observable from the local seat:
//!
//! - zones of a public kind (battlefield, graveyard, exile by default)
//! - the local seat's own hand
//! - an opponent's hand, for a card whose last observation was public
//!
//! Unconfirmed and unidentified instances never count.

use crate::core::{Seat, SeatMap, ZoneKind};
use crate::tracker::ZoneTracker;

use super::counts::CardCounts;

/// Per-seat revealed cards.
pub type RevealedCards = SeatMap<CardCounts>;

/// Aggregate a tracker's final state from `local`'s point of view.
///
/// Iteration follows first-observed instance order, so the output is
/// deterministic for a given message sequence.
#[must_use]
pub fn aggregate(tracker: &ZoneTracker, local: Seat) -> RevealedCards {
    let config = tracker.config();
    let mut revealed = RevealedCards::with_default();

    for card in tracker.instances() {
        let (Some(card_id), Some(owner)) = (card.card_id, card.owner) else {
            continue;
        };
        let Some(kind) = tracker
            .zones()
            .zone_of(card.instance_id)
            .and_then(|zone| tracker.zone_kind(zone))
        else {
            continue;
        };

        let observable = config.is_public_kind(kind)
            || (kind == ZoneKind::Hand && (owner == local || card.is_public()));
        if observable {
            revealed[owner].add(card_id);
        }
    }

    revealed
}
