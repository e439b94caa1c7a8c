//! Reconstruction of a single match.
//!
//! A match is reconstructed from its bucket alone. The tracker is built on
//! entry and dropped on return, so a failing match never leaks state into
//! another one.

use serde::Serialize;
use tracing::{debug, info};

use crate::cards::CardId;
use crate::core::{InstanceId, MatchId, ParseConfig, Seat, SeatMap, ZoneId};
use crate::error::MatchError;
use crate::log::{DeckMessage, GreMessage, LogMessage, MatchState, Timestamp};
use crate::matches::{resolve_local_seat, MatchBucket};
use crate::reveal::{aggregate, CardCounts, RevealedCards};
use crate::tracker::ZoneTracker;

/// An identified instance whose final zone could not be confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnconfirmedCard {
    pub instance_id: InstanceId,
    pub card_id: CardId,
    pub owner: Option<Seat>,
    /// Zone the instance was last seen leaving.
    pub last_zone: Option<ZoneId>,
}

/// Reconstructed state of one match.
#[derive(Clone, Debug, Serialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub local_seat: Seat,
    pub opponent_name: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    /// A terminal message was seen; later log content cannot change the result.
    pub complete: bool,
    /// Revealed cards per seat, by permanent card id.
    pub revealed: RevealedCards,
    /// Deck submitted by the local seat.
    pub deck: CardCounts,
    pub sideboard: CardCounts,
    /// Largest library observed per seat.
    pub library_sizes: SeatMap<usize>,
    pub commanders: SeatMap<Vec<CardId>>,
    /// Excluded from `revealed`; listed for manual verification.
    pub unconfirmed: Vec<UnconfirmedCard>,
}

impl MatchReport {
    /// The seat facing the local player.
    #[must_use]
    pub fn opponent_seat(&self) -> Seat {
        self.local_seat.opponent()
    }

    /// Cards revealed by a seat.
    #[must_use]
    pub fn revealed_by(&self, seat: Seat) -> &CardCounts {
        &self.revealed[seat]
    }
}

/// Reconstruct one match.
pub fn reconstruct_match(bucket: &MatchBucket, config: &ParseConfig) -> Result<MatchReport, MatchError> {
    if !bucket.has_gre_messages() {
        return Err(MatchError::MissingDetailedLogging);
    }
    let local = resolve_local_seat(&bucket.messages)?;
    debug!(match_id = %bucket.id, %local, "local seat resolved");

    let mut tracker = ZoneTracker::new(config.clone());
    let mut deck: Option<&DeckMessage> = None;
    let mut complete = bucket.completed;

    for gre in bucket.messages.iter().flat_map(LogMessage::gre_messages) {
        match gre {
            GreMessage::ConnectResp(resp) => {
                if deck.is_none() && resp.local_seat() == Some(local) {
                    deck = resp.deck();
                }
            }
            GreMessage::GameState(event) => {
                let state = &event.game_state_message;
                tracker.apply(state)?;
                let match_state = state.game_info.as_ref().and_then(|info| info.match_state);
                if match_state == Some(MatchState::MatchComplete) {
                    complete = true;
                }
            }
            GreMessage::Other => {}
        }
    }

    let unconfirmed: Vec<UnconfirmedCard> = tracker
        .unconfirmed()
        .filter_map(|(card, last_zone)| {
            Some(UnconfirmedCard {
                instance_id: card.instance_id,
                card_id: card.card_id?,
                owner: card.owner,
                last_zone,
            })
        })
        .collect();

    let revealed = aggregate(&tracker, local);
    info!(
        match_id = %bucket.id,
        instances = tracker.len(),
        revealed = revealed[local.opponent()].total(),
        unconfirmed = unconfirmed.len(),
        "match reconstructed"
    );

    Ok(MatchReport {
        match_id: bucket.id.clone(),
        local_seat: local,
        opponent_name: bucket.player_name(local.opponent()).map(str::to_owned),
        start: bucket.start.clone(),
        end: bucket.end.clone(),
        complete,
        revealed,
        deck: deck.map(|d| d.deck_cards.iter().copied().collect()).unwrap_or_default(),
        sideboard: deck
            .map(|d| d.sideboard_cards.iter().copied().collect())
            .unwrap_or_default(),
        library_sizes: SeatMap::new(|seat| tracker.library_size(seat)),
        commanders: SeatMap::new(|seat| tracker.commanders(seat).to_vec()),
        unconfirmed,
    })
}
