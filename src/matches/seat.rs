//! Local seat resolution.
//!
//! The connection response names the seat the client occupies. Nothing else
//! is trusted: without one the match cannot be attributed, and seat 1 is
//! never assumed.

use tracing::warn;

use crate::core::Seat;
use crate::error::MatchError;
use crate::log::{GreMessage, LogMessage};

/// Find the local seat of a match.
///
/// The first connection response naming exactly one seat wins; later ones
/// that disagree are logged and ignored.
pub fn resolve_local_seat(messages: &[LogMessage]) -> Result<Seat, MatchError> {
    let mut resolved: Option<Seat> = None;

    let responses = messages
        .iter()
        .flat_map(LogMessage::gre_messages)
        .filter_map(|gre| match gre {
            GreMessage::ConnectResp(resp) => Some(resp),
            _ => None,
        });

    for resp in responses {
        let Some(seat) = resp.local_seat() else {
            warn!(seats = ?resp.system_seat_ids, "connection response without a single seat");
            continue;
        };
        match resolved {
            None => resolved = Some(seat),
            Some(first) if first != seat => {
                warn!(%first, conflicting = %seat, "conflicting local seat; keeping the first");
            }
            Some(_) => {}
        }
    }

    resolved.ok_or(MatchError::SeatUnresolved)
}
