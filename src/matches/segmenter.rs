//! Match segmentation.
//!
//! Messages are assigned to the match named by the most recent explicit
//! match identifier (room state or `gameInfo.matchID`). Messages seen before
//! any identifier, or after a match has completed and before the next one
//! opens, belong to no match and are dropped.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

use super::seat::resolve_local_seat;
use crate::core::{MatchId, Seat};
use crate::log::{LogMessage, ReservedPlayer, RoomStateKind, Timestamp};

/// All messages of one match, in log order.
#[derive(Clone, Debug)]
pub struct MatchBucket {
    pub id: MatchId,
    pub messages: Vec<LogMessage>,
    /// First timestamp carried by any message of the match.
    pub start: Option<Timestamp>,
    /// Timestamp of the completion event, if observed.
    pub end: Option<Timestamp>,
    pub completed: bool,
    /// Players reserved into the match room.
    pub players: Vec<ReservedPlayer>,
}

impl MatchBucket {
    fn new(id: MatchId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            start: None,
            end: None,
            completed: false,
            players: Vec::new(),
        }
    }

    fn absorb(&mut self, message: LogMessage) {
        if self.start.is_none() {
            self.start = message.timestamp().cloned();
        }
        if let LogMessage::RoomState(change) = &message {
            if !change.players.is_empty() {
                self.players = change.players.clone();
            }
            if change.state == RoomStateKind::MatchCompleted {
                self.completed = true;
                self.end = change.timestamp.clone();
            }
        }
        self.messages.push(message);
    }

    /// Check if any game-engine message reached this match.
    #[must_use]
    pub fn has_gre_messages(&self) -> bool {
        self.messages.iter().any(|m| !m.gre_messages().is_empty())
    }

    /// Display name of the player in `seat`, if the room named one.
    #[must_use]
    pub fn player_name(&self, seat: Seat) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.system_seat_id == seat)
            .and_then(|p| p.player_name.as_deref())
    }

    /// Summarize the match. The opponent is named only when the local seat resolves.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        let opponent_name = resolve_local_seat(&self.messages)
            .ok()
            .and_then(|local| self.player_name(local.opponent()))
            .map(str::to_owned);

        MatchSummary {
            id: self.id.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            opponent_name,
            completed: self.completed,
        }
    }
}

/// One line of the match list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub opponent_name: Option<String>,
    pub completed: bool,
}

/// Incremental partition of a message stream into matches.
///
/// ## Usage
///
/// ```
/// use arena_log::log::MessageExtractor;
/// use arena_log::matches::MatchSegmenter;
///
/// let log = br#"{ "matchGameRoomStateChangedEvent": { "gameRoomInfo": {
///     "gameRoomConfig": { "matchId": "m-1" },
///     "stateType": "MatchGameRoomStateType_Playing" } } }
/// "#;
/// let messages = MessageExtractor::new(log).filter_map(Result::ok).map(|e| e.message);
/// let segmenter = MatchSegmenter::from_messages(messages);
///
/// assert_eq!(segmenter.len(), 1);
/// assert_eq!(segmenter.buckets()[0].id.as_str(), "m-1");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MatchSegmenter {
    buckets: Vec<MatchBucket>,
    index: FxHashMap<MatchId, usize>,
    open: Option<usize>,
    dropped: usize,
}

impl MatchSegmenter {
    /// Create an empty segmenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment a complete message sequence.
    pub fn from_messages(messages: impl IntoIterator<Item = LogMessage>) -> Self {
        let mut segmenter = Self::new();
        for message in messages {
            segmenter.push(message);
        }
        segmenter
    }

    /// Route one message to its match.
    pub fn push(&mut self, message: LogMessage) {
        if let Some(id) = message.match_id() {
            let slot = match self.index.get(id) {
                Some(&slot) => slot,
                None => {
                    info!(match_id = %id, "match opened");
                    let slot = self.buckets.len();
                    self.index.insert(id.clone(), slot);
                    self.buckets.push(MatchBucket::new(id.clone()));
                    slot
                }
            };
            self.open = Some(slot);
        }

        let Some(slot) = self.open else {
            if !matches!(message, LogMessage::Unrecognized) {
                debug!("message outside any match");
            }
            self.dropped += 1;
            return;
        };

        let bucket = &mut self.buckets[slot];
        bucket.absorb(message);
        if bucket.completed {
            info!(match_id = %bucket.id, "match completed");
            self.open = None;
        }
    }

    /// Matches in order of first appearance.
    #[must_use]
    pub fn buckets(&self) -> &[MatchBucket] {
        &self.buckets
    }

    /// Look up a match by id.
    #[must_use]
    pub fn find(&self, id: &MatchId) -> Option<&MatchBucket> {
        self.index.get(id).map(|&slot| &self.buckets[slot])
    }

    /// The match currently receiving messages.
    #[must_use]
    pub fn current(&self) -> Option<&MatchBucket> {
        self.open.map(|slot| &self.buckets[slot])
    }

    /// The most recently opened match.
    #[must_use]
    pub fn latest(&self) -> Option<&MatchBucket> {
        self.buckets.last()
    }

    /// Summaries of all matches, in order of first appearance.
    #[must_use]
    pub fn summaries(&self) -> Vec<MatchSummary> {
        self.buckets.iter().map(MatchBucket::summary).collect()
    }

    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no match was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Messages that belonged to no match.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn room(match_id: &str, state: &str, ts: &str) -> LogMessage {
        serde_json::from_value(json!({
            "timestamp": ts,
            "matchGameRoomStateChangedEvent": { "gameRoomInfo": {
                "gameRoomConfig": {
                    "matchId": match_id,
                    "reservedPlayers": [
                        { "systemSeatId": 1, "playerName": "Alice" },
                        { "systemSeatId": 2, "playerName": "Bob" }
                    ]
                },
                "stateType": state
            }}
        }))
        .unwrap()
    }

    fn connect(seat: u8) -> LogMessage {
        serde_json::from_value(json!({
            "greToClientEvent": { "greToClientMessages": [
                { "type": "GREMessageType_ConnectResp", "systemSeatIds": [seat] }
            ]}
        }))
        .unwrap()
    }

    fn diagnostic() -> LogMessage {
        serde_json::from_value(json!({ "id": 7 })).unwrap()
    }

    #[test]
    fn test_partitions_by_match_id() {
        let segmenter = MatchSegmenter::from_messages([
            diagnostic(),
            room("m-1", "MatchGameRoomStateType_Playing", "1"),
            connect(1),
            room("m-1", "MatchGameRoomStateType_MatchCompleted", "2"),
            room("m-2", "MatchGameRoomStateType_Playing", "3"),
            connect(2),
        ]);

        assert_eq!(segmenter.len(), 2);
        assert_eq!(segmenter.buckets()[0].messages.len(), 3);
        assert_eq!(segmenter.buckets()[1].messages.len(), 2);
        assert_eq!(segmenter.dropped(), 1);
    }

    #[test]
    fn test_summaries() {
        let segmenter = MatchSegmenter::from_messages([
            room("m-1", "MatchGameRoomStateType_Playing", "100"),
            connect(2),
            room("m-1", "MatchGameRoomStateType_MatchCompleted", "200"),
            room("m-2", "MatchGameRoomStateType_Playing", "300"),
        ]);

        let summaries = segmenter.summaries();
        assert_eq!(summaries[0].start, Some(Timestamp::new("100")));
        assert_eq!(summaries[0].end, Some(Timestamp::new("200")));
        assert!(summaries[0].completed);
        assert_eq!(summaries[0].opponent_name.as_deref(), Some("Alice"));

        // No connection response: the local seat is unknown, so is the opponent.
        assert_eq!(summaries[1].opponent_name, None);
        assert!(!summaries[1].completed);
        assert_eq!(summaries[1].end, None);
    }

    #[test]
    fn test_messages_after_completion_are_dropped() {
        let segmenter = MatchSegmenter::from_messages([
            room("m-1", "MatchGameRoomStateType_MatchCompleted", "1"),
            connect(1),
        ]);

        assert_eq!(segmenter.buckets()[0].messages.len(), 1);
        assert!(segmenter.current().is_none());
        assert_eq!(segmenter.dropped(), 1);
    }

    #[test]
    fn test_reappearing_id_reopens_bucket() {
        let segmenter = MatchSegmenter::from_messages([
            room("m-1", "MatchGameRoomStateType_Playing", "1"),
            room("m-2", "MatchGameRoomStateType_Playing", "2"),
            room("m-1", "MatchGameRoomStateType_Playing", "3"),
            connect(1),
        ]);

        assert_eq!(segmenter.len(), 2);
        let first = segmenter.find(&MatchId::new("m-1")).unwrap();
        assert_eq!(first.messages.len(), 3);
        assert_eq!(segmenter.current().unwrap().id, MatchId::new("m-1"));
        assert_eq!(segmenter.latest().unwrap().id, MatchId::new("m-2"));
    }

    #[test]
    fn test_find_unknown() {
        let segmenter = MatchSegmenter::new();
        assert!(segmenter.is_empty());
        assert!(segmenter.find(&MatchId::new("nope")).is_none());
    }
}
