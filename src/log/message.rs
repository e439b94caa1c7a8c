//! Typed protocol messages.
//!
//! Each structured block in the client log is an envelope carrying at most
//! one event. The engine interprets two of them:
//!
//! - `greToClientEvent`: game-engine messages (connection response, game
//!   state diffs with zones, objects and annotations)
//! - `matchGameRoomStateChangedEvent`: match room setup and completion
//!
//! Anything else decodes to `LogMessage::Unrecognized`. Inside the
//! interpreted events, required fields are required: a game object without
//! an `instanceId` or `type` fails the whole block rather than defaulting.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::{InstanceId, MatchId, Seat, ZoneId, ZoneKind, ZoneVisibility};

/// Seat list as carried by `systemSeatIds`.
pub type SeatIds = SmallVec<[Seat; 2]>;

/// Envelope timestamp, kept verbatim.
///
/// The client writes it either as a string or a bare number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct Timestamp(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Number(u64),
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        match raw {
            RawTimestamp::Text(text) => Timestamp(text),
            RawTimestamp::Number(n) => Timestamp(n.to_string()),
        }
    }
}

impl Timestamp {
    /// Create a timestamp from its textual form.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The timestamp as written in the log.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decoded structured event.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "Envelope")]
pub enum LogMessage {
    /// Batch of game-engine messages.
    GreToClient(GreEvent),
    /// Match room setup or completion.
    RoomState(RoomStateChange),
    /// A structured block the engine does not interpret.
    Unrecognized,
}

impl LogMessage {
    /// Envelope timestamp, if the event carried one.
    #[must_use]
    pub fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            LogMessage::GreToClient(event) => event.timestamp.as_ref(),
            LogMessage::RoomState(change) => change.timestamp.as_ref(),
            LogMessage::Unrecognized => None,
        }
    }

    /// Explicit match identifier carried by this message, if any.
    #[must_use]
    pub fn match_id(&self) -> Option<&MatchId> {
        match self {
            LogMessage::RoomState(change) => Some(&change.match_id),
            LogMessage::GreToClient(event) => event.messages.iter().find_map(|m| match m {
                GreMessage::GameState(state) => state
                    .game_state_message
                    .game_info
                    .as_ref()
                    .and_then(|info| info.match_id.as_ref()),
                _ => None,
            }),
            LogMessage::Unrecognized => None,
        }
    }

    /// Game-engine messages in this event (empty for other events).
    #[must_use]
    pub fn gre_messages(&self) -> &[GreMessage] {
        match self {
            LogMessage::GreToClient(event) => &event.messages,
            _ => &[],
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    timestamp: Option<Timestamp>,
    gre_to_client_event: Option<GreToClientPayload>,
    match_game_room_state_changed_event: Option<RoomStatePayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GreToClientPayload {
    #[serde(default)]
    gre_to_client_messages: Vec<GreMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomStatePayload {
    game_room_info: GameRoomInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRoomInfo {
    game_room_config: GameRoomConfig,
    #[serde(default)]
    state_type: Option<RoomStateKind>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRoomConfig {
    match_id: MatchId,
    #[serde(default)]
    reserved_players: Vec<ReservedPlayer>,
}

impl From<Envelope> for LogMessage {
    fn from(envelope: Envelope) -> Self {
        if let Some(gre) = envelope.gre_to_client_event {
            return LogMessage::GreToClient(GreEvent {
                timestamp: envelope.timestamp,
                messages: gre.gre_to_client_messages,
            });
        }
        if let Some(room) = envelope.match_game_room_state_changed_event {
            let info = room.game_room_info;
            return LogMessage::RoomState(RoomStateChange {
                timestamp: envelope.timestamp,
                match_id: info.game_room_config.match_id,
                state: info.state_type.unwrap_or(RoomStateKind::Other),
                players: info.game_room_config.reserved_players,
            });
        }
        LogMessage::Unrecognized
    }
}

/// A batch of game-engine messages sharing one envelope.
#[derive(Clone, Debug)]
pub struct GreEvent {
    pub timestamp: Option<Timestamp>,
    pub messages: Vec<GreMessage>,
}

/// Match room state change.
#[derive(Clone, Debug)]
pub struct RoomStateChange {
    pub timestamp: Option<Timestamp>,
    pub match_id: MatchId,
    pub state: RoomStateKind,
    pub players: Vec<ReservedPlayer>,
}

/// Room lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum RoomStateKind {
    #[serde(rename = "MatchGameRoomStateType_Playing")]
    Playing,
    #[serde(rename = "MatchGameRoomStateType_MatchCompleted")]
    MatchCompleted,
    #[serde(other)]
    Other,
}

/// A player reserved into a match room.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedPlayer {
    pub system_seat_id: Seat,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Game-engine message, discriminated by its `type` field.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum GreMessage {
    #[serde(rename = "GREMessageType_ConnectResp")]
    ConnectResp(ConnectResp),
    #[serde(
        rename = "GREMessageType_GameStateMessage",
        alias = "GREMessageType_QueuedGameStateMessage"
    )]
    GameState(GameStateEvent),
    /// Prompts, timers, and other kinds the engine does not interpret.
    #[serde(other)]
    Other,
}

/// Connection response: tells the client which seat it occupies.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResp {
    #[serde(default)]
    pub system_seat_ids: SeatIds,
    #[serde(default)]
    pub connect_resp: Option<ConnectRespBody>,
}

impl ConnectResp {
    /// The local seat, when the response names exactly one.
    #[must_use]
    pub fn local_seat(&self) -> Option<Seat> {
        match self.system_seat_ids.as_slice() {
            [seat] => Some(*seat),
            _ => None,
        }
    }

    /// Deck list submitted by the local player, if present.
    #[must_use]
    pub fn deck(&self) -> Option<&DeckMessage> {
        self.connect_resp.as_ref()?.deck_message.as_ref()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRespBody {
    #[serde(default)]
    pub deck_message: Option<DeckMessage>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMessage {
    #[serde(default)]
    pub deck_cards: Vec<CardId>,
    #[serde(default)]
    pub sideboard_cards: Vec<CardId>,
}

/// Game state message addressed to one or more seats.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateEvent {
    #[serde(default)]
    pub system_seat_ids: SeatIds,
    pub game_state_message: GameStateMessage,
}

/// Full or diff game state.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateMessage {
    #[serde(default)]
    pub game_state_id: Option<u32>,
    #[serde(default)]
    pub game_info: Option<GameInfo>,
    #[serde(default)]
    pub zones: Vec<ZoneInfo>,
    #[serde(default)]
    pub game_objects: Vec<GameObject>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub diff_deleted_instance_ids: Vec<InstanceId>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    #[serde(rename = "matchID", default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub match_state: Option<MatchState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum MatchState {
    #[serde(rename = "MatchState_GameInProgress")]
    GameInProgress,
    #[serde(rename = "MatchState_GameComplete")]
    GameComplete,
    #[serde(rename = "MatchState_MatchComplete")]
    MatchComplete,
    #[serde(other)]
    Other,
}

/// Zone description with its current membership.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    pub zone_id: ZoneId,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    #[serde(default)]
    pub visibility: Option<ZoneVisibility>,
    #[serde(default)]
    pub owner_seat_id: Option<Seat>,
    /// Omitted by the server when the zone is empty.
    #[serde(default)]
    pub object_instance_ids: Vec<InstanceId>,
}

/// Kind of a game object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum ObjectKind {
    #[serde(rename = "GameObjectType_Card")]
    Card,
    #[serde(rename = "GameObjectType_SplitCard")]
    SplitCard,
    #[serde(rename = "GameObjectType_SplitLeft")]
    SplitLeft,
    #[serde(rename = "GameObjectType_SplitRight")]
    SplitRight,
    #[serde(rename = "GameObjectType_Adventure")]
    Adventure,
    #[serde(rename = "GameObjectType_MDFCBack")]
    MdfcBack,
    #[serde(rename = "GameObjectType_Token")]
    Token,
    #[serde(rename = "GameObjectType_Ability")]
    Ability,
    #[serde(rename = "GameObjectType_Emblem")]
    Emblem,
    #[serde(other)]
    Other,
}

/// One observed game object.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObject {
    pub instance_id: InstanceId,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default)]
    pub grp_id: Option<CardId>,
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    #[serde(default)]
    pub visibility: Option<ZoneVisibility>,
    #[serde(default)]
    pub owner_seat_id: Option<Seat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum AnnotationKind {
    #[serde(rename = "AnnotationType_ObjectIdChanged")]
    ObjectIdChanged,
    #[serde(other)]
    Other,
}

/// Key/value pair attached to an annotation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDetail {
    pub key: String,
    #[serde(default)]
    pub value_int32: Vec<i64>,
}

/// Annotation attached to a game state diff.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(rename = "type", default)]
    pub kinds: Vec<AnnotationKind>,
    #[serde(default)]
    pub affected_ids: Vec<i64>,
    #[serde(default)]
    pub details: Vec<AnnotationDetail>,
}

/// Directive that an instance is now known under a new ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceRemap {
    pub from: InstanceId,
    pub to: InstanceId,
}

impl Annotation {
    /// Check if the annotation carries a given kind.
    #[must_use]
    pub fn has_kind(&self, kind: AnnotationKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn int_detail(&self, key: &str) -> Option<u32> {
        let detail = self.details.iter().find(|d| d.key == key)?;
        let value = *detail.value_int32.first()?;
        u32::try_from(value).ok()
    }

    /// The id change this annotation describes.
    ///
    /// `None` if it is not an id-change annotation or lacks either id.
    #[must_use]
    pub fn id_change(&self) -> Option<InstanceRemap> {
        if !self.has_kind(AnnotationKind::ObjectIdChanged) {
            return None;
        }
        Some(InstanceRemap {
            from: InstanceId(self.int_detail("orig_id")?),
            to: InstanceId(self.int_detail("new_id")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> LogMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_connect_resp() {
        let msg = decode(json!({
            "timestamp": "638000000000000000",
            "greToClientEvent": { "greToClientMessages": [{
                "type": "GREMessageType_ConnectResp",
                "systemSeatIds": [2],
                "connectResp": { "deckMessage": { "deckCards": [100, 100, 200] } }
            }]}
        }));

        assert_eq!(msg.timestamp().unwrap().as_str(), "638000000000000000");
        match &msg.gre_messages()[0] {
            GreMessage::ConnectResp(resp) => {
                assert_eq!(resp.local_seat(), Some(Seat::TWO));
                assert_eq!(resp.deck().unwrap().deck_cards.len(), 3);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_connect_resp_with_two_seats_has_no_local_seat() {
        let resp: ConnectResp = serde_json::from_value(json!({ "systemSeatIds": [1, 2] })).unwrap();
        assert_eq!(resp.local_seat(), None);
    }

    #[test]
    fn test_unknown_gre_type_is_other() {
        let msg = decode(json!({
            "greToClientEvent": { "greToClientMessages": [{ "type": "GREMessageType_TimerStateMessage" }] }
        }));
        assert!(matches!(msg.gre_messages()[0], GreMessage::Other));
    }

    #[test]
    fn test_queued_game_state_alias() {
        let msg = decode(json!({
            "greToClientEvent": { "greToClientMessages": [{
                "type": "GREMessageType_QueuedGameStateMessage",
                "gameStateMessage": { "gameInfo": { "matchID": "m-1" } }
            }]}
        }));
        assert_eq!(msg.match_id(), Some(&MatchId::new("m-1")));
    }

    #[test]
    fn test_room_state() {
        let msg = decode(json!({
            "timestamp": 1700000000000u64,
            "matchGameRoomStateChangedEvent": { "gameRoomInfo": {
                "gameRoomConfig": {
                    "matchId": "m-7",
                    "reservedPlayers": [
                        { "userId": "u1", "playerName": "Alice", "systemSeatId": 1 },
                        { "userId": "u2", "playerName": "Bob", "systemSeatId": 2 }
                    ]
                },
                "stateType": "MatchGameRoomStateType_MatchCompleted"
            }}
        }));

        match msg {
            LogMessage::RoomState(change) => {
                assert_eq!(change.match_id, MatchId::new("m-7"));
                assert_eq!(change.state, RoomStateKind::MatchCompleted);
                assert_eq!(change.players.len(), 2);
                assert_eq!(change.timestamp, Some(Timestamp::new("1700000000000")));
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_envelope() {
        let msg = decode(json!({ "id": "abc", "request": "{}" }));
        assert!(matches!(msg, LogMessage::Unrecognized));
        assert!(msg.match_id().is_none());
    }

    #[test]
    fn test_game_object_requires_instance_id() {
        let result: Result<GameObject, _> =
            serde_json::from_value(json!({ "type": "GameObjectType_Card", "grpId": 5 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_seat_rejects_block() {
        let result: Result<LogMessage, _> = serde_json::from_value(json!({
            "greToClientEvent": { "greToClientMessages": [{
                "type": "GREMessageType_ConnectResp", "systemSeatIds": [7]
            }]}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_id_change_annotation() {
        let annotation: Annotation = serde_json::from_value(json!({
            "id": 12,
            "type": ["AnnotationType_ObjectIdChanged"],
            "affectedIds": [284],
            "details": [
                { "key": "orig_id", "type": "KeyValuePairValueType_int32", "valueInt32": [284] },
                { "key": "new_id", "type": "KeyValuePairValueType_int32", "valueInt32": [289] }
            ]
        }))
        .unwrap();

        assert_eq!(
            annotation.id_change(),
            Some(InstanceRemap { from: InstanceId(284), to: InstanceId(289) })
        );
    }

    #[test]
    fn test_zone_transfer_is_not_id_change() {
        let annotation: Annotation = serde_json::from_value(json!({
            "type": ["AnnotationType_ZoneTransfer"],
            "details": [{ "key": "category", "valueString": ["PlayLand"] }]
        }))
        .unwrap();

        assert_eq!(annotation.kinds, vec![AnnotationKind::Other]);
        assert_eq!(annotation.id_change(), None);
    }
}
