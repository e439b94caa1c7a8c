//! Shared helpers: a builder for synthetic client logs.
#![allow(dead_code)]

use serde_json::{json, Value};

/// Builds a client log the way the client writes it: a diagnostic header
/// line, then the pretty-printed JSON payload on the following lines.
pub struct LogBuilder {
    text: String,
    clock: u64,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self {
            text: String::from("[UnityCrossThreadLogger]Client started\n"),
            clock: 638_000_000_000_000_000,
        }
    }

    /// Append a plain diagnostic line.
    pub fn line(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self.text.push('\n');
        self
    }

    /// Append one structured block, stamped with the next timestamp.
    pub fn block(mut self, mut value: Value) -> Self {
        self.clock += 1;
        if let Some(map) = value.as_object_mut() {
            map.entry("timestamp").or_insert(json!(self.clock.to_string()));
        }
        self.text.push_str("[UnityCrossThreadLogger]==> event\n");
        self.text.push_str(&serde_json::to_string_pretty(&value).unwrap());
        self.text.push('\n');
        self
    }

    pub fn room(self, match_id: &str, state: &str) -> Self {
        self.block(json!({
            "matchGameRoomStateChangedEvent": { "gameRoomInfo": {
                "gameRoomConfig": {
                    "matchId": match_id,
                    "reservedPlayers": [
                        { "userId": "U1", "playerName": "Alice", "systemSeatId": 1 },
                        { "userId": "U2", "playerName": "Bob", "systemSeatId": 2 }
                    ]
                },
                "stateType": format!("MatchGameRoomStateType_{}", state)
            }}
        }))
    }

    pub fn start(self, match_id: &str) -> Self {
        self.room(match_id, "Playing")
    }

    pub fn complete(self, match_id: &str) -> Self {
        self.room(match_id, "MatchCompleted")
    }

    pub fn connect(self, seat: u8, deck: &[u32]) -> Self {
        self.connect_with_sideboard(seat, deck, &[])
    }

    pub fn connect_with_sideboard(self, seat: u8, deck: &[u32], sideboard: &[u32]) -> Self {
        self.gre(vec![json!({
            "type": "GREMessageType_ConnectResp",
            "systemSeatIds": [seat],
            "connectResp": { "deckMessage": { "deckCards": deck, "sideboardCards": sideboard } }
        })])
    }

    pub fn game_state(self, state: Value) -> Self {
        self.gre(vec![json!({
            "type": "GREMessageType_GameStateMessage",
            "systemSeatIds": [1],
            "gameStateMessage": state
        })])
    }

    pub fn gre(self, messages: Vec<Value>) -> Self {
        self.block(json!({ "greToClientEvent": { "greToClientMessages": messages } }))
    }

    pub fn build(self) -> String {
        self.text
    }
}

pub fn zone(zone_id: u32, kind: &str, owner: Option<u8>, ids: &[u32]) -> Value {
    let mut value = json!({
        "zoneId": zone_id,
        "type": format!("ZoneType_{}", kind),
        "objectInstanceIds": ids
    });
    if let Some(owner) = owner {
        value["ownerSeatId"] = json!(owner);
    }
    value
}

pub fn hand(owner: u8, ids: &[u32]) -> Value {
    let zone_id = if owner == 1 { 31 } else { 35 };
    zone(zone_id, "Hand", Some(owner), ids)
}

pub fn card(instance_id: u32, grp_id: u32, zone_id: u32, owner: u8) -> Value {
    json!({
        "instanceId": instance_id,
        "grpId": grp_id,
        "type": "GameObjectType_Card",
        "zoneId": zone_id,
        "visibility": "Visibility_Public",
        "ownerSeatId": owner,
        "controllerSeatId": owner
    })
}

pub fn id_change(from: u32, to: u32) -> Value {
    json!({
        "id": 1,
        "type": ["AnnotationType_ObjectIdChanged"],
        "affectedIds": [from],
        "details": [
            { "key": "orig_id", "type": "KeyValuePairValueType_int32", "valueInt32": [from] },
            { "key": "new_id", "type": "KeyValuePairValueType_int32", "valueInt32": [to] }
        ]
    })
}

pub const BATTLEFIELD: u32 = 28;
pub const EXILE: u32 = 29;
pub const GRAVEYARD_ONE: u32 = 33;
pub const GRAVEYARD_TWO: u32 = 37;
pub const LIBRARY_TWO: u32 = 36;
pub const COMMAND: u32 = 26;
