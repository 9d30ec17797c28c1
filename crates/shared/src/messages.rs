//! WebSocket message types
//!
//! Inbound frames are `{ "type": ..., "payload": ... }`; outbound frames are
//! `{ "action": ..., "data": ... }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Client Messages (client → server)
// =============================================================================

/// Raw inbound frame before its payload is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// Messages from the client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// A command line, including its leading `/` marker
    Command(String),
    /// The client opened or closed its object editor panel
    ObjectEditorOpen(bool),
    /// A picture upload; the payload belongs to the picture collaborator
    ObjectPictureUpload(Value),
    /// Any other `type`; carries the type name
    Unknown(String),
}

impl ClientMessage {
    /// Parses a text frame.
    ///
    /// Malformed JSON, or a known `type` whose payload has the wrong shape, is an
    /// error. An unrecognised `type` is not.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: InboundEnvelope = serde_json::from_str(text)?;
        Self::try_from(envelope)
    }
}

impl TryFrom<InboundEnvelope> for ClientMessage {
    type Error = serde_json::Error;

    fn try_from(envelope: InboundEnvelope) -> Result<Self, Self::Error> {
        match envelope.kind.as_str() {
            "command" => Ok(Self::Command(serde_json::from_value(envelope.payload)?)),
            "objectEditorOpen" => Ok(Self::ObjectEditorOpen(serde_json::from_value(
                envelope.payload,
            )?)),
            "objectPictureUpload" => Ok(Self::ObjectPictureUpload(envelope.payload)),
            _ => Ok(Self::Unknown(envelope.kind)),
        }
    }
}

// =============================================================================
// Server Messages (server → client)
// =============================================================================

/// Messages from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Text for the client's main output
    ShowText(String),
    /// Minimap of the character's current area
    SyncMap(MapData),
    /// Character position within the minimap
    SyncMapLocation(MapLocation),
    /// Everything visible in the current room
    SyncRoomObjects(Vec<RoomObject>),
    SyncRoomTitle(String),
    SyncInventory(Vec<InventoryEntry>),
    SyncPermissions(Vec<String>),
    SyncPlayerInfo(PlayerInfo),
    /// Open (true) or close the object editor panel
    ToggleObjectEditor(bool),
    /// The server is closing this session
    Disconnect,
}

impl ServerMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::ShowText(text.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub name: String,
    pub rooms: Vec<MapRoom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRoom {
    pub title: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLocation {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomObjectKind {
    Character,
    Mob,
    Item,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomObject {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoomObjectKind,
    pub picture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: String,
    pub name: String,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub title: String,
}
