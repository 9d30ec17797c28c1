//! Mudhall Shared - wire types exchanged between the server and its clients
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - ids travel as strings

pub mod messages;

pub use messages::{
    ClientMessage, InboundEnvelope, InventoryEntry, MapData, MapLocation, MapRoom, PlayerInfo,
    RoomObject, RoomObjectKind, ServerMessage,
};
