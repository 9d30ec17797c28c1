//! On-disk shapes of the data files.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mudhall_domain::{AreaId, AttributeMap, CharacterId, Coords, Location, ObjectContainer, RoomId};

pub const SCHEMA_VERSION_FILE: &str = "schema-version";
pub const WORLD_FILE: &str = "world.json";
pub const CHARACTERS_FILE: &str = "characters.json";
pub const ITEMS_FILE: &str = "items.json";
pub const MOBS_FILE: &str = "mobs.json";

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorldFile {
    #[serde(default)]
    pub areas: Vec<AreaRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AreaRecord {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub coords: Coords,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub here: ObjectContainer,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CharactersFile {
    #[serde(default)]
    pub characters: Vec<CharacterRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub inventory: ObjectContainer,
    pub location: Location,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ItemsFile {
    #[serde(default)]
    pub items: Vec<TemplateRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MobsFile {
    #[serde(default)]
    pub mobs: Vec<TemplateRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: Uuid,
    #[serde(default)]
    pub attributes: AttributeMap,
}
