//! Builders for the client-side sync payloads.

use std::sync::Arc;

use mudhall_domain::attributes::{ATTR_COLOR, ATTR_PICTURE, ATTR_TITLE, ATTR_TYPE};
use mudhall_domain::ObjectKind;
use mudhall_shared::{
    InventoryEntry, MapData, MapLocation, MapRoom, PlayerInfo, RoomObject, RoomObjectKind,
    ServerMessage,
};

use crate::entities::{Area, Character, Entity, Room, World};

pub struct RoomSync {
    world: Arc<World>,
}

impl RoomSync {
    pub fn new(world: Arc<World>) -> Self {
        Self { world }
    }

    /// Visible objects in the room. Offline characters are skipped.
    pub async fn room_objects(&self, room: &Room) -> Vec<RoomObject> {
        let mut objects = Vec::new();
        for id in room.contents().await {
            let object = match self.world.registry().get(id).await {
                Ok(Entity::Character(c)) => {
                    if !c.is_online().await {
                        continue;
                    }
                    RoomObject {
                        id: id.to_string(),
                        name: c.name().to_string(),
                        kind: RoomObjectKind::Character,
                        picture: c.attribute(ATTR_PICTURE).await,
                    }
                }
                Ok(Entity::MobInstance(m)) => RoomObject {
                    id: id.to_string(),
                    name: m.template_name().to_string(),
                    kind: RoomObjectKind::Mob,
                    picture: m.attribute(ATTR_PICTURE).await,
                },
                Ok(Entity::ItemInstance(i)) => RoomObject {
                    id: id.to_string(),
                    name: i.template_name().to_string(),
                    kind: RoomObjectKind::Item,
                    picture: i.attribute(ATTR_PICTURE).await,
                },
                _ => continue,
            };
            objects.push(object);
        }
        objects
    }

    pub async fn map(&self, area: &Area) -> MapData {
        let mut rooms = Vec::new();
        for room in area.rooms().await {
            let state = room.snapshot().await;
            let coords = room.coords();
            rooms.push(MapRoom {
                title: state.attributes.resolve(ObjectKind::Room, ATTR_TITLE),
                color: state.attributes.resolve(ObjectKind::Room, ATTR_COLOR),
                kind: state.attributes.resolve(ObjectKind::Room, ATTR_TYPE),
                x: coords.x,
                y: coords.y,
                z: coords.z,
            });
        }
        MapData {
            name: area.name().await,
            rooms,
        }
    }

    pub async fn inventory(&self, character: &Character) -> Vec<InventoryEntry> {
        let inventory = character.inventory().await;
        let mut entries = Vec::new();
        for entry in inventory.entries() {
            if let Ok(item) = self.world.registry().item_instance(entry.id).await {
                entries.push(InventoryEntry {
                    id: entry.id.to_string(),
                    name: item.template_name().to_string(),
                    slot: entry.slot,
                });
            }
        }
        entries
    }

    pub async fn player_info(&self, character: &Character) -> PlayerInfo {
        PlayerInfo {
            id: character.id().to_string(),
            name: character.name().to_string(),
            title: character.attribute(ATTR_TITLE).await,
        }
    }

    /// Sends the character everything the client needs to render `room`.
    pub async fn room_view(&self, character: &Character, room: &Room, include_map: bool) {
        if include_map {
            if let Some(area) = self.world.area(room.area_id()).await {
                let _ = character.notify(ServerMessage::SyncMap(self.map(&area).await)).await;
            }
        }
        let coords = room.coords();
        let _ = character
            .notify(ServerMessage::SyncMapLocation(MapLocation {
                x: coords.x,
                y: coords.y,
                z: coords.z,
            }))
            .await;
        let _ = character
            .notify(ServerMessage::SyncRoomTitle(room.attribute(ATTR_TITLE).await))
            .await;
        let _ = character
            .notify(ServerMessage::SyncRoomObjects(self.room_objects(room).await))
            .await;
    }

    pub async fn send_inventory(&self, character: &Character) {
        let _ = character
            .notify(ServerMessage::SyncInventory(self.inventory(character).await))
            .await;
    }

    /// Pushes the current object list to every occupant.
    pub async fn refresh_room(&self, room: &Room) {
        let objects = self.room_objects(room).await;
        for occupant in self.world.occupants(room, None).await {
            let _ = occupant
                .notify(ServerMessage::SyncRoomObjects(objects.clone()))
                .await;
        }
    }
}
