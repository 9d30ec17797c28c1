//! The world graph: areas, characters and templates, plus spatial queries
//! across them.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use mudhall_domain::{AreaId, CharacterId, Direction, DomainError, ExitTarget, Location};
use mudhall_shared::ServerMessage;

use super::registry::{Entity, Registry};
use super::template::{ItemFamily, MobFamily, TemplateList};
use super::{Area, Character, Item, ItemInstance, Mob, MobInstance, Room};

/// Outcome of [`World::remove_vacant_room`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRemoval {
    Removed,
    NotFound,
    NotEmpty,
    /// A character's saved location points at the room.
    HomeOf(String),
}

/// Where an exit out of a room leads.
pub enum Exit {
    Open(Arc<Room>),
    /// Explicitly closed, with an optional message for whoever tried it.
    Blocked(Option<String>),
    None,
}

pub struct World {
    registry: Arc<Registry>,
    areas: RwLock<Vec<Arc<Area>>>,
    characters: RwLock<Vec<Arc<Character>>>,
    pub(super) items: TemplateList<ItemFamily>,
    pub(super) mobs: TemplateList<MobFamily>,
}

impl World {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            areas: RwLock::new(Vec::new()),
            characters: RwLock::new(Vec::new()),
            items: TemplateList::new(),
            mobs: TemplateList::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    // =========================================================================
    // Areas and rooms
    // =========================================================================

    /// Adds an area and registers it along with any rooms it already holds.
    pub async fn add_area(&self, area: Arc<Area>) -> Result<(), DomainError> {
        let name = area.name().await;
        if self.area_by_name(&name).await.is_some() {
            return Err(DomainError::duplicate(name));
        }
        for room in area.rooms().await {
            self.registry.register(Entity::Room(room)).await;
        }
        self.registry.register(Entity::Area(Arc::clone(&area))).await;
        self.areas.write().await.push(area);
        Ok(())
    }

    pub async fn areas(&self) -> Vec<Arc<Area>> {
        self.areas.read().await.clone()
    }

    pub async fn area(&self, id: AreaId) -> Option<Arc<Area>> {
        self.areas
            .read()
            .await
            .iter()
            .find(|a| a.id() == id)
            .cloned()
    }

    pub async fn area_by_name(&self, name: &str) -> Option<Arc<Area>> {
        for area in self.areas().await {
            if area.name().await.eq_ignore_ascii_case(name) {
                return Some(area);
            }
        }
        None
    }

    pub async fn add_room(&self, area: &Area, room: Arc<Room>) -> Result<(), DomainError> {
        area.add_room(Arc::clone(&room)).await?;
        self.registry.register(Entity::Room(room)).await;
        Ok(())
    }

    /// Removes `room` when nothing is in it and no character calls it home.
    ///
    /// The area's room list and the room stay locked from the checks through
    /// the removal, so nothing can be placed in it meanwhile.
    pub async fn remove_vacant_room(&self, area: &Area, room: &Room) -> RoomRemoval {
        let mut rooms = area.rooms_mut().await;
        let mut floor = room.lock().await;
        if !floor.here.is_empty() {
            return RoomRemoval::NotEmpty;
        }
        let location = room.location();
        for character in self.characters().await {
            if character.location().await == location {
                return RoomRemoval::HomeOf(character.name().to_string());
            }
        }
        let Some(index) = rooms.iter().position(|r| r.id() == room.id()) else {
            return RoomRemoval::NotFound;
        };
        rooms.remove(index);
        floor.removed = true;
        self.registry.unregister(room.id().to_uuid()).await;
        RoomRemoval::Removed
    }

    pub async fn room_for(&self, location: Location) -> Option<Arc<Room>> {
        self.area(location.area_id)
            .await?
            .room_at(location.coords)
            .await
    }

    /// Resolves the exit in `direction`, honouring a direction attribute
    /// override before the implicit coordinate neighbour.
    pub async fn connected_room(&self, room: &Room, direction: Direction) -> Exit {
        let raw = room.attribute(direction.as_str()).await;
        let target = match ExitTarget::parse(&raw) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(
                    room_id = %room.id(),
                    direction = %direction,
                    error = %e,
                    "Ignoring malformed exit"
                );
                return Exit::None;
            }
        };

        let found = match target {
            None => match self.area(room.area_id()).await {
                Some(area) => area.room_at(room.coords().offset(direction.offset())).await,
                None => None,
            },
            Some(ExitTarget::Local(coords)) => match self.area(room.area_id()).await {
                Some(area) => area.room_at(coords).await,
                None => None,
            },
            Some(ExitTarget::Remote { area, coords }) => match self.area_by_name(&area).await {
                Some(area) => area.room_at(coords).await,
                None => None,
            },
            Some(ExitTarget::Blocked(message)) => return Exit::Blocked(message),
        };

        match found {
            Some(room) => Exit::Open(room),
            None => Exit::None,
        }
    }

    /// Directions with an open exit.
    pub async fn exits(&self, room: &Room) -> Vec<Direction> {
        let mut open = Vec::new();
        for direction in Direction::ALL {
            if let Exit::Open(_) = self.connected_room(room, direction).await {
                open.push(direction);
            }
        }
        open
    }

    // =========================================================================
    // Room contents
    // =========================================================================

    /// Characters in the room with a live session, minus `except`.
    ///
    /// Contents are copied under the room lock, which is released before any
    /// character is inspected.
    pub async fn occupants(&self, room: &Room, except: Option<CharacterId>) -> Vec<Arc<Character>> {
        let mut present = Vec::new();
        for id in room.contents().await {
            if let Ok(Entity::Character(character)) = self.registry.get(id).await {
                if Some(character.id()) == except {
                    continue;
                }
                if character.is_online().await {
                    present.push(character);
                }
            }
        }
        present
    }

    pub async fn mobs_in(&self, room: &Room) -> Vec<Arc<MobInstance>> {
        let mut mobs = Vec::new();
        for id in room.contents().await {
            if let Ok(Entity::MobInstance(mob)) = self.registry.get(id).await {
                mobs.push(mob);
            }
        }
        mobs
    }

    pub async fn items_in(&self, room: &Room) -> Vec<Arc<ItemInstance>> {
        let mut items = Vec::new();
        for id in room.contents().await {
            if let Ok(Entity::ItemInstance(item)) = self.registry.get(id).await {
                items.push(item);
            }
        }
        items
    }

    /// Sends `text` to every occupant except `except`.
    pub async fn notify_room(&self, room: &Room, except: Option<CharacterId>, text: &str) {
        for occupant in self.occupants(room, except).await {
            let _ = occupant.notify(ServerMessage::text(text)).await;
        }
    }

    // =========================================================================
    // Characters
    // =========================================================================

    pub async fn add_character(&self, character: Arc<Character>) -> Result<(), DomainError> {
        if self.character_by_name(character.name()).await.is_some() {
            return Err(DomainError::duplicate(character.name()));
        }
        self.registry
            .register(Entity::Character(Arc::clone(&character)))
            .await;
        self.characters.write().await.push(character);
        Ok(())
    }

    pub async fn characters(&self) -> Vec<Arc<Character>> {
        self.characters.read().await.clone()
    }

    pub async fn character_by_name(&self, name: &str) -> Option<Arc<Character>> {
        self.characters
            .read()
            .await
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    // =========================================================================
    // Templates
    // =========================================================================

    pub async fn add_item(&self, item: Arc<Item>) -> Result<(), DomainError> {
        self.items.add(item).await
    }

    pub async fn items(&self) -> Vec<Arc<Item>> {
        self.items.all().await
    }

    pub async fn item_by_name(&self, name: &str) -> Option<Arc<Item>> {
        self.items.by_name(name).await
    }

    pub async fn add_mob(&self, mob: Arc<Mob>) -> Result<(), DomainError> {
        self.mobs.add(mob).await
    }

    pub async fn mobs(&self) -> Vec<Arc<Mob>> {
        self.mobs.all().await
    }

    pub async fn mob_by_name(&self, name: &str) -> Option<Arc<Mob>> {
        self.mobs.by_name(name).await
    }

    /// Deletes an item or mob instance by id through its template.
    pub async fn delete_instance(&self, id: Uuid) -> Result<(), DomainError> {
        match self.registry.get(id).await {
            Ok(Entity::ItemInstance(instance)) => match instance.template() {
                Some(template) => template.delete_instance(&self.registry, instance.id()).await,
                None => {
                    self.registry.unregister(id).await;
                    Ok(())
                }
            },
            Ok(Entity::MobInstance(instance)) => match instance.template() {
                Some(template) => template.delete_instance(&self.registry, instance.id()).await,
                None => {
                    self.registry.unregister(id).await;
                    Ok(())
                }
            },
            Ok(other) => Err(DomainError::constraint(format!(
                "{} {} is not an instance",
                other.kind(),
                id
            ))),
            Err(_) => Err(DomainError::not_found("instance", id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::Session;
    use crate::test_support::{character_at, world_with_rooms};
    use mudhall_domain::{AttributeMap, Coords, RoomId};

    #[tokio::test]
    async fn implicit_neighbour_follows_coordinates() {
        let (world, area) = world_with_rooms(&[Coords::new(0, 0, 0), Coords::new(0, 1, 0)]).await;
        let origin = area.room_at(Coords::new(0, 0, 0)).await.expect("origin");

        assert!(matches!(world.connected_room(&origin, Direction::North).await, Exit::Open(r) if r.coords() == Coords::new(0, 1, 0)));
        assert!(matches!(world.connected_room(&origin, Direction::South).await, Exit::None));
        assert_eq!(world.exits(&origin).await, vec![Direction::North]);
    }

    #[tokio::test]
    async fn only_vacant_rooms_are_removed() {
        let (world, area) = world_with_rooms(&[Coords::new(0, 0, 0), Coords::new(1, 0, 0)]).await;
        let home = area.room_at(Coords::new(0, 0, 0)).await.expect("home");
        let spare = area.room_at(Coords::new(1, 0, 0)).await.expect("spare");
        character_at(&world, "Bob", home.location()).await;
        spare.add_object(Uuid::new_v4()).await.expect("space");

        assert_eq!(world.remove_vacant_room(&area, &home).await, RoomRemoval::HomeOf("Bob".into()));
        assert_eq!(world.remove_vacant_room(&area, &spare).await, RoomRemoval::NotEmpty);

        let id = spare.contents().await[0];
        spare.remove_object(id).await;
        assert_eq!(world.remove_vacant_room(&area, &spare).await, RoomRemoval::Removed);
        assert_eq!(world.remove_vacant_room(&area, &spare).await, RoomRemoval::NotFound);
        assert!(area.room_at(Coords::new(1, 0, 0)).await.is_none());
        assert!(world.registry().get(spare.id().to_uuid()).await.is_err());
        assert!(spare.lock().await.removed);
    }

    #[tokio::test]
    async fn exit_attribute_overrides_neighbour() {
        let (world, area) = world_with_rooms(&[Coords::new(0, 0, 0), Coords::new(5, 5, 0)]).await;
        let origin = area.room_at(Coords::new(0, 0, 0)).await.expect("origin");

        origin.set_attribute("east", "5,5,0").await.expect("set");
        origin.set_attribute("west", "!The wall is solid.").await.expect("set");
        origin.set_attribute("up", "nonsense").await.expect("set");

        assert!(matches!(world.connected_room(&origin, Direction::East).await, Exit::Open(r) if r.coords() == Coords::new(5, 5, 0)));
        assert!(matches!(
            world.connected_room(&origin, Direction::West).await,
            Exit::Blocked(Some(m)) if m == "The wall is solid."
        ));
        assert!(matches!(world.connected_room(&origin, Direction::Up).await, Exit::None));
    }

    #[tokio::test]
    async fn remote_exit_resolves_by_area_name() {
        let (world, area) = world_with_rooms(&[Coords::new(0, 0, 0)]).await;
        let forest = Arc::new(Area::new(AreaId::new(), "Dark Forest"));
        let clearing = Arc::new(Room::new(RoomId::new(), forest.id(), Coords::new(3, 3, 0)));
        forest.add_room(clearing.clone()).await.expect("room");
        world.add_area(forest).await.expect("area");

        let origin = area.room_at(Coords::new(0, 0, 0)).await.expect("origin");
        origin.set_attribute("north", "dark forest,3,3,0").await.expect("set");

        assert!(matches!(world.connected_room(&origin, Direction::North).await, Exit::Open(r) if r.id() == clearing.id()));
    }

    #[tokio::test]
    async fn occupants_are_online_characters_only() {
        let (world, area) = world_with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = area.room_at(Coords::new(0, 0, 0)).await.expect("room");
        let alice = character_at(&world, "Alice", room.location()).await;
        let bob = character_at(&world, "Bob", room.location()).await;
        let carol = character_at(&world, "Carol", room.location()).await;
        for c in [&alice, &bob, &carol] {
            room.add_object(c.id().to_uuid()).await.expect("place");
        }
        let (s1, _rx1) = Session::new(4);
        let (s2, _rx2) = Session::new(4);
        alice.attach_session(s1).await;
        bob.attach_session(s2).await;

        let names: Vec<String> = world
            .occupants(&room, Some(alice.id()))
            .await
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        assert_eq!(names, vec!["Bob".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_template_names_are_rejected() {
        let world = World::new(Arc::new(Registry::new()));
        world.add_item(Item::new("Sword", AttributeMap::new())).await.expect("add");

        assert!(world.add_item(Item::new("sword", AttributeMap::new())).await.is_err());
        assert!(world.item_by_name("SWORD").await.is_some());
    }

    #[tokio::test]
    async fn delete_instance_goes_through_template() {
        let world = World::new(Arc::new(Registry::new()));
        let goblin = Mob::new("goblin", AttributeMap::new());
        world.add_mob(goblin.clone()).await.expect("add");
        let instance = goblin.create_instance(world.registry()).await;

        world.delete_instance(instance.id().to_uuid()).await.expect("delete");

        assert!(goblin.instances().await.is_empty());
        assert!(world.delete_instance(instance.id().to_uuid()).await.is_err());
    }
}
