//! Shared builders for unit tests.

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;

use mudhall_domain::{AreaId, CharacterId, Coords, Location, RoomId};
use mudhall_shared::ServerMessage;

use crate::app::App;
use crate::entities::{Area, Character, ContainerOwner, Item, ItemInstance, Registry, Room, World};
use crate::infrastructure::behavior::NoopBehavior;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::password::hash_password;
use crate::infrastructure::storage::FileStorage;
use crate::stores::{Session, SessionManager};
use crate::use_cases::movement::{DropItem, MoveCharacter, TakeItem};
use crate::use_cases::session::{Login, Teardown};
use crate::use_cases::{RoomEvents, RoomSync, WipeOrphanedInstances};

pub const TEST_AREA: &str = "Proving Grounds";

async fn area_with_rooms(coords: &[Coords]) -> Arc<Area> {
    let area = Arc::new(Area::new(AreaId::new(), TEST_AREA));
    for c in coords {
        let room = Arc::new(Room::new(RoomId::new(), area.id(), *c));
        area.add_room(room).await.expect("distinct coordinates");
    }
    area
}

/// A bare world holding one area with a room at each of `coords`.
pub async fn world_with_rooms(coords: &[Coords]) -> (Arc<World>, Arc<Area>) {
    let world = Arc::new(World::new(Arc::new(Registry::new())));
    let area = area_with_rooms(coords).await;
    world.add_area(Arc::clone(&area)).await.expect("area");
    (world, area)
}

/// An offline character with no password, already known to `world`.
pub async fn character_at(world: &World, name: &str, location: Location) -> Arc<Character> {
    let character = Arc::new(Character::new(CharacterId::new(), name, "", location));
    world
        .add_character(Arc::clone(&character))
        .await
        .expect("unique name");
    character
}

pub fn character_with_password(name: &str, password: &str) -> Character {
    Character::new(
        CharacterId::new(),
        name,
        hash_password(password).expect("hash"),
        Location::new(AreaId::new(), Coords::new(0, 0, 0)),
    )
}

/// Every `showText` currently queued, in order. Other messages are skipped.
pub fn drain_texts(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<String> {
    let mut texts = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let ServerMessage::ShowText(text) = message {
            texts.push(text);
        }
    }
    texts
}

/// A character logged in through a registered session and standing in `room`.
pub async fn online_character(
    t: &TestWorld,
    name: &str,
    room: &Arc<Room>,
) -> (Arc<Character>, mpsc::Receiver<ServerMessage>) {
    let character = character_at(&t.world, name, room.location()).await;
    let (session, rx) = Session::new(64);
    assert!(session.attach_character(Arc::clone(&character)).await);
    assert!(character.attach_session(Arc::clone(&session)).await);
    t.sessions.register(session);

    let id = character.id().to_uuid();
    room.add_object(id).await.expect("room has space");
    t.world
        .registry()
        .set_container(id, ContainerOwner::Room(room.id()))
        .await;
    (character, rx)
}

/// A full application over a scratch data directory.
pub struct TestWorld {
    pub app: Arc<App>,
    pub world: Arc<World>,
    pub area: Arc<Area>,
    pub sessions: Arc<SessionManager>,
    pub events: Arc<RoomEvents>,
    pub sync: Arc<RoomSync>,
    _data: TempDir,
}

impl TestWorld {
    pub async fn with_rooms(coords: &[Coords]) -> Self {
        let data = tempfile::tempdir().expect("tempdir");
        let app = Arc::new(App::new(
            Arc::new(FileStorage::new(data.path())),
            Arc::new(NoopBehavior),
            Arc::new(SystemClock::new()),
        ));
        let area = area_with_rooms(coords).await;
        app.world.add_area(Arc::clone(&area)).await.expect("area");

        Self {
            world: Arc::clone(&app.world),
            sessions: Arc::clone(&app.sessions),
            events: Arc::clone(&app.events),
            sync: Arc::clone(&app.sync),
            area,
            app,
            _data: data,
        }
    }

    pub async fn room(&self, coords: Coords) -> Arc<Room> {
        self.area.room_at(coords).await.expect("room exists")
    }

    pub fn movement(&self) -> Arc<MoveCharacter> {
        Arc::clone(&self.app.use_cases.movement.move_character)
    }

    pub fn take(&self) -> Arc<TakeItem> {
        Arc::clone(&self.app.use_cases.movement.take_item)
    }

    pub fn drop_item(&self) -> Arc<DropItem> {
        Arc::clone(&self.app.use_cases.movement.drop_item)
    }

    pub fn login(&self) -> Arc<Login> {
        Arc::clone(&self.app.use_cases.session.login)
    }

    pub fn teardown(&self) -> Arc<Teardown> {
        Arc::clone(&self.app.use_cases.session.teardown)
    }

    pub fn sweeper(&self) -> Arc<WipeOrphanedInstances> {
        Arc::clone(&self.app.use_cases.maintenance)
    }

    /// Instantiates `item` on the floor of `room`, adding the template to
    /// the world first if needed.
    pub async fn spawn_item(&self, item: &Arc<Item>, room: &Arc<Room>) -> Arc<ItemInstance> {
        if self.world.item_by_name(item.name()).await.is_none() {
            self.world.add_item(Arc::clone(item)).await.expect("add item");
        }
        item.create_instance_in(self.world.registry(), room)
            .await
            .expect("room has space")
    }

    /// A character with a real password hash whose saved location is `room`.
    pub async fn offline_character(
        &self,
        name: &str,
        password: &str,
        room: &Arc<Room>,
    ) -> Arc<Character> {
        let character = Arc::new(Character::new(
            CharacterId::new(),
            name,
            hash_password(password).expect("hash"),
            room.location(),
        ));
        self.world
            .add_character(Arc::clone(&character))
            .await
            .expect("unique name");
        character
    }
}
