//! Picking items up and putting them down.

use std::sync::Arc;

use uuid::Uuid;

use crate::entities::{Character, ContainerOwner, World};
use crate::use_cases::room_events::RoomEvents;

use super::MoveError;

/// Room floor to inventory.
pub struct TakeItem {
    world: Arc<World>,
    events: Arc<RoomEvents>,
}

impl TakeItem {
    pub fn new(world: Arc<World>, events: Arc<RoomEvents>) -> Self {
        Self { world, events }
    }

    pub async fn execute(&self, character: &Character, item: Uuid) -> Result<(), MoveError> {
        let room = self
            .world
            .room_for(character.location().await)
            .await
            .ok_or(MoveError::NoCurrentRoom)?;

        {
            let mut floor = room.lock().await;
            let mut holder = character.lock().await;
            if !floor.here.contains(item) {
                return Err(MoveError::NotInSource(item));
            }
            holder.inventory.add(item)?;
            floor.here.remove(item);
            self.world
                .registry()
                .set_container(item, ContainerOwner::Character(character.id()))
                .await;
        }

        self.events.refresh(&room).await;
        Ok(())
    }
}

/// Inventory to room floor.
pub struct DropItem {
    world: Arc<World>,
    events: Arc<RoomEvents>,
}

impl DropItem {
    pub fn new(world: Arc<World>, events: Arc<RoomEvents>) -> Self {
        Self { world, events }
    }

    pub async fn execute(&self, character: &Character, item: Uuid) -> Result<(), MoveError> {
        let room = self
            .world
            .room_for(character.location().await)
            .await
            .ok_or(MoveError::NoCurrentRoom)?;

        {
            let mut floor = room.lock().await;
            let mut holder = character.lock().await;
            if !holder.inventory.contains(item) {
                return Err(MoveError::NotInSource(item));
            }
            floor.here.add(item)?;
            holder.inventory.remove(item);
            self.world
                .registry()
                .set_container(item, ContainerOwner::Room(room.id()))
                .await;
        }

        self.events.refresh(&room).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Item, INVENTORY_SIZE};
    use crate::test_support::{online_character, TestWorld};
    use mudhall_domain::{AttributeMap, Coords, DomainError};

    #[tokio::test]
    async fn take_then_drop_keeps_item_in_one_container() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, _rx) = online_character(&t, "Bob", &room).await;
        let sword = Item::new("sword", AttributeMap::new());
        let instance = t.spawn_item(&sword, &room).await;
        let id = instance.id().to_uuid();

        t.take().execute(&bob, id).await.expect("take");
        assert!(!room.contains(id).await);
        assert!(bob.inventory().await.contains(id));
        assert_eq!(
            t.world.registry().container_of(id).await,
            Some(ContainerOwner::Character(bob.id()))
        );

        t.drop_item().execute(&bob, id).await.expect("drop");
        assert!(room.contains(id).await);
        assert!(!bob.inventory().await.contains(id));
        assert_eq!(
            t.world.registry().container_of(id).await,
            Some(ContainerOwner::Room(room.id()))
        );
    }

    #[tokio::test]
    async fn full_inventory_leaves_item_on_the_floor() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, _rx) = online_character(&t, "Bob", &room).await;
        {
            let mut state = bob.lock().await;
            for _ in 0..INVENTORY_SIZE {
                state.inventory.add(Uuid::new_v4()).expect("space");
            }
        }
        let sword = Item::new("sword", AttributeMap::new());
        let id = t.spawn_item(&sword, &room).await.id().to_uuid();

        let result = t.take().execute(&bob, id).await;

        assert!(matches!(
            result,
            Err(MoveError::Domain(DomainError::ContainerFull { .. }))
        ));
        assert!(room.contains(id).await);
        assert!(!bob.inventory().await.contains(id));
    }

    #[tokio::test]
    async fn dropping_an_unheld_item_fails() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, _rx) = online_character(&t, "Bob", &room).await;

        let result = t.drop_item().execute(&bob, Uuid::new_v4()).await;

        assert!(matches!(result, Err(MoveError::NotInSource(_))));
    }
}
