//! Rooms: addressable locations holding objects.

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use mudhall_domain::{
    AreaId, AttributeMap, Coords, DomainError, Location, ObjectContainer, ObjectKind, RoomId,
};

/// Mutable room state, guarded by the room's own lock.
#[derive(Debug, Clone, Default)]
pub struct RoomState {
    pub attributes: AttributeMap,
    pub here: ObjectContainer,
    /// Set once the room is taken out of its area; nothing may enter after.
    pub removed: bool,
}

/// A room's id, owning area and coordinates never change.
pub struct Room {
    id: RoomId,
    area_id: AreaId,
    coords: Coords,
    state: Mutex<RoomState>,
}

impl Room {
    pub fn new(id: RoomId, area_id: AreaId, coords: Coords) -> Self {
        Self::restore(id, area_id, coords, AttributeMap::new(), ObjectContainer::unbounded())
    }

    pub fn restore(
        id: RoomId,
        area_id: AreaId,
        coords: Coords,
        attributes: AttributeMap,
        here: ObjectContainer,
    ) -> Self {
        Self {
            id,
            area_id,
            coords,
            state: Mutex::new(RoomState {
                attributes,
                here,
                removed: false,
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn area_id(&self) -> AreaId {
        self.area_id
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn location(&self) -> Location {
        Location::new(self.area_id, self.coords)
    }

    /// Locks the room for a multi-step mutation.
    ///
    /// Locking two rooms at once must go through `use_cases::movement::lock_pair`.
    pub async fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> RoomState {
        self.state.lock().await.clone()
    }

    pub async fn attribute(&self, name: &str) -> String {
        self.state
            .lock()
            .await
            .attributes
            .resolve(ObjectKind::Room, name)
    }

    pub async fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomainError> {
        self.state
            .lock()
            .await
            .attributes
            .set(ObjectKind::Room, name, value)
    }

    /// Places `id` in the room; returns the slot used.
    pub async fn add_object(&self, id: Uuid) -> Result<u32, DomainError> {
        self.state.lock().await.here.add(id)
    }

    pub async fn remove_object(&self, id: Uuid) -> bool {
        self.state.lock().await.here.remove(id)
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.state.lock().await.here.contains(id)
    }

    /// Ids of contained objects, copied under the lock.
    pub async fn contents(&self) -> Vec<Uuid> {
        self.state.lock().await.here.ids().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudhall_domain::attributes::ATTR_TITLE;

    #[tokio::test]
    async fn add_and_remove_report_success() {
        let room = Room::new(RoomId::new(), AreaId::new(), Coords::new(0, 0, 0));
        let id = Uuid::new_v4();

        assert_eq!(room.add_object(id).await, Ok(0));
        assert!(room.contains(id).await);
        assert!(room.remove_object(id).await);
        assert!(!room.remove_object(id).await);
    }

    #[tokio::test]
    async fn bounded_room_rejects_overflow_unchanged() {
        let room = Room::restore(
            RoomId::new(),
            AreaId::new(),
            Coords::new(0, 0, 0),
            AttributeMap::new(),
            ObjectContainer::new(1),
        );
        let first = Uuid::new_v4();
        room.add_object(first).await.expect("room has space");

        let err = room.add_object(Uuid::new_v4()).await.expect_err("full");

        assert_eq!(err, DomainError::container_full(1, 1));
        assert_eq!(room.contents().await, vec![first]);
    }

    #[tokio::test]
    async fn attributes_fall_back_to_defaults() {
        let room = Room::new(RoomId::new(), AreaId::new(), Coords::new(0, 0, 0));
        assert_eq!(room.attribute(ATTR_TITLE).await, "Empty Room");

        room.set_attribute(ATTR_TITLE, "Town Square").await.expect("set");
        assert_eq!(room.attribute(ATTR_TITLE).await, "Town Square");

        assert!(room.set_attribute("smell", "musty").await.is_err());
    }
}
