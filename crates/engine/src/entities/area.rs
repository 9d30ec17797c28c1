//! Areas: named maps owning their rooms.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockMappedWriteGuard, RwLockWriteGuard};

use mudhall_domain::{AreaId, AttributeMap, Coords, DomainError};

use super::Room;

struct AreaState {
    name: String,
    attributes: AttributeMap,
    rooms: Vec<Arc<Room>>,
}

pub struct Area {
    id: AreaId,
    state: RwLock<AreaState>,
}

impl Area {
    pub fn new(id: AreaId, name: impl Into<String>) -> Self {
        Self::restore(id, name, AttributeMap::new())
    }

    pub fn restore(id: AreaId, name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            id,
            state: RwLock::new(AreaState {
                name: name.into(),
                attributes,
                rooms: Vec::new(),
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> AreaId {
        self.id
    }

    pub async fn name(&self) -> String {
        self.state.read().await.name.clone()
    }

    pub async fn attributes(&self) -> AttributeMap {
        self.state.read().await.attributes.clone()
    }

    pub async fn room_at(&self, coords: Coords) -> Option<Arc<Room>> {
        self.state
            .read()
            .await
            .rooms
            .iter()
            .find(|r| r.coords() == coords)
            .cloned()
    }

    /// Adds a room; rooms are unique per full coordinates within an area.
    pub async fn add_room(&self, room: Arc<Room>) -> Result<(), DomainError> {
        if room.area_id() != self.id {
            return Err(DomainError::constraint(format!(
                "Room {} belongs to area {}, not {}",
                room.id(),
                room.area_id(),
                self.id
            )));
        }
        let mut state = self.state.write().await;
        if state.rooms.iter().any(|r| r.coords() == room.coords()) {
            return Err(DomainError::constraint(format!(
                "A room already exists at {} in {}",
                room.coords(),
                state.name
            )));
        }
        state.rooms.push(room);
        Ok(())
    }

    /// Exclusive access to the room list, held while a room's own state is
    /// checked before removing it.
    pub async fn rooms_mut(&self) -> RwLockMappedWriteGuard<'_, Vec<Arc<Room>>> {
        RwLockWriteGuard::map(self.state.write().await, |state| &mut state.rooms)
    }

    /// Rooms in insertion order.
    pub async fn rooms(&self) -> Vec<Arc<Room>> {
        self.state.read().await.rooms.clone()
    }
}
