//! Process-wide lookup from entity id to live entity.
//!
//! Lock order: the registry lock is always the innermost lock. Callers may hold
//! room or character locks while calling in, never the other way around.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use mudhall_domain::{CharacterId, RoomId};

use super::{Area, Character, ItemInstance, MobInstance, Room};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Area,
    Room,
    Character,
    ItemInstance,
    MobInstance,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Area => "area",
            Self::Room => "room",
            Self::Character => "character",
            Self::ItemInstance => "item instance",
            Self::MobInstance => "mob instance",
        };
        write!(f, "{name}")
    }
}

/// A registered entity reference. Cloning clones the `Arc`.
#[derive(Clone)]
pub enum Entity {
    Area(Arc<Area>),
    Room(Arc<Room>),
    Character(Arc<Character>),
    ItemInstance(Arc<ItemInstance>),
    MobInstance(Arc<MobInstance>),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Area(_) => EntityKind::Area,
            Self::Room(_) => EntityKind::Room,
            Self::Character(_) => EntityKind::Character,
            Self::ItemInstance(_) => EntityKind::ItemInstance,
            Self::MobInstance(_) => EntityKind::MobInstance,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Area(a) => a.id().to_uuid(),
            Self::Room(r) => r.id().to_uuid(),
            Self::Character(c) => c.id().to_uuid(),
            Self::ItemInstance(i) => i.id().to_uuid(),
            Self::MobInstance(m) => m.id().to_uuid(),
        }
    }
}

/// The object container currently holding an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerOwner {
    Room(RoomId),
    Character(CharacterId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No entity registered with id {0}")]
    NotFound(Uuid),
    #[error("Entity {id} is a {actual}, expected {expected}")]
    WrongKind {
        id: Uuid,
        expected: EntityKind,
        actual: EntityKind,
    },
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<Uuid, Entity>,
    containers: HashMap<Uuid, ContainerOwner>,
}

#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Registers `entity`, replacing any previous entry with the same id.
    pub async fn register(&self, entity: Entity) {
        let id = entity.id();
        self.inner.write().await.entries.insert(id, entity);
    }

    /// Removes the entry and its container association. Absent ids are a no-op.
    pub async fn unregister(&self, id: Uuid) {
        let mut state = self.inner.write().await;
        state.entries.remove(&id);
        state.containers.remove(&id);
    }

    pub async fn get(&self, id: Uuid) -> Result<Entity, RegistryError> {
        self.inner
            .read()
            .await
            .entries
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.read().await.entries.contains_key(&id)
    }

    /// Copy of every entry of `kind` taken under the lock.
    pub async fn all_of_kind(&self, kind: EntityKind) -> Vec<Entity> {
        self.inner
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    // =========================================================================
    // Typed lookups
    // =========================================================================

    pub async fn room(&self, id: RoomId) -> Result<Arc<Room>, RegistryError> {
        match self.get(id.to_uuid()).await? {
            Entity::Room(room) => Ok(room),
            other => Err(wrong_kind(id.to_uuid(), EntityKind::Room, &other)),
        }
    }

    pub async fn character(&self, id: CharacterId) -> Result<Arc<Character>, RegistryError> {
        match self.get(id.to_uuid()).await? {
            Entity::Character(character) => Ok(character),
            other => Err(wrong_kind(id.to_uuid(), EntityKind::Character, &other)),
        }
    }

    pub async fn item_instance(&self, id: Uuid) -> Result<Arc<ItemInstance>, RegistryError> {
        match self.get(id).await? {
            Entity::ItemInstance(instance) => Ok(instance),
            other => Err(wrong_kind(id, EntityKind::ItemInstance, &other)),
        }
    }

    pub async fn mob_instance(&self, id: Uuid) -> Result<Arc<MobInstance>, RegistryError> {
        match self.get(id).await? {
            Entity::MobInstance(instance) => Ok(instance),
            other => Err(wrong_kind(id, EntityKind::MobInstance, &other)),
        }
    }

    // =========================================================================
    // Container associations
    // =========================================================================

    pub async fn set_container(&self, id: Uuid, owner: ContainerOwner) {
        self.inner.write().await.containers.insert(id, owner);
    }

    pub async fn clear_container(&self, id: Uuid) {
        self.inner.write().await.containers.remove(&id);
    }

    pub async fn container_of(&self, id: Uuid) -> Option<ContainerOwner> {
        self.inner.read().await.containers.get(&id).copied()
    }
}

fn wrong_kind(id: Uuid, expected: EntityKind, actual: &Entity) -> RegistryError {
    RegistryError::WrongKind {
        id,
        expected,
        actual: actual.kind(),
    }
}
