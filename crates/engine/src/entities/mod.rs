//! Runtime entities.
//!
//! Each entity carries its own lock. When more than one lock is needed they are
//! taken in this order: area, room (ascending id), character, template,
//! instance, registry.

pub mod area;
pub mod character;
pub mod registry;
pub mod room;
pub mod template;
pub mod world;

pub use area::Area;
pub use character::{Character, CharacterState, INVENTORY_SIZE};
pub use registry::{ContainerOwner, Entity, EntityKind, Registry, RegistryError};
pub use room::{Room, RoomState};
pub use template::{
    Instance, Item, ItemFamily, ItemInstance, Mob, MobFamily, MobInstance, Template,
    TemplateFamily, TemplateList,
};
pub use world::{Exit, RoomRemoval, World};
