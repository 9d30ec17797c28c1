//! Mudhall Domain - the pure data vocabulary of the world model.
//!
//! Nothing in this crate locks, awaits or performs I/O. The engine wraps these
//! types in its own synchronized runtime entities.

extern crate self as mudhall_domain;

pub mod attributes;
pub mod container;
pub mod error;
pub mod ids;
pub mod validate;
pub mod value_objects;

pub use attributes::{AttributeMap, ObjectKind};
pub use container::{ContainerEntry, ObjectContainer};
pub use error::DomainError;
pub use ids::{AreaId, CharacterId, ItemInstanceId, MobInstanceId, RoomId, SessionId};
pub use validate::ValidationResult;
pub use value_objects::{Coords, Direction, ExitTarget, Location};
