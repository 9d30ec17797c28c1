//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod maintenance;
pub mod movement;
pub mod persistence;
pub mod room_events;
pub mod session;
pub mod sync;

pub use maintenance::WipeOrphanedInstances;
pub use movement::MovementUseCases;
pub use persistence::PersistenceUseCases;
pub use room_events::RoomEvents;
pub use session::SessionUseCases;
pub use sync::RoomSync;
