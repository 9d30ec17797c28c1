//! Value objects for the spatial model.

mod coords;
mod direction;
mod exit;
mod location;

pub use coords::Coords;
pub use direction::Direction;
pub use exit::ExitTarget;
pub use location::Location;
