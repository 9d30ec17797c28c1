use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::AreaId;
use crate::value_objects::Coords;

/// Serializable pointer to a room: the owning area plus the room's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub area_id: AreaId,
    pub coords: Coords,
}

impl Location {
    pub fn new(area_id: AreaId, coords: Coords) -> Self {
        Self { area_id, coords }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.area_id, self.coords)
    }
}
