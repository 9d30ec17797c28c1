use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Position of a room within its area.
///
/// `i` disambiguates rooms stacked on identical x/y/z; it is zero for almost
/// every room and is not part of the textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default)]
    pub i: u32,
}

impl Coords {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z, i: 0 }
    }

    pub const fn with_index(x: i32, y: i32, z: i32, i: u32) -> Self {
        Self { x, y, z, i }
    }

    /// Coordinates shifted by `(dx, dy, dz)`, always on index 0.
    pub fn offset(&self, (dx, dy, dz): (i32, i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl FromStr for Coords {
    type Err = DomainError;

    /// Parses `x,y,z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(DomainError::parse(format!(
                "Coordinates must be x,y,z: {}",
                s
            )));
        };
        let axis = |v: &str| {
            v.parse::<i32>()
                .map_err(|_| DomainError::parse(format!("Not a coordinate: {}", v)))
        };
        Ok(Self::new(axis(x)?, axis(y)?, axis(z)?))
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_axes_on_index_zero() {
        let c: Coords = "3, -2,1".parse().expect("valid");
        assert_eq!(c, Coords::new(3, -2, 1));
        assert_eq!(c.i, 0);
        assert_eq!(c.to_string(), "3,-2,1");
    }

    #[test]
    fn rejects_wrong_arity_and_non_numbers() {
        assert!("1,2".parse::<Coords>().is_err());
        assert!("1,2,3,4".parse::<Coords>().is_err());
        assert!("a,2,3".parse::<Coords>().is_err());
    }

    #[test]
    fn index_distinguishes_stacked_rooms() {
        assert_ne!(Coords::with_index(0, 0, 0, 0), Coords::with_index(0, 0, 0, 1));
    }

    #[test]
    fn missing_index_deserializes_as_zero() {
        let c: Coords = serde_json::from_str(r#"{"x":1,"y":2,"z":3}"#).expect("valid");
        assert_eq!(c, Coords::new(1, 2, 3));
    }
}
