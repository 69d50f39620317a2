//! Cardinal directions and port-constraint masks

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::style::StyleError;

/// A single cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The constraint mask bit for this direction
    pub fn mask(self) -> DirectionSet {
        match self {
            Direction::West => DirectionSet::WEST,
            Direction::North => DirectionSet::NORTH,
            Direction::South => DirectionSet::SOUTH,
            Direction::East => DirectionSet::EAST,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Direction::North),
            "east" => Ok(Direction::East),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            _ => Err(StyleError::UnknownDirection(s.to_string())),
        }
    }
}

/// A set of allowed connection directions for a terminal port.
///
/// The bit layout (west 1, north 2, south 4, east 8) is load-bearing: the
/// orthogonal router folds masks into table indices and packs four of them
/// into a 32-bit preference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DirectionSet(pub u32);

impl DirectionSet {
    pub const NONE: DirectionSet = DirectionSet(0);
    pub const WEST: DirectionSet = DirectionSet(1);
    pub const NORTH: DirectionSet = DirectionSet(2);
    pub const SOUTH: DirectionSet = DirectionSet(4);
    pub const EAST: DirectionSet = DirectionSet(8);
    pub const ALL: DirectionSet = DirectionSet(15);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: DirectionSet) -> bool {
        self.0 & other.0 != 0
    }

    /// True when exactly one direction is allowed
    pub fn is_single(self) -> bool {
        matches!(self.0, 1 | 2 | 4 | 8)
    }

    /// The single direction, if this set holds exactly one
    pub fn single(self) -> Option<Direction> {
        match self {
            DirectionSet::WEST => Some(Direction::West),
            DirectionSet::NORTH => Some(Direction::North),
            DirectionSet::SOUTH => Some(Direction::South),
            DirectionSet::EAST => Some(Direction::East),
            _ => None,
        }
    }

    /// Swap west with east and north with south
    pub fn reversed(self) -> DirectionSet {
        let mut out = 0;

        if self.contains(DirectionSet::WEST) {
            out |= DirectionSet::EAST.0;
        }
        if self.contains(DirectionSet::EAST) {
            out |= DirectionSet::WEST.0;
        }
        if self.contains(DirectionSet::NORTH) {
            out |= DirectionSet::SOUTH.0;
        }
        if self.contains(DirectionSet::SOUTH) {
            out |= DirectionSet::NORTH.0;
        }

        DirectionSet(out)
    }

}

impl Default for DirectionSet {
    fn default() -> Self {
        DirectionSet::ALL
    }
}

impl TryFrom<String> for DirectionSet {
    type Error = StyleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "none" => Ok(DirectionSet::NONE),
            "all" => Ok(DirectionSet::ALL),
            _ => {
                // Concatenated direction names, e.g. "eastwest" or "north"
                let mut out = DirectionSet::NONE;
                let mut rest = s.as_str();
                while !rest.is_empty() {
                    let (name, tail) = ["north", "east", "south", "west"]
                        .iter()
                        .find_map(|n| rest.strip_prefix(n).map(|t| (*n, t)))
                        .ok_or_else(|| StyleError::UnknownDirection(s.clone()))?;
                    out = DirectionSet(out.0 | Direction::from_str(name)?.mask().0);
                    rest = tail;
                }
                Ok(out)
            }
        }
    }
}

impl From<DirectionSet> for String {
    fn from(set: DirectionSet) -> String {
        match set {
            DirectionSet::NONE => "none".to_string(),
            DirectionSet::ALL => "all".to_string(),
            _ => {
                let mut s = String::new();
                for (dir, name) in [
                    (DirectionSet::NORTH, "north"),
                    (DirectionSet::EAST, "east"),
                    (DirectionSet::SOUTH, "south"),
                    (DirectionSet::WEST, "west"),
                ] {
                    if set.contains(dir) {
                        s.push_str(name);
                    }
                }
                s
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_swaps_opposites() {
        assert_eq!(DirectionSet::WEST.reversed(), DirectionSet::EAST);
        assert_eq!(DirectionSet::NORTH.reversed(), DirectionSet::SOUTH);
        assert_eq!(DirectionSet::ALL.reversed(), DirectionSet::ALL);
        assert_eq!(
            DirectionSet(DirectionSet::WEST.0 | DirectionSet::NORTH.0).reversed(),
            DirectionSet(DirectionSet::EAST.0 | DirectionSet::SOUTH.0)
        );
    }

    #[test]
    fn test_single_direction() {
        assert_eq!(DirectionSet::WEST.single(), Some(Direction::West));
        assert_eq!(DirectionSet::ALL.single(), None);
        assert!(DirectionSet::SOUTH.is_single());
        assert!(!DirectionSet::NONE.is_single());
    }

    #[test]
    fn test_parse_concatenated_names() {
        let set = DirectionSet::try_from("eastwest".to_string()).unwrap();
        assert!(set.contains(DirectionSet::EAST));
        assert!(set.contains(DirectionSet::WEST));
        assert!(!set.contains(DirectionSet::NORTH));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DirectionSet::try_from("upwards".to_string()).is_err());
    }

    #[test]
    fn test_roundtrip_strings() {
        for s in ["none", "all", "north", "eastwest"] {
            let set = DirectionSet::try_from(s.to_string()).unwrap();
            assert_eq!(String::from(set), s);
        }
    }
}
