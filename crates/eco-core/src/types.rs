//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an entity instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell coordinate in the world grid.
///
/// Coordinates are signed so displacements can be computed before the
/// bounds check; only in-bounds positions are ever stored on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Chebyshev (king-move) distance to another position
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// The 8 surrounding cells, row-major, without any bounds filtering
    pub fn surrounding(&self) -> impl Iterator<Item = Position> + '_ {
        (-1..=1)
            .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .map(move |(dr, dc)| self.offset(dr, dc))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Facing direction, numbered clockwise from up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Right, Facing::Down, Facing::Left];

    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Unit displacement as `(d_row, d_col)`
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Facing::Up => (-1, 0),
            Facing::Right => (0, 1),
            Facing::Down => (1, 0),
            Facing::Left => (0, -1),
        }
    }

    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Up and Down lie along the row axis
    pub fn is_vertical(self) -> bool {
        self.index() % 2 == 0
    }
}

/// Terrain classification of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Ground,
    Water,
}

impl TerrainKind {
    pub fn is_water(self) -> bool {
        self == TerrainKind::Water
    }
}

/// Whether an entity claims its cell exclusively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    Occupying,
    NonOccupying,
}

/// Whether an entity is confined to ground tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locomotion {
    Terrestrial,
    Other,
}

/// Capability pair attached to every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Traits {
    pub occupancy: Occupancy,
    pub locomotion: Locomotion,
}

impl Traits {
    pub const fn new(occupancy: Occupancy, locomotion: Locomotion) -> Self {
        Self {
            occupancy,
            locomotion,
        }
    }

    pub fn is_occupying(&self) -> bool {
        self.occupancy == Occupancy::Occupying
    }

    pub fn is_terrestrial(&self) -> bool {
        self.locomotion == Locomotion::Terrestrial
    }
}

/// Monotonic lifecycle marker: Youth, then Mature, then Dead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum GrowthStage {
    #[default]
    Youth,
    Mature,
    Dead,
}
