//! Core types module - shared data structures and constants
//!
//! This module defines the value types used throughout the client. They are plain data with no
//! I/O, usable from the board model, the strategies and the wire codec alike.
//!
//! # Grid
//!
//! The server announces the grid size once per game (`SET rows cols`). Coordinates are `(x, y)`
//! with `0 <= x < cols` and `0 <= y < rows`. Every numeric field on the wire is a single unsigned
//! byte, so coordinates and unit counts are `u8`.
//!
//! # Wire and Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TAG_LEN` | 3 | Length of the ASCII command tag that starts every frame |
//! | `MAX_MOVES` | 255 | Largest move list a `MOV` command can carry |
//! | `MAX_NAME_LEN` | 255 | Largest identification token `NME` can carry |
//! | `DEFAULT_TURN_BUDGET_MS` | 1800 | Soft per-turn deadline for move selection |
//!
//! # Examples
//!
//! ```
//! use vvw_types::{Cell, Coordinate, Faction};
//!
//! let cell = Cell::new(0, 4, 0);
//! assert_eq!(cell.units(Faction::Vampires), 4);
//! assert_eq!(cell.units(Faction::Werewolves), 0);
//! assert_eq!(Faction::Vampires.opponent(), Faction::Werewolves);
//!
//! let a = Coordinate::new(2, 2);
//! assert!(a.is_adjacent(Coordinate::new(3, 1)));
//! assert!(!a.is_adjacent(Coordinate::new(4, 2)));
//! ```

use serde::{Deserialize, Serialize};

/// Length of the ASCII tag that opens every frame
pub const TAG_LEN: usize = 3;

/// Maximum number of moves in one `MOV` command (count is a single byte)
pub const MAX_MOVES: usize = u8::MAX as usize;

/// Maximum length of the identification token (length is a single byte)
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Default soft deadline for a strategy to answer a turn
pub const DEFAULT_TURN_BUDGET_MS: u64 = 1800;

/// Default identification token sent with `NME`
pub const DEFAULT_CLIENT_NAME: &str = "vvw-client";

/// One of the two competing species.
///
/// "Not yet known" is modelled as `Option<Faction>::None` by the owners of session state rather
/// than as a third variant, so a resolved faction can always be used to index a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Vampires,
    Werewolves,
}

impl Faction {
    /// The other faction
    pub fn opponent(self) -> Self {
        match self {
            Faction::Vampires => Faction::Werewolves,
            Faction::Werewolves => Faction::Vampires,
        }
    }

    /// Lowercase name, as used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Vampires => "vampires",
            Faction::Werewolves => "werewolves",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance (king-move distance) to `other`
    pub fn distance(self, other: Coordinate) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// True if `other` is one of the eight surrounding cells
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        self.distance(other) == 1
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid size announced by `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: u8,
    pub cols: u8,
}

impl Dimensions {
    pub const fn new(rows: u8, cols: u8) -> Self {
        Self { rows, cols }
    }

    /// True if `coord` lies on the grid
    pub fn contains(self, coord: Coordinate) -> bool {
        coord.x < self.cols && coord.y < self.rows
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Occupancy of one grid position.
///
/// A cell holding no units at all is never stored by the board; an absent cell reads as
/// [`Cell::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub humans: u8,
    pub vampires: u8,
    pub werewolves: u8,
}

impl Cell {
    pub const EMPTY: Cell = Cell::new(0, 0, 0);

    pub const fn new(humans: u8, vampires: u8, werewolves: u8) -> Self {
        Self {
            humans,
            vampires,
            werewolves,
        }
    }

    /// Units of `faction` in this cell
    pub fn units(&self, faction: Faction) -> u8 {
        match faction {
            Faction::Vampires => self.vampires,
            Faction::Werewolves => self.werewolves,
        }
    }

    /// Sum of all three populations
    pub fn population(&self) -> u32 {
        self.humans as u32 + self.vampires as u32 + self.werewolves as u32
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }
}

/// One `(x, y, humans, vampires, werewolves)` entry of a board report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellReport {
    pub at: Coordinate,
    pub cell: Cell,
}

impl CellReport {
    pub const fn new(at: Coordinate, cell: Cell) -> Self {
        Self { at, cell }
    }
}

/// A relocation of `count` of our units from `source` to `destination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: Coordinate,
    pub count: u8,
    pub destination: Coordinate,
}

impl Move {
    pub const fn new(source: Coordinate, count: u8, destination: Coordinate) -> Self {
        Self {
            source,
            count,
            destination,
        }
    }
}
