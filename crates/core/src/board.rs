//! Board module - sparse grid occupancy
//!
//! Only cells holding at least one unit are stored. Reads of an absent coordinate return
//! [`Cell::EMPTY`]. Storage is a `BTreeMap` so iteration order is stable across runs, which keeps
//! seeded strategies reproducible.

use std::collections::BTreeMap;

use crate::types::{Cell, CellReport, Coordinate, Faction};

/// Unit counts summed over the whole board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Units of our faction
    pub ours: u32,
    /// Units of the opposing faction
    pub enemy: u32,
    /// Neutral humans
    pub humans: u32,
}

/// Grid occupancy keyed by coordinate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: BTreeMap<Coordinate, Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Build a board from a server report, dropping entries with no units.
    ///
    /// If a coordinate is listed twice the later entry wins.
    pub fn from_reports(reports: &[CellReport]) -> Self {
        let mut board = Self::new();
        for report in reports {
            if report.cell.is_empty() {
                board.cells.remove(&report.at);
            } else {
                board.cells.insert(report.at, report.cell);
            }
        }
        board
    }

    /// Get cell at `at`; absent coordinates are empty
    pub fn get(&self, at: Coordinate) -> Cell {
        self.cells.get(&at).copied().unwrap_or(Cell::EMPTY)
    }

    /// Check if a coordinate holds any units
    pub fn contains(&self, at: Coordinate) -> bool {
        self.cells.contains_key(&at)
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, Cell)> + '_ {
        self.cells.iter().map(|(at, cell)| (*at, *cell))
    }

    /// Cells where `faction` has units, with the unit count
    pub fn groups(&self, faction: Faction) -> impl Iterator<Item = (Coordinate, u8)> + '_ {
        self.iter().filter_map(move |(at, cell)| {
            let units = cell.units(faction);
            (units > 0).then_some((at, units))
        })
    }

    /// Single pass over the board.
    ///
    /// With no faction known only `humans` is counted; `ours` and `enemy` stay at zero.
    pub fn totals(&self, faction: Option<Faction>) -> Totals {
        let mut totals = Totals::default();
        for cell in self.cells.values() {
            totals.humans += cell.humans as u32;
            if let Some(faction) = faction {
                totals.ours += cell.units(faction) as u32;
                totals.enemy += cell.units(faction.opponent()) as u32;
            }
        }
        totals
    }
}
