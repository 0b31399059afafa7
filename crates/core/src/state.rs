//! Session state - everything the client knows about the current game
//!
//! A `SessionState` is created empty when a session starts, mutated message by message by the
//! session machine that owns it, and dropped when the session ends. Nothing here is global, so
//! independent sessions (and tests) never see each other's state.

use std::time::Instant;

use thiserror::Error;

use crate::board::{Board, Totals};
use crate::types::{CellReport, Coordinate, Dimensions, Faction};

/// Failure to work out which faction we control from the home coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FactionError {
    #[error("no home coordinate was recorded before the first board report")]
    HomeNotRecorded,
    #[error("faction already resolved as {0}")]
    AlreadyResolved(Faction),
    #[error("home {0} is absent from the board report")]
    HomeMissing(Coordinate),
    #[error("home {0} holds no vampires or werewolves")]
    HomeUnoccupied(Coordinate),
}

/// Mutable per-session aggregate
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    dimensions: Option<Dimensions>,
    board: Board,
    faction: Option<Faction>,
    /// Held only between `HME` and the first board report
    home: Option<Coordinate>,
    turn: u32,
    totals: Totals,
    turn_started_at: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn faction(&self) -> Option<Faction> {
        self.faction
    }

    pub fn home(&self) -> Option<Coordinate> {
        self.home
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// When the latest turn update was applied
    pub fn turn_started_at(&self) -> Option<Instant> {
        self.turn_started_at
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = Some(dimensions);
    }

    pub fn record_home(&mut self, home: Coordinate) {
        self.home = Some(home);
    }

    /// Replace the board wholesale with `reports` and refresh the cached totals.
    pub fn apply_snapshot(&mut self, reports: &[CellReport]) {
        self.board = Board::from_reports(reports);
        self.refresh_totals();
    }

    /// Apply a turn-update report and advance the turn counter.
    ///
    /// An empty report leaves the board untouched. Returns whether the board was replaced.
    pub fn apply_turn_update(&mut self, reports: &[CellReport]) -> bool {
        let replaced = !reports.is_empty();
        if replaced {
            self.apply_snapshot(reports);
        }
        self.turn += 1;
        self.turn_started_at = Some(Instant::now());
        replaced
    }

    /// Decide our faction from the recorded home coordinate.
    ///
    /// Must run once, right after the first board report. The home coordinate is consumed
    /// whether or not resolution succeeds.
    pub fn resolve_faction(&mut self) -> Result<Faction, FactionError> {
        if let Some(faction) = self.faction {
            return Err(FactionError::AlreadyResolved(faction));
        }
        let home = self.home.take().ok_or(FactionError::HomeNotRecorded)?;
        if !self.board.contains(home) {
            return Err(FactionError::HomeMissing(home));
        }

        let cell = self.board.get(home);
        let faction = if cell.vampires > 0 {
            Faction::Vampires
        } else if cell.werewolves > 0 {
            Faction::Werewolves
        } else {
            return Err(FactionError::HomeUnoccupied(home));
        };

        self.faction = Some(faction);
        self.refresh_totals();
        Ok(faction)
    }

    /// First board report of a game: replace the board, resolve the faction, start at turn 0.
    pub fn apply_initial_board(&mut self, reports: &[CellReport]) -> Result<Faction, FactionError> {
        self.apply_snapshot(reports);
        let faction = self.resolve_faction()?;
        self.turn = 0;
        self.turn_started_at = None;
        Ok(faction)
    }

    /// Forget everything about the finished game.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn refresh_totals(&mut self) {
        self.totals = self.board.totals(self.faction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn report(x: u8, y: u8, h: u8, v: u8, w: u8) -> CellReport {
        CellReport::new(Coordinate::new(x, y), Cell::new(h, v, w))
    }

    fn started(home: (u8, u8), board: &[CellReport]) -> SessionState {
        let mut state = SessionState::new();
        state.set_dimensions(Dimensions::new(5, 5));
        state.record_home(Coordinate::new(home.0, home.1));
        state.apply_initial_board(board).unwrap();
        state
    }

    #[test]
    fn test_new_state_is_blank() {
        let state = SessionState::new();
        assert_eq!(state.dimensions(), None);
        assert_eq!(state.faction(), None);
        assert_eq!(state.turn(), 0);
        assert_eq!(state.totals(), Totals::default());
        assert!(state.board().is_empty());
    }

    #[test]
    fn test_resolve_vampires_from_home() {
        let state = started((1, 1), &[report(1, 1, 0, 3, 0), report(3, 3, 0, 0, 3)]);
        assert_eq!(state.faction(), Some(Faction::Vampires));
        assert_eq!(state.home(), None);
        assert_eq!(state.totals().ours, 3);
        assert_eq!(state.totals().enemy, 3);
    }

    #[test]
    fn test_resolve_twice_is_rejected() {
        let mut state = started((1, 1), &[report(1, 1, 0, 3, 0)]);
        state.record_home(Coordinate::new(1, 1));
        assert_eq!(
            state.resolve_faction(),
            Err(FactionError::AlreadyResolved(Faction::Vampires))
        );
        assert_eq!(state.faction(), Some(Faction::Vampires));
    }

    #[test]
    fn test_resolve_without_home() {
        let mut state = SessionState::new();
        state.apply_snapshot(&[report(0, 0, 0, 1, 0)]);
        assert_eq!(state.resolve_faction(), Err(FactionError::HomeNotRecorded));
    }

    #[test]
    fn test_resolve_home_missing_or_unoccupied() {
        let mut state = SessionState::new();
        state.record_home(Coordinate::new(2, 2));
        let err = state.apply_initial_board(&[report(0, 0, 0, 1, 0)]).unwrap_err();
        assert_eq!(err, FactionError::HomeMissing(Coordinate::new(2, 2)));

        let mut state = SessionState::new();
        state.record_home(Coordinate::new(0, 0));
        let err = state.apply_initial_board(&[report(0, 0, 4, 0, 0)]).unwrap_err();
        assert_eq!(err, FactionError::HomeUnoccupied(Coordinate::new(0, 0)));
        assert_eq!(state.faction(), None);
    }

    #[test]
    fn test_turn_update_replaces_board() {
        let mut state = started((0, 0), &[report(0, 0, 0, 5, 0), report(4, 4, 2, 0, 0)]);
        assert!(state.apply_turn_update(&[report(1, 1, 0, 5, 0)]));
        assert!(!state.board().contains(Coordinate::new(0, 0)));
        assert!(!state.board().contains(Coordinate::new(4, 4)));
        assert_eq!(state.totals().humans, 0);
        assert_eq!(state.turn(), 1);
        assert!(state.turn_started_at().is_some());
    }

    #[test]
    fn test_empty_turn_update_keeps_board() {
        let mut state = started((0, 0), &[report(0, 0, 0, 5, 0)]);
        let before = state.board().clone();
        assert!(!state.apply_turn_update(&[]));
        assert_eq!(state.board(), &before);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.totals().ours, 5);
    }

    #[test]
    fn test_reset_returns_to_blank() {
        let mut state = started((0, 0), &[report(0, 0, 0, 5, 0)]);
        state.apply_turn_update(&[]);
        state.reset();
        assert_eq!(state.faction(), None);
        assert_eq!(state.turn(), 0);
        assert_eq!(state.dimensions(), None);
        assert!(state.board().is_empty());
    }
}
