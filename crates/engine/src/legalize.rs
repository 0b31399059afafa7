//! Move legalization - clamp/drop policy applied before a `MOV` is sent
//!
//! Strategies may hand back moves the server would reject. Rather than let the session commit a
//! protocol violation, each move is checked in order against the current board:
//!
//! - zero counts, out-of-bounds cells and non-adjacent destinations are dropped
//! - a source with no units left is dropped
//! - a cell may not be both a source and a destination in the same turn
//! - counts above the units still available at the source are clamped
//! - the list is truncated to `MAX_MOVES`

use std::collections::{BTreeMap, BTreeSet};

use crate::strategy::GameView;
use crate::types::{Coordinate, Move, MAX_MOVES};

/// Why a move was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    ZeroCount,
    SourceOutOfBounds,
    DestinationOutOfBounds,
    NotAdjacent,
    NoUnitsAtSource,
    SourceAlreadyTarget,
    TargetAlreadySource,
    TooManyMoves,
}

impl MoveRejection {
    pub fn code(self) -> &'static str {
        match self {
            MoveRejection::ZeroCount | MoveRejection::NoUnitsAtSource => "no_units",
            MoveRejection::SourceOutOfBounds
            | MoveRejection::DestinationOutOfBounds
            | MoveRejection::NotAdjacent => "invalid_cell",
            MoveRejection::SourceAlreadyTarget | MoveRejection::TargetAlreadySource => {
                "source_target_conflict"
            }
            MoveRejection::TooManyMoves => "too_many_moves",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MoveRejection::ZeroCount => "move carries no units",
            MoveRejection::SourceOutOfBounds => "source lies outside the grid",
            MoveRejection::DestinationOutOfBounds => "destination lies outside the grid",
            MoveRejection::NotAdjacent => "destination is not one of the eight surrounding cells",
            MoveRejection::NoUnitsAtSource => "no units of ours left at source",
            MoveRejection::SourceAlreadyTarget => "source already receives units this turn",
            MoveRejection::TargetAlreadySource => "destination already sends units this turn",
            MoveRejection::TooManyMoves => "more moves than one command can carry",
        }
    }
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of [`legalize`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Legalized {
    /// Moves safe to send, in the order the strategy produced them
    pub moves: Vec<Move>,
    /// Moves removed, with the reason
    pub dropped: Vec<(Move, MoveRejection)>,
    /// How many kept moves had their count reduced
    pub clamped: usize,
}

impl Legalized {
    /// True if every requested move went out unchanged
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.clamped == 0
    }
}

/// Apply the clamp/drop policy to `requested` against the board in `view`.
pub fn legalize(view: &GameView<'_>, requested: &[Move]) -> Legalized {
    let mut out = Legalized::default();
    let mut available: BTreeMap<Coordinate, u8> = view.our_groups().collect();
    let mut sources: BTreeSet<Coordinate> = BTreeSet::new();
    let mut targets: BTreeSet<Coordinate> = BTreeSet::new();

    for &mv in requested {
        if let Err(reason) = check(view, &available, &sources, &targets, mv, out.moves.len()) {
            out.dropped.push((mv, reason));
            continue;
        }

        let left = available.entry(mv.source).or_insert(0);
        let count = mv.count.min(*left);
        if count < mv.count {
            out.clamped += 1;
        }
        *left -= count;

        sources.insert(mv.source);
        targets.insert(mv.destination);
        out.moves.push(Move::new(mv.source, count, mv.destination));
    }

    out
}

fn check(
    view: &GameView<'_>,
    available: &BTreeMap<Coordinate, u8>,
    sources: &BTreeSet<Coordinate>,
    targets: &BTreeSet<Coordinate>,
    mv: Move,
    kept: usize,
) -> Result<(), MoveRejection> {
    if kept >= MAX_MOVES {
        return Err(MoveRejection::TooManyMoves);
    }
    if mv.count == 0 {
        return Err(MoveRejection::ZeroCount);
    }
    if !view.dimensions.contains(mv.source) {
        return Err(MoveRejection::SourceOutOfBounds);
    }
    if !view.dimensions.contains(mv.destination) {
        return Err(MoveRejection::DestinationOutOfBounds);
    }
    if !mv.source.is_adjacent(mv.destination) {
        return Err(MoveRejection::NotAdjacent);
    }
    if targets.contains(&mv.source) {
        return Err(MoveRejection::SourceAlreadyTarget);
    }
    if sources.contains(&mv.destination) {
        return Err(MoveRejection::TargetAlreadySource);
    }
    if available.get(&mv.source).copied().unwrap_or(0) == 0 {
        return Err(MoveRejection::NoUnitsAtSource);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionState;
    use crate::types::{Cell, CellReport, Dimensions};

    fn c(x: u8, y: u8) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn mv(sx: u8, sy: u8, n: u8, dx: u8, dy: u8) -> Move {
        Move::new(c(sx, sy), n, c(dx, dy))
    }

    /// 5x5 grid, we are vampires with 6 at (1,1) and 3 at (3,3); wolves at (0,4).
    fn state() -> SessionState {
        let mut state = SessionState::new();
        state.set_dimensions(Dimensions::new(5, 5));
        state.record_home(c(1, 1));
        state
            .apply_initial_board(&[
                CellReport::new(c(1, 1), Cell::new(0, 6, 0)),
                CellReport::new(c(3, 3), Cell::new(0, 3, 0)),
                CellReport::new(c(0, 4), Cell::new(0, 0, 4)),
            ])
            .unwrap();
        state
    }

    #[test]
    fn test_valid_moves_pass_through() {
        let state = state();
        let view = GameView::from_state(&state).unwrap();
        let requested = [mv(1, 1, 2, 2, 2), mv(1, 1, 4, 0, 0)];
        let out = legalize(&view, &requested);
        assert!(out.is_clean());
        assert_eq!(out.moves, requested.to_vec());
    }

    #[test]
    fn test_count_is_clamped_to_remaining_units() {
        let state = state();
        let view = GameView::from_state(&state).unwrap();
        let out = legalize(&view, &[mv(1, 1, 4, 2, 1), mv(1, 1, 9, 1, 2)]);
        assert_eq!(out.moves, vec![mv(1, 1, 4, 2, 1), mv(1, 1, 2, 1, 2)]);
        assert_eq!(out.clamped, 1);
        assert!(out.dropped.is_empty());
        assert!(!out.is_clean());
    }

    #[test]
    fn test_exhausted_source_is_dropped() {
        let state = state();
        let view = GameView::from_state(&state).unwrap();
        let out = legalize(&view, &[mv(1, 1, 6, 2, 1), mv(1, 1, 1, 1, 2)]);
        assert_eq!(out.moves.len(), 1);
        assert_eq!(out.dropped, vec![(mv(1, 1, 1, 1, 2), MoveRejection::NoUnitsAtSource)]);
    }

    #[test]
    fn test_geometry_rejections() {
        let state = state();
        let view = GameView::from_state(&state).unwrap();
        let out = legalize(
            &view,
            &[
                mv(1, 1, 0, 2, 2),
                mv(9, 1, 1, 8, 1),
                mv(3, 3, 1, 4, 5),
                mv(1, 1, 1, 3, 1),
                mv(1, 1, 1, 1, 1),
                mv(0, 4, 2, 0, 3),
            ],
        );
        assert!(out.moves.is_empty());
        let reasons: Vec<_> = out.dropped.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            reasons,
            vec![
                MoveRejection::ZeroCount,
                MoveRejection::SourceOutOfBounds,
                MoveRejection::DestinationOutOfBounds,
                MoveRejection::NotAdjacent,
                MoveRejection::NotAdjacent,
                MoveRejection::NoUnitsAtSource,
            ]
        );
    }

    #[test]
    fn test_cell_cannot_be_source_and_target() {
        let state = state();
        let view = GameView::from_state(&state).unwrap();
        let out = legalize(&view, &[mv(1, 1, 2, 2, 2), mv(3, 3, 1, 2, 2), mv(2, 2, 1, 3, 3)]);
        assert_eq!(out.moves, vec![mv(1, 1, 2, 2, 2), mv(3, 3, 1, 2, 2)]);
        assert_eq!(out.dropped[0].1, MoveRejection::SourceAlreadyTarget);

        // several sources may share one destination
        let out = legalize(&view, &[mv(3, 3, 1, 2, 2), mv(1, 1, 1, 2, 2), mv(1, 1, 1, 0, 1)]);
        assert_eq!(out.moves.len(), 3);

        let out = legalize(&view, &[mv(1, 1, 1, 2, 1), mv(2, 2, 1, 1, 1)]);
        assert_eq!(out.moves.len(), 1);
        assert_eq!(out.dropped[0].1, MoveRejection::TargetAlreadySource);
    }

    #[test]
    fn test_truncates_to_max_moves() {
        let mut state = SessionState::new();
        state.set_dimensions(Dimensions::new(2, 2));
        state.record_home(c(0, 0));
        state
            .apply_initial_board(&[CellReport::new(c(0, 0), Cell::new(0, 255, 0))])
            .unwrap();
        let view = GameView::from_state(&state).unwrap();

        let requested = vec![mv(0, 0, 1, 1, 1); 300];
        let out = legalize(&view, &requested);
        assert_eq!(out.moves.len(), 255);
        assert_eq!(out.dropped.len(), 45);
        assert!(out
            .dropped
            .iter()
            .all(|(_, r)| *r == MoveRejection::TooManyMoves));
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(MoveRejection::NotAdjacent.code(), "invalid_cell");
        assert_eq!(MoveRejection::TooManyMoves.code(), "too_many_moves");
        assert_eq!(
            MoveRejection::ZeroCount.to_string(),
            "move carries no units"
        );
    }
}
