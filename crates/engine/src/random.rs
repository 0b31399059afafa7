//! Random strategy
//!
//! Baseline opponent: no lookahead, just a seeded pick of one group and one direction per turn.

use tracing::debug;

use crate::core::SimpleRng;
use crate::strategy::{GameView, Strategy, TurnBudget};
use crate::types::{Coordinate, Move};

/// Moves one randomly chosen group of ours, whole, onto a random neighbouring cell.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: SimpleRng,
}

impl RandomStrategy {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_clock() -> Self {
        Self {
            rng: SimpleRng::from_clock(),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&mut self, view: &GameView<'_>, _budget: &TurnBudget) -> Vec<Move> {
        let groups: Vec<(Coordinate, u8)> = view.our_groups().collect();
        let Some(&(source, count)) = self.rng.choose(&groups) else {
            debug!(turn = view.turn, "no groups left to move");
            return Vec::new();
        };

        let neighbours = view.neighbours(source);
        let Some(&destination) = self.rng.choose(&neighbours) else {
            debug!(turn = view.turn, %source, "group has no neighbouring cell");
            return Vec::new();
        };

        vec![Move::new(source, count, destination)]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::SessionState;
    use crate::types::{Cell, CellReport, Dimensions};

    fn state(dims: Dimensions, board: &[CellReport], home: Coordinate) -> SessionState {
        let mut state = SessionState::new();
        state.set_dimensions(dims);
        state.record_home(home);
        state.apply_initial_board(board).unwrap();
        state
    }

    fn budget() -> TurnBudget {
        TurnBudget::starting_now(Duration::from_secs(2))
    }

    #[test]
    fn test_moves_a_whole_group_to_an_adjacent_cell() {
        let home = Coordinate::new(2, 2);
        let s = state(
            Dimensions::new(5, 5),
            &[
                CellReport::new(home, Cell::new(0, 0, 6)),
                CellReport::new(Coordinate::new(0, 0), Cell::new(0, 5, 0)),
            ],
            home,
        );
        let view = GameView::from_state(&s).unwrap();
        let mut strategy = RandomStrategy::new(42);

        for _ in 0..50 {
            let moves = strategy.decide(&view, &budget());
            assert_eq!(moves.len(), 1);
            let mv = moves[0];
            assert_eq!(mv.source, home);
            assert_eq!(mv.count, 6);
            assert!(mv.source.is_adjacent(mv.destination));
            assert!(view.dimensions.contains(mv.destination));
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let home = Coordinate::new(1, 1);
        let s = state(
            Dimensions::new(4, 4),
            &[
                CellReport::new(home, Cell::new(0, 3, 0)),
                CellReport::new(Coordinate::new(3, 3), Cell::new(0, 2, 0)),
            ],
            home,
        );
        let view = GameView::from_state(&s).unwrap();
        let mut a = RandomStrategy::new(9);
        let mut b = RandomStrategy::new(9);
        for _ in 0..20 {
            assert_eq!(a.decide(&view, &budget()), b.decide(&view, &budget()));
        }
    }

    #[test]
    fn test_passes_on_a_single_cell_grid() {
        let home = Coordinate::new(0, 0);
        let s = state(
            Dimensions::new(1, 1),
            &[CellReport::new(home, Cell::new(0, 3, 0))],
            home,
        );
        let view = GameView::from_state(&s).unwrap();
        assert!(RandomStrategy::new(1).decide(&view, &budget()).is_empty());
    }
}
