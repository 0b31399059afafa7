//! Strategy contract
//!
//! A strategy sees the board only through [`GameView`], which borrows the session state
//! immutably and is only ever built once our faction is known. It must answer within the
//! [`TurnBudget`]; an answer that arrives late is discarded by the session in favour of passing.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::core::{Board, SessionState, Totals};
use crate::types::{Coordinate, Dimensions, Faction, Move};

/// Read-only view of the board handed to a strategy
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub board: &'a Board,
    pub faction: Faction,
    pub dimensions: Dimensions,
    pub turn: u32,
    pub totals: Totals,
}

impl<'a> GameView<'a> {
    /// Borrow a view of `state`; `None` until dimensions and faction are both known.
    pub fn from_state(state: &'a SessionState) -> Option<Self> {
        Some(Self {
            board: state.board(),
            faction: state.faction()?,
            dimensions: state.dimensions()?,
            turn: state.turn(),
            totals: state.totals(),
        })
    }

    /// Our groups and their sizes
    pub fn our_groups(&self) -> impl Iterator<Item = (Coordinate, u8)> + 'a {
        let board: &'a Board = self.board;
        board.groups(self.faction)
    }

    /// Enemy groups and their sizes
    pub fn enemy_groups(&self) -> impl Iterator<Item = (Coordinate, u8)> + 'a {
        let board: &'a Board = self.board;
        board.groups(self.faction.opponent())
    }

    /// The in-bounds cells surrounding `at`
    pub fn neighbours(&self, at: Coordinate) -> ArrayVec<Coordinate, 8> {
        let mut out = ArrayVec::new();
        for dy in -1i16..=1 {
            for dx in -1i16..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let x = at.x as i16 + dx;
                let y = at.y as i16 + dy;
                if x < 0
                    || y < 0
                    || x >= self.dimensions.cols as i16
                    || y >= self.dimensions.rows as i16
                {
                    continue;
                }
                out.push(Coordinate::new(x as u8, y as u8));
            }
        }
        out
    }
}

/// Soft deadline for one turn, anchored when the turn update was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnBudget {
    started_at: Instant,
    limit: Duration,
}

impl TurnBudget {
    pub fn new(started_at: Instant, limit: Duration) -> Self {
        Self { started_at, limit }
    }

    pub fn starting_now(limit: Duration) -> Self {
        Self::new(Instant::now(), limit)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.limit
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline()
    }
}

/// Move-selection policy, invoked once per turn.
///
/// Returning no moves passes the turn. Moves may be infeasible; the session clamps or drops
/// them before sending.
pub trait Strategy {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn decide(&mut self, view: &GameView<'_>, budget: &TurnBudget) -> Vec<Move>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decide(&mut self, view: &GameView<'_>, budget: &TurnBudget) -> Vec<Move> {
        (**self).decide(view, budget)
    }
}

/// Strategy that always passes
#[derive(Debug, Clone, Copy, Default)]
pub struct PassStrategy;

impl Strategy for PassStrategy {
    fn name(&self) -> &'static str {
        "pass"
    }

    fn decide(&mut self, _view: &GameView<'_>, _budget: &TurnBudget) -> Vec<Move> {
        Vec::new()
    }
}
