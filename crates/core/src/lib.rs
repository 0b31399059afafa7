//! Core board model - pure, deterministic, and testable
//!
//! This crate owns the client's picture of the game: which cells hold which units, which faction
//! we play, and which turn it is. It has **zero dependencies** on networking or I/O, so every rule
//! here is exercised by plain unit tests.
//!
//! # Module Structure
//!
//! - [`board`]: sparse grid occupancy, replaced wholesale by each server report
//! - [`state`]: the per-session aggregate (dimensions, board, faction, turn, cached totals)
//! - [`rng`]: small deterministic LCG used by randomized strategies
//!
//! # Snapshot Rules
//!
//! - **Replace, never merge**: a report lists every non-empty cell; a coordinate missing from the
//!   report is empty afterwards.
//! - **Empty turn update**: an empty `UPD` means "nothing to report yet" and leaves the board as
//!   it was, while still counting as a turn.
//! - **One-shot faction**: the home coordinate is looked up once in the first board report to
//!   decide which faction we control.
//! - **Totals never go stale**: our, enemy and human totals are recomputed whenever the board
//!   changes.
//!
//! # Example
//!
//! ```
//! use vvw_core::SessionState;
//! use vvw_types::{Cell, CellReport, Coordinate, Dimensions, Faction};
//!
//! let mut state = SessionState::new();
//! state.set_dimensions(Dimensions::new(1, 3));
//! state.record_home(Coordinate::new(0, 0));
//!
//! let faction = state
//!     .apply_initial_board(&[CellReport::new(Coordinate::new(0, 0), Cell::new(0, 0, 5))])
//!     .unwrap();
//! assert_eq!(faction, Faction::Werewolves);
//! assert_eq!(state.totals().ours, 5);
//!
//! // First turn update carries no cells: board unchanged, turn advances.
//! state.apply_turn_update(&[]);
//! assert_eq!(state.turn(), 1);
//! assert_eq!(state.board().get(Coordinate::new(0, 0)), Cell::new(0, 0, 5));
//! ```

pub mod board;
pub mod rng;
pub mod state;

pub use vvw_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Totals};
pub use rng::SimpleRng;
pub use state::{FactionError, SessionState};
