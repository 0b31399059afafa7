//! Move selection engine
//!
//! The session machine asks a [`Strategy`] for moves once per turn, handing it a read-only
//! [`GameView`] of the board and a [`TurnBudget`]. Whatever comes back is run through
//! [`legalize`] before it reaches the wire, so a careless strategy costs moves, never the session.
//!
//! Bundled strategies:
//!
//! - [`RandomStrategy`]: moves one random group of ours to a random neighbouring cell
//! - [`PassStrategy`]: never moves

pub mod legalize;
pub mod random;
pub mod strategy;

pub use vvw_core as core;
pub use vvw_types as types;

pub use legalize::{legalize, Legalized, MoveRejection};
pub use random::RandomStrategy;
pub use strategy::{GameView, PassStrategy, Strategy, TurnBudget};
