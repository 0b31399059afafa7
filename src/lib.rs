//! Vampires vs Werewolves protocol client (workspace facade crate).
//!
//! Re-exports the workspace crates as `vvw_client::{types, core, engine, adapter}` so the binary,
//! integration tests and benches share one import path.

pub use vvw_adapter as adapter;
pub use vvw_core as core;
pub use vvw_engine as engine;
pub use vvw_types as types;
