//! Adapter - talks to the game server
//!
//! Everything between the socket and the strategy lives here: the binary wire codec, the framed
//! transport, the session state machine and the loop that drives it.
//!
//! # Protocol Overview
//!
//! Frames are a 3-byte ASCII tag followed by single-byte fields:
//!
//! 1. **Identify**: client sends `NME` with its name
//! 2. **Setup**: server sends `SET` (grid size), `HUM` (human positions), `HME` (our home cell)
//! 3. **Initial board**: server sends `MAP`; the home cell tells us which faction we play
//! 4. **Turns**: server sends `UPD`, client answers with `MOV`
//! 5. **Endings**: `END` closes a game (another may start with `SET`), `BYE` closes the session
//!
//! # Environment Variables
//!
//! - `VVW_NAME`: identification name (default: `vvw-client`)
//! - `VVW_TURN_BUDGET_MS`: soft per-turn deadline for the strategy (default: 1800)
//! - `VVW_STRATEGY`: `random` or `pass` (default: `random`)
//! - `VVW_SEED`: seed for the random strategy (default: clock)
//! - `VVW_MAX_GAMES`: leave after this many games (default: unbounded)
//! - `VVW_WIRE_LOG`: append a JSON-lines record of every message to this file

pub mod config;
pub mod connection;
pub mod error;
pub mod machine;
pub mod protocol;
pub mod session;
pub mod wire_log;

pub use vvw_core as core;
pub use vvw_engine as engine;
pub use vvw_types as types;

pub use config::{ClientConfig, StrategyKind};
pub use connection::{Connection, Transport};
pub use error::SessionError;
pub use machine::{SessionMachine, SessionOutcome, SessionPhase, Transition};
pub use protocol::{
    decode, decode_client_command, encode_moves, encode_name, ClientCommand, FrameShape,
    MessageKind, ProtocolError, ServerMessage, SnapshotTag,
};
pub use session::{run, Session};
pub use wire_log::{Direction, WireLog};
