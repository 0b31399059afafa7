//! Session error taxonomy
//!
//! Every variant is fatal to the session. Graceful endings (`END`, `BYE`) are transitions, not
//! errors, and never show up here.

use std::io;

use thiserror::Error;

use crate::core::FactionError;
use crate::machine::SessionPhase;
use crate::protocol::{MessageKind, ProtocolError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("received {received} while {phase}; expected one of {expected:?}")]
    Sequence {
        phase: SessionPhase,
        received: MessageKind,
        expected: &'static [MessageKind],
    },

    #[error("could not resolve our faction: {0}")]
    HomeResolution(#[from] FactionError),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("connection lost: {0}")]
    ConnectionLost(#[source] io::Error),
}

impl SessionError {
    /// Stream ended outside an expected termination message
    pub fn unexpected_eof(context: &str) -> Self {
        SessionError::ConnectionLost(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("server closed the connection {context}"),
        ))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, SessionError::Sequence { .. })
    }
}
