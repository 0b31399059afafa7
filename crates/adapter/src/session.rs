//! Session driver
//!
//! Owns a [`Transport`] and a [`SessionMachine`] and runs the receive loop: one framed read,
//! one decode, one transition, at most one send, repeat. The read is the only await point.

use std::fs::File;
use std::io::BufWriter;

use tracing::{debug, info, warn};

use crate::connection::{Connection, Transport};
use crate::config::ClientConfig;
use crate::engine::Strategy;
use crate::error::SessionError;
use crate::machine::{SessionMachine, Transition};
use crate::protocol::{decode, ClientCommand};
use crate::wire_log::{Direction, WireLog};

pub use crate::machine::SessionOutcome;

pub struct Session<T, S> {
    transport: T,
    machine: SessionMachine<S>,
    name: String,
    wire_log: Option<WireLog<BufWriter<File>>>,
}

impl<T: Transport, S: Strategy> Session<T, S> {
    pub fn new(transport: T, machine: SessionMachine<S>, name: impl Into<String>) -> Self {
        Self {
            transport,
            machine,
            name: name.into(),
            wire_log: None,
        }
    }

    pub fn with_wire_log(mut self, wire_log: Option<WireLog<BufWriter<File>>>) -> Self {
        self.wire_log = wire_log;
        self
    }

    /// Identify, then process server messages until the session ends.
    ///
    /// Returns the outcome on `BYE` or once the game limit is reached; every other way out is
    /// an error.
    pub async fn run(mut self) -> Result<SessionOutcome, SessionError> {
        let hello = self.machine.begin(&self.name)?;
        self.send(&hello).await?;

        loop {
            let Some(frame) = self.transport.recv_frame().await? else {
                return Err(SessionError::unexpected_eof(&format!(
                    "while {}",
                    self.machine.phase()
                )));
            };

            let message = decode(&frame, self.machine.dimensions())?;
            // An UPD is stamped with the turn it starts, END with the turn it closes
            let turn_before = self.machine.state().turn();
            let transition = self.machine.handle(message.clone());
            let turn = turn_before.max(self.machine.state().turn());
            self.log(Direction::Inbound, turn, &message);

            match transition? {
                Transition::Continue => {}
                Transition::Send(command) => self.send(&command).await?,
                Transition::GameOver { turns } => {
                    debug!(turns, "waiting for the next game");
                }
                Transition::Finished => {
                    let outcome = self.machine.outcome();
                    info!(
                        games = outcome.games_completed,
                        turns = outcome.turns_played,
                        "session finished"
                    );
                    return Ok(outcome);
                }
            }
        }
    }

    async fn send(&mut self, command: &ClientCommand) -> Result<(), SessionError> {
        let frame = command.encode()?;
        self.transport.send_frame(&frame).await?;
        let turn = self.machine.state().turn();
        self.log(Direction::Outbound, turn, command);
        Ok(())
    }

    fn log<M: serde::Serialize>(&mut self, dir: Direction, turn: u32, msg: &M) {
        if let Some(wire_log) = self.wire_log.as_mut() {
            if let Err(err) = wire_log.record(dir, turn, msg) {
                warn!(%err, "wire log write failed, disabling it");
                self.wire_log = None;
            }
        }
    }
}

/// Connect per `config` and play with its configured strategy.
pub async fn run(config: &ClientConfig) -> Result<SessionOutcome, SessionError> {
    let wire_log = match &config.wire_log {
        Some(path) => match WireLog::create(path) {
            Ok(log) => Some(log),
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot open wire log, continuing without it");
                None
            }
        },
        None => None,
    };

    let strategy = config.build_strategy();
    info!(
        addr = %config.addr(),
        name = %config.name,
        strategy = strategy.name(),
        budget_ms = config.turn_budget.as_millis() as u64,
        "starting session"
    );

    let connection = Connection::connect(&config.host, config.port).await?;
    let machine =
        SessionMachine::new(strategy, config.turn_budget).with_max_games(config.max_games);
    Session::new(connection, machine, config.name.clone())
        .with_wire_log(wire_log)
        .run()
        .await
}
