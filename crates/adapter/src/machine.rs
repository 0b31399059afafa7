//! Session state machine
//!
//! Transport-free: feed it decoded [`ServerMessage`]s, get back a [`Transition`] telling the
//! driver what (if anything) to send. All state mutation and the strategy call happen here, so
//! the whole transition table is testable without a socket.
//!
//! ```text
//! Connecting            -> AwaitingSetup          (begin: send NME)
//! AwaitingSetup         -> AwaitingHumanReport    (SET)
//! AwaitingHumanReport   -> AwaitingHome           (HUM)
//! AwaitingHome          -> AwaitingInitialBoard   (HME)
//! AwaitingInitialBoard  -> TurnLoop               (MAP: resolve faction, turn 0)
//! TurnLoop              -> TurnLoop               (UPD: play a turn, send MOV)
//! TurnLoop              -> BetweenGames | Ended   (END, Ended once the game limit is hit)
//! BetweenGames          -> AwaitingHumanReport    (SET)
//! TurnLoop/BetweenGames -> Ended                  (BYE)
//! ```

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::SessionState;
use crate::engine::{legalize, GameView, Strategy, TurnBudget};
use crate::error::SessionError;
use crate::protocol::{encode_name, ClientCommand, MessageKind, ServerMessage};
use crate::types::{CellReport, Dimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionPhase {
    Connecting,
    AwaitingSetup,
    AwaitingHumanReport,
    AwaitingHome,
    AwaitingInitialBoard,
    TurnLoop,
    BetweenGames,
    Ended,
}

impl SessionPhase {
    /// Message kinds legal in this phase
    pub fn expected(self) -> &'static [MessageKind] {
        use MessageKind::*;
        match self {
            SessionPhase::Connecting | SessionPhase::Ended => &[],
            SessionPhase::AwaitingSetup => &[Setup],
            SessionPhase::AwaitingHumanReport => &[HumanPositions],
            SessionPhase::AwaitingHome => &[Home],
            SessionPhase::AwaitingInitialBoard => &[Snapshot],
            SessionPhase::TurnLoop => &[Snapshot, GameEnded, SessionClosed],
            SessionPhase::BetweenGames => &[Setup, SessionClosed],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Connecting => "connecting",
            SessionPhase::AwaitingSetup => "awaiting setup",
            SessionPhase::AwaitingHumanReport => "awaiting human report",
            SessionPhase::AwaitingHome => "awaiting home",
            SessionPhase::AwaitingInitialBoard => "awaiting initial board",
            SessionPhase::TurnLoop => "in turn loop",
            SessionPhase::BetweenGames => "between games",
            SessionPhase::Ended => "ended",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SessionPhase::Ended
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the driver should do after a message was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// State updated; read the next message
    Continue,
    /// Send this command, then read the next message
    Send(ClientCommand),
    /// A game finished and another may start
    GameOver { turns: u32 },
    /// Stop reading: the server said goodbye or the game limit was reached
    Finished,
}

/// Totals reported when a session ends gracefully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionOutcome {
    pub games_completed: u32,
    pub turns_played: u64,
}

pub struct SessionMachine<S> {
    phase: SessionPhase,
    state: SessionState,
    strategy: S,
    turn_budget: Duration,
    max_games: Option<u32>,
    outcome: SessionOutcome,
}

impl<S: Strategy> SessionMachine<S> {
    pub fn new(strategy: S, turn_budget: Duration) -> Self {
        Self {
            phase: SessionPhase::Connecting,
            state: SessionState::new(),
            strategy,
            turn_budget,
            max_games: None,
            outcome: SessionOutcome::default(),
        }
    }

    /// Stop gracefully after this many `END`s
    pub fn with_max_games(mut self, max_games: Option<u32>) -> Self {
        self.max_games = max_games;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    /// Grid size for bounds-checking decoded coordinates, once announced
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.state.dimensions()
    }

    /// The identification command that opens every session.
    pub fn begin(&mut self, name: &str) -> Result<ClientCommand, SessionError> {
        encode_name(name)?;
        self.phase = SessionPhase::AwaitingSetup;
        debug!(name, "identifying");
        Ok(ClientCommand::Name(name.to_string()))
    }

    pub fn handle(&mut self, message: ServerMessage) -> Result<Transition, SessionError> {
        use SessionPhase::*;

        match (self.phase, message) {
            (AwaitingSetup | BetweenGames, ServerMessage::Setup(dimensions)) => {
                self.state.set_dimensions(dimensions);
                self.phase = AwaitingHumanReport;
                info!(rows = dimensions.rows, cols = dimensions.cols, "grid announced");
                Ok(Transition::Continue)
            }
            (AwaitingHumanReport, ServerMessage::HumanPositions(list)) => {
                debug!(count = list.len(), "human positions reported");
                self.phase = AwaitingHome;
                Ok(Transition::Continue)
            }
            (AwaitingHome, ServerMessage::Home(at)) => {
                self.state.record_home(at);
                self.phase = AwaitingInitialBoard;
                info!(home = %at, "home assigned");
                Ok(Transition::Continue)
            }
            (AwaitingInitialBoard, ServerMessage::Snapshot { cells, .. }) => {
                let faction = self.state.apply_initial_board(&cells)?;
                let totals = self.state.totals();
                self.phase = TurnLoop;
                info!(
                    %faction,
                    ours = totals.ours,
                    enemy = totals.enemy,
                    humans = totals.humans,
                    "game started"
                );
                Ok(Transition::Continue)
            }
            (TurnLoop, ServerMessage::Snapshot { cells, .. }) => Ok(self.play_turn(&cells)),
            (TurnLoop, ServerMessage::GameEnded) => {
                let turns = self.state.turn();
                self.outcome.games_completed += 1;
                self.state.reset();
                info!(turns, games = self.outcome.games_completed, "game ended");

                if self
                    .max_games
                    .is_some_and(|max| self.outcome.games_completed >= max)
                {
                    info!("game limit reached, leaving");
                    self.phase = Ended;
                    return Ok(Transition::Finished);
                }
                self.phase = BetweenGames;
                Ok(Transition::GameOver { turns })
            }
            (TurnLoop | BetweenGames, ServerMessage::SessionClosed) => {
                self.phase = Ended;
                info!(
                    games = self.outcome.games_completed,
                    turns = self.outcome.turns_played,
                    "server closed the session"
                );
                Ok(Transition::Finished)
            }
            (phase, message) => Err(SessionError::Sequence {
                phase,
                received: message.kind(),
                expected: phase.expected(),
            }),
        }
    }

    fn play_turn(&mut self, cells: &[CellReport]) -> Transition {
        let replaced = self.state.apply_turn_update(cells);
        self.outcome.turns_played += 1;
        let turn = self.state.turn();
        let started_at = self.state.turn_started_at().unwrap_or_else(Instant::now);
        let budget = TurnBudget::new(started_at, self.turn_budget);

        let Some(view) = GameView::from_state(&self.state) else {
            warn!(turn, "no faction in turn loop, passing");
            return Transition::Send(ClientCommand::Moves(Vec::new()));
        };

        let requested = self.strategy.decide(&view, &budget);
        let requested = if budget.is_expired() {
            warn!(
                turn,
                strategy = self.strategy.name(),
                elapsed_ms = budget.elapsed().as_millis() as u64,
                budget_ms = budget.limit().as_millis() as u64,
                "turn budget exceeded, passing"
            );
            Vec::new()
        } else {
            requested
        };

        let legal = legalize(&view, &requested);
        if !legal.is_clean() {
            for (mv, reason) in &legal.dropped {
                warn!(
                    turn,
                    source = %mv.source,
                    destination = %mv.destination,
                    count = mv.count,
                    reason = reason.code(),
                    "dropped move: {}",
                    reason
                );
            }
            if legal.clamped > 0 {
                warn!(turn, clamped = legal.clamped, "clamped move counts to available units");
            }
        }

        let totals = view.totals;
        debug!(
            turn,
            replaced,
            ours = totals.ours,
            enemy = totals.enemy,
            humans = totals.humans,
            moves = legal.moves.len(),
            "turn played"
        );
        Transition::Send(ClientCommand::Moves(legal.moves))
    }
}
