//! JSON-lines wire log
//!
//! One line per decoded inbound message and per outbound command. Written synchronously from the
//! session loop; the file is flushed after each line so a crash loses at most the last record.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

#[derive(Serialize)]
struct WireRecord<'a, T: Serialize> {
    ts: u64,
    dir: Direction,
    turn: u32,
    msg: &'a T,
}

pub struct WireLog<W: Write = BufWriter<File>> {
    out: W,
}

impl WireLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> WireLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn record<T: Serialize>(&mut self, dir: Direction, turn: u32, msg: &T) -> io::Result<()> {
        let record = WireRecord {
            ts: now_ms(),
            dir,
            turn,
            msg,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
