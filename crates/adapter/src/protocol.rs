//! Protocol module - binary frames exchanged with the game server
//!
//! Every frame is a 3-byte ASCII tag followed by single-byte unsigned fields. There is no length
//! prefix; the tag alone determines how many bytes follow (see [`FrameShape`]).
//!
//! Decoding validates every field at this boundary, so the session machine only ever sees
//! well-formed [`ServerMessage`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Cell, CellReport, Coordinate, Dimensions, Move, MAX_MOVES, MAX_NAME_LEN, TAG_LEN,
};

// ============== Tags ==============

pub const TAG_SET: &[u8; TAG_LEN] = b"SET";
pub const TAG_HUM: &[u8; TAG_LEN] = b"HUM";
pub const TAG_HME: &[u8; TAG_LEN] = b"HME";
pub const TAG_MAP: &[u8; TAG_LEN] = b"MAP";
pub const TAG_UPD: &[u8; TAG_LEN] = b"UPD";
pub const TAG_END: &[u8; TAG_LEN] = b"END";
pub const TAG_BYE: &[u8; TAG_LEN] = b"BYE";
pub const TAG_NME: &[u8; TAG_LEN] = b"NME";
pub const TAG_MOV: &[u8; TAG_LEN] = b"MOV";

/// Bytes per `(x, y)` entry of `HUM`
const COORD_LEN: usize = 2;
/// Bytes per entry of `MAP`/`UPD` and of `MOV`
const TUPLE_LEN: usize = 5;

/// Body layout implied by a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameShape {
    /// Exactly this many body bytes
    Fixed(usize),
    /// One count byte, then `count * item_len` bytes
    Counted { item_len: usize },
}

impl FrameShape {
    /// Shape of the frame opened by `tag`, in either direction.
    pub fn for_tag(tag: &[u8]) -> Result<Self, ProtocolError> {
        match tag {
            b"SET" | b"HME" => Ok(FrameShape::Fixed(2)),
            b"END" | b"BYE" => Ok(FrameShape::Fixed(0)),
            b"HUM" => Ok(FrameShape::Counted {
                item_len: COORD_LEN,
            }),
            b"MAP" | b"UPD" | b"MOV" => Ok(FrameShape::Counted {
                item_len: TUPLE_LEN,
            }),
            b"NME" => Ok(FrameShape::Counted { item_len: 1 }),
            _ => Err(ProtocolError::UnknownTag(tag_string(tag))),
        }
    }

    /// Body length once the count byte (if any) is known
    pub fn body_len(self, count: u8) -> usize {
        match self {
            FrameShape::Fixed(n) => n,
            FrameShape::Counted { item_len } => 1 + count as usize * item_len,
        }
    }
}

// ============== Errors ==============

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown message tag {0:?}")]
    UnknownTag(String),
    #[error("frame of {0} bytes is too short to hold a tag")]
    MissingTag(usize),
    #[error("{tag} body should be {expected} bytes, got {actual}")]
    BadLength {
        tag: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    ZeroDimension { rows: u8, cols: u8 },
    #[error("{tag} coordinate {at} lies outside the {dimensions} grid")]
    OutOfBounds {
        tag: &'static str,
        at: Coordinate,
        dimensions: Dimensions,
    },
    #[error("{tag} can carry at most 255 entries, got {count}")]
    TooManyEntries { tag: &'static str, count: usize },
    #[error("identification name must be 1 to 255 bytes, got {0}")]
    NameLength(usize),
    #[error("identification name must be ASCII")]
    NameNotAscii,
    #[error("{0} is not a message this side of the connection can decode")]
    WrongDirection(&'static str),
}

fn tag_string(tag: &[u8]) -> String {
    tag.escape_ascii().to_string()
}

// ============== Server -> Client Messages ==============

/// Which tag carried a board report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotTag {
    /// Initial full board (`MAP`)
    Map,
    /// Per-turn report (`UPD`)
    Upd,
}

/// Decoded server message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum ServerMessage {
    Setup(Dimensions),
    /// Informational; the board report is authoritative
    HumanPositions(Vec<Coordinate>),
    Home(Coordinate),
    Snapshot {
        tag: SnapshotTag,
        cells: Vec<CellReport>,
    },
    GameEnded,
    SessionClosed,
}

/// Message kinds as the session machine sees them; `MAP` and `UPD` are both `Snapshot`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Setup,
    HumanPositions,
    Home,
    Snapshot,
    GameEnded,
    SessionClosed,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Setup => "Setup",
            MessageKind::HumanPositions => "HumanPositions",
            MessageKind::Home => "Home",
            MessageKind::Snapshot => "Snapshot",
            MessageKind::GameEnded => "GameEnded",
            MessageKind::SessionClosed => "SessionClosed",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ServerMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            ServerMessage::Setup(_) => MessageKind::Setup,
            ServerMessage::HumanPositions(_) => MessageKind::HumanPositions,
            ServerMessage::Home(_) => MessageKind::Home,
            ServerMessage::Snapshot { .. } => MessageKind::Snapshot,
            ServerMessage::GameEnded => MessageKind::GameEnded,
            ServerMessage::SessionClosed => MessageKind::SessionClosed,
        }
    }

    /// The wire tag this message travels under
    pub fn tag(&self) -> &'static [u8; TAG_LEN] {
        match self {
            ServerMessage::Setup(_) => TAG_SET,
            ServerMessage::HumanPositions(_) => TAG_HUM,
            ServerMessage::Home(_) => TAG_HME,
            ServerMessage::Snapshot {
                tag: SnapshotTag::Map,
                ..
            } => TAG_MAP,
            ServerMessage::Snapshot {
                tag: SnapshotTag::Upd,
                ..
            } => TAG_UPD,
            ServerMessage::GameEnded => TAG_END,
            ServerMessage::SessionClosed => TAG_BYE,
        }
    }

    /// Encode as the server would send it. Used by fake servers and tests.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let tag = self.tag();
        let mut out = Vec::with_capacity(TAG_LEN + 16);
        out.extend_from_slice(tag);
        match self {
            ServerMessage::Setup(d) => out.extend_from_slice(&[d.rows, d.cols]),
            ServerMessage::HumanPositions(list) => {
                out.push(entry_count(tag_name(tag), list.len())?);
                for c in list {
                    out.extend_from_slice(&[c.x, c.y]);
                }
            }
            ServerMessage::Home(c) => out.extend_from_slice(&[c.x, c.y]),
            ServerMessage::Snapshot { cells, .. } => {
                out.push(entry_count(tag_name(tag), cells.len())?);
                for r in cells {
                    out.extend_from_slice(&[
                        r.at.x,
                        r.at.y,
                        r.cell.humans,
                        r.cell.vampires,
                        r.cell.werewolves,
                    ]);
                }
            }
            ServerMessage::GameEnded | ServerMessage::SessionClosed => {}
        }
        Ok(out)
    }
}

// ============== Client -> Server Commands ==============

/// Command sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum ClientCommand {
    Name(String),
    Moves(Vec<Move>),
}

impl ClientCommand {
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        match self {
            ClientCommand::Name(name) => encode_name(name),
            ClientCommand::Moves(moves) => encode_moves(moves),
        }
    }
}

/// `NME len name`
pub fn encode_name(name: &str) -> Result<Vec<u8>, ProtocolError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(ProtocolError::NameLength(name.len()));
    }
    if !name.is_ascii() {
        return Err(ProtocolError::NameNotAscii);
    }
    let mut out = Vec::with_capacity(TAG_LEN + 1 + name.len());
    out.extend_from_slice(TAG_NME);
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(out)
}

/// `MOV n (sx sy count dx dy)*n`
///
/// Unit counts are not checked against the board; see `vvw_engine::legalize`.
pub fn encode_moves(moves: &[Move]) -> Result<Vec<u8>, ProtocolError> {
    if moves.len() > MAX_MOVES {
        return Err(ProtocolError::TooManyEntries {
            tag: "MOV",
            count: moves.len(),
        });
    }
    let mut out = Vec::with_capacity(TAG_LEN + 1 + moves.len() * TUPLE_LEN);
    out.extend_from_slice(TAG_MOV);
    out.push(moves.len() as u8);
    for m in moves {
        out.extend_from_slice(&[
            m.source.x,
            m.source.y,
            m.count,
            m.destination.x,
            m.destination.y,
        ]);
    }
    Ok(out)
}

// ============== Decoding ==============

/// Decode one complete server frame.
///
/// Coordinates are bounds-checked only when `dimensions` is known.
pub fn decode(
    frame: &[u8],
    dimensions: Option<Dimensions>,
) -> Result<ServerMessage, ProtocolError> {
    let (tag, body) = split_tag(frame)?;
    let shape = FrameShape::for_tag(tag)?;

    match tag {
        b"SET" => {
            let body = exact(body, shape, "SET")?;
            let (rows, cols) = (body[0], body[1]);
            if rows == 0 || cols == 0 {
                return Err(ProtocolError::ZeroDimension { rows, cols });
            }
            Ok(ServerMessage::Setup(Dimensions::new(rows, cols)))
        }
        b"HUM" => {
            let items = counted(body, shape, "HUM")?;
            let list = items
                .chunks_exact(COORD_LEN)
                .map(|c| checked("HUM", Coordinate::new(c[0], c[1]), dimensions))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ServerMessage::HumanPositions(list))
        }
        b"HME" => {
            let body = exact(body, shape, "HME")?;
            let at = checked("HME", Coordinate::new(body[0], body[1]), dimensions)?;
            Ok(ServerMessage::Home(at))
        }
        b"MAP" | b"UPD" => {
            let (name, snap_tag) = if tag == TAG_MAP {
                ("MAP", SnapshotTag::Map)
            } else {
                ("UPD", SnapshotTag::Upd)
            };
            let items = counted(body, shape, name)?;
            let cells = items
                .chunks_exact(TUPLE_LEN)
                .map(|t| {
                    let at = checked(name, Coordinate::new(t[0], t[1]), dimensions)?;
                    Ok(CellReport::new(at, Cell::new(t[2], t[3], t[4])))
                })
                .collect::<Result<Vec<_>, ProtocolError>>()?;
            Ok(ServerMessage::Snapshot {
                tag: snap_tag,
                cells,
            })
        }
        b"END" => {
            exact(body, shape, "END")?;
            Ok(ServerMessage::GameEnded)
        }
        b"BYE" => {
            exact(body, shape, "BYE")?;
            Ok(ServerMessage::SessionClosed)
        }
        b"NME" => Err(ProtocolError::WrongDirection("NME")),
        _ => Err(ProtocolError::WrongDirection("MOV")),
    }
}

/// Decode one complete client frame. The client never receives these; fake servers do.
pub fn decode_client_command(frame: &[u8]) -> Result<ClientCommand, ProtocolError> {
    let (tag, body) = split_tag(frame)?;
    let shape = FrameShape::for_tag(tag)?;

    match tag {
        b"NME" => {
            let bytes = counted(body, shape, "NME")?;
            if bytes.is_empty() {
                return Err(ProtocolError::NameLength(0));
            }
            if !bytes.is_ascii() {
                return Err(ProtocolError::NameNotAscii);
            }
            Ok(ClientCommand::Name(String::from_utf8_lossy(bytes).into_owned()))
        }
        b"MOV" => {
            let items = counted(body, shape, "MOV")?;
            let moves = items
                .chunks_exact(TUPLE_LEN)
                .map(|t| {
                    Move::new(
                        Coordinate::new(t[0], t[1]),
                        t[2],
                        Coordinate::new(t[3], t[4]),
                    )
                })
                .collect();
            Ok(ClientCommand::Moves(moves))
        }
        _ => Err(ProtocolError::WrongDirection(tag_name(tag))),
    }
}

fn split_tag(frame: &[u8]) -> Result<(&[u8], &[u8]), ProtocolError> {
    if frame.len() < TAG_LEN {
        return Err(ProtocolError::MissingTag(frame.len()));
    }
    Ok(frame.split_at(TAG_LEN))
}

/// Check a fixed-size body
fn exact<'a>(
    body: &'a [u8],
    shape: FrameShape,
    tag: &'static str,
) -> Result<&'a [u8], ProtocolError> {
    let expected = shape.body_len(0);
    if body.len() != expected {
        return Err(ProtocolError::BadLength {
            tag,
            expected,
            actual: body.len(),
        });
    }
    Ok(body)
}

/// Check a count-prefixed body and return the items after the count byte
fn counted<'a>(
    body: &'a [u8],
    shape: FrameShape,
    tag: &'static str,
) -> Result<&'a [u8], ProtocolError> {
    let Some(&count) = body.first() else {
        return Err(ProtocolError::BadLength {
            tag,
            expected: 1,
            actual: 0,
        });
    };
    let expected = shape.body_len(count);
    if body.len() != expected {
        return Err(ProtocolError::BadLength {
            tag,
            expected,
            actual: body.len(),
        });
    }
    Ok(&body[1..])
}

fn checked(
    tag: &'static str,
    at: Coordinate,
    dimensions: Option<Dimensions>,
) -> Result<Coordinate, ProtocolError> {
    match dimensions {
        Some(d) if !d.contains(at) => Err(ProtocolError::OutOfBounds {
            tag,
            at,
            dimensions: d,
        }),
        _ => Ok(at),
    }
}

fn entry_count(tag: &'static str, len: usize) -> Result<u8, ProtocolError> {
    u8::try_from(len).map_err(|_| ProtocolError::TooManyEntries { tag, count: len })
}

fn tag_name(tag: &[u8]) -> &'static str {
    match tag {
        b"SET" => "SET",
        b"HUM" => "HUM",
        b"HME" => "HME",
        b"MAP" => "MAP",
        b"UPD" => "UPD",
        b"END" => "END",
        b"BYE" => "BYE",
        b"NME" => "NME",
        b"MOV" => "MOV",
        _ => "???",
    }
}
