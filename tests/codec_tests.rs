//! Codec tests - wire layout and client command loopback

use vvw_client::adapter::{
    decode, decode_client_command, encode_moves, ClientCommand, ProtocolError, ServerMessage,
    SnapshotTag,
};
use vvw_client::core::SimpleRng;
use vvw_client::types::{Cell, CellReport, Coordinate, Dimensions, Move};

#[test]
fn test_moves_loopback() {
    let mut rng = SimpleRng::new(31337);
    for len in [0usize, 1, 2, 17, 255] {
        let moves: Vec<Move> = (0..len)
            .map(|_| {
                let mut byte = || rng.next_range(256) as u8;
                Move::new(
                    Coordinate::new(byte(), byte()),
                    byte(),
                    Coordinate::new(byte(), byte()),
                )
            })
            .collect();

        let frame = encode_moves(&moves).unwrap();
        assert_eq!(frame.len(), 4 + 5 * len);
        assert_eq!(
            decode_client_command(&frame).unwrap(),
            ClientCommand::Moves(moves)
        );
    }
}

#[test]
fn test_handshake_frames() {
    let dims = Dimensions::new(10, 12);
    assert_eq!(
        decode(b"SET\x0a\x0c", None).unwrap(),
        ServerMessage::Setup(dims)
    );
    assert_eq!(
        decode(b"HUM\x03\x00\x00\x0b\x09\x05\x05", Some(dims)).unwrap(),
        ServerMessage::HumanPositions(vec![
            Coordinate::new(0, 0),
            Coordinate::new(11, 9),
            Coordinate::new(5, 5),
        ])
    );
    assert_eq!(
        decode(b"HME\x0b\x00", Some(dims)).unwrap(),
        ServerMessage::Home(Coordinate::new(11, 0))
    );
}

#[test]
fn test_server_messages_survive_encode_decode() {
    let dims = Dimensions::new(4, 4);
    let messages = [
        ServerMessage::Setup(dims),
        ServerMessage::HumanPositions(vec![Coordinate::new(3, 3)]),
        ServerMessage::Home(Coordinate::new(0, 1)),
        ServerMessage::Snapshot {
            tag: SnapshotTag::Map,
            cells: vec![
                CellReport::new(Coordinate::new(0, 1), Cell::new(0, 7, 0)),
                CellReport::new(Coordinate::new(3, 3), Cell::new(2, 0, 0)),
            ],
        },
        ServerMessage::Snapshot {
            tag: SnapshotTag::Upd,
            cells: vec![],
        },
        ServerMessage::GameEnded,
        ServerMessage::SessionClosed,
    ];
    for msg in messages {
        let frame = msg.encode().unwrap();
        assert_eq!(decode(&frame, Some(dims)).unwrap(), msg);
    }
}

#[test]
fn test_malformed_frames_are_protocol_errors() {
    let dims = Some(Dimensions::new(2, 2));
    let cases: [&[u8]; 6] = [
        b"",
        b"FOO",
        b"SET\x02",
        b"HME\x02\x00",
        b"MAP\x01\x00\x00\x00\x01",
        b"BYE!",
    ];
    for frame in cases {
        assert!(decode(frame, dims).is_err(), "{:?} should not decode", frame);
    }
    assert_eq!(
        decode(b"SET\x00\x00", None),
        Err(ProtocolError::ZeroDimension { rows: 0, cols: 0 })
    );
}
