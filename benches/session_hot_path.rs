use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use vvw_client::adapter::{decode, ServerMessage, SnapshotTag};
use vvw_client::core::{SessionState, SimpleRng};
use vvw_client::engine::{legalize, GameView, RandomStrategy, Strategy, TurnBudget};
use vvw_client::types::{Cell, CellReport, Coordinate, Dimensions, Move};

const ROWS: u8 = 16;
const COLS: u8 = 16;

/// A busy board: roughly half the cells occupied
fn busy_report(seed: u32) -> Vec<CellReport> {
    let mut rng = SimpleRng::new(seed);
    let mut cells = Vec::new();
    for y in 0..ROWS {
        for x in 0..COLS {
            if rng.next_range(2) == 0 {
                continue;
            }
            let cell = match rng.next_range(3) {
                0 => Cell::new(rng.next_range(10) as u8 + 1, 0, 0),
                1 => Cell::new(0, rng.next_range(30) as u8 + 1, 0),
                _ => Cell::new(0, 0, rng.next_range(30) as u8 + 1),
            };
            cells.push(CellReport::new(Coordinate::new(x, y), cell));
        }
    }
    cells.truncate(255);
    cells
}

fn started_state() -> SessionState {
    let mut state = SessionState::new();
    state.set_dimensions(Dimensions::new(ROWS, COLS));
    state.record_home(Coordinate::new(0, 0));
    let mut initial = busy_report(1);
    initial.truncate(254);
    // keep home occupied so faction resolution succeeds
    initial.push(CellReport::new(Coordinate::new(0, 0), Cell::new(0, 20, 0)));
    let _ = state.apply_initial_board(&initial);
    state
}

fn bench_apply_update(c: &mut Criterion) {
    let mut state = started_state();
    let report = busy_report(2);

    c.bench_function("apply_turn_update_busy_board", |b| {
        b.iter(|| {
            state.apply_turn_update(black_box(&report));
        })
    });
}

fn bench_decode_snapshot(c: &mut Criterion) {
    let frame = ServerMessage::Snapshot {
        tag: SnapshotTag::Upd,
        cells: busy_report(3),
    }
    .encode()
    .unwrap_or_default();
    let dims = Some(Dimensions::new(ROWS, COLS));

    c.bench_function("decode_upd_frame", |b| {
        b.iter(|| decode(black_box(&frame), dims))
    });
}

fn bench_legalize(c: &mut Criterion) {
    let state = started_state();
    let Some(view) = GameView::from_state(&state) else {
        return;
    };
    // every group tries to move twice its size to the east
    let requested: Vec<Move> = view
        .our_groups()
        .map(|(at, n)| Move::new(at, n.saturating_mul(2), Coordinate::new(at.x + 1, at.y)))
        .collect();

    c.bench_function("legalize_group_moves", |b| {
        b.iter(|| legalize(black_box(&view), black_box(&requested)))
    });
}

fn bench_random_decide(c: &mut Criterion) {
    let state = started_state();
    let Some(view) = GameView::from_state(&state) else {
        return;
    };
    let mut strategy = RandomStrategy::new(9);
    let budget = TurnBudget::starting_now(Duration::from_secs(60));

    c.bench_function("random_strategy_decide", |b| {
        b.iter(|| strategy.decide(black_box(&view), &budget))
    });
}

criterion_group!(
    benches,
    bench_apply_update,
    bench_decode_snapshot,
    bench_legalize,
    bench_random_decide
);
criterion_main!(benches);
