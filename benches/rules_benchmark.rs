//! Benchmarks for the rule engine.
//!
//! Covers the per-move hot path (legality and apply) and a whole game played
//! with pseudo-random legal moves.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tricolor::game::{GameState, Move, Player, apply, is_legal, legal_moves, termination};

/// Small xorshift generator so games are reproducible without extra crates.
fn next(seed: &mut u64) -> u64 {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 7;
    *seed ^= *seed << 17;
    *seed
}

fn play_random_game(mut seed: u64) -> GameState {
    let mut state = GameState::new();
    let mut player = Player::One;
    while termination(&state).is_none() {
        let moves = legal_moves(&state, player);
        if moves.is_empty() {
            break;
        }
        let pick = usize::try_from(next(&mut seed) % moves.len() as u64).unwrap_or(0);
        apply(&mut state, moves[pick], player);
        player = player.opponent();
    }
    state
}

fn bench_legality(c: &mut Criterion) {
    let state = GameState::new();
    let mv = Move::parse("7TB").expect("valid move");

    c.bench_function("is_legal", |b| {
        b.iter(|| is_legal(black_box(&state), black_box(mv), black_box(Player::One)));
    });

    c.bench_function("legal_moves", |b| {
        b.iter(|| legal_moves(black_box(&state), black_box(Player::One)));
    });
}

fn bench_apply(c: &mut Criterion) {
    let opening = GameState::new();
    let moves: Vec<Move> = ["1R", "3B", "5TR", "7TB"]
        .iter()
        .filter_map(|m| Move::parse(m))
        .collect();

    c.bench_function("apply_opening_moves", |b| {
        b.iter(|| {
            for &mv in &moves {
                let mut state = opening;
                black_box(apply(&mut state, black_box(mv), Player::One));
            }
        });
    });
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("random_game", |b| {
        b.iter(|| black_box(play_random_game(black_box(0x9E37_79B9_7F4A_7C15))));
    });
}

criterion_group!(benches, bench_legality, bench_apply, bench_full_game);
criterion_main!(benches);
