//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Promotions always pick a Queen, so each promoting (from, to) pair counts
//! once rather than four times.

use super::legal_moves_for;
use crate::{Board, DefaultPromotion};
use chess_core::Color;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut scratch = board.clone();
    let moves = legal_moves_for(&mut scratch, side);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in moves.moves() {
        let mut child = board.clone();
        let applied = child.apply(m.from(), m.to(), &mut DefaultPromotion);
        debug_assert!(applied.is_ok(), "legal move {m} failed to apply: {applied:?}");
        if applied.is_ok() {
            nodes += perft(&child, side.opposite(), depth - 1);
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &Board, side: Color, depth: u32) -> Vec<(String, u64)> {
    let mut scratch = board.clone();
    let moves = legal_moves_for(&mut scratch, side);
    let mut results = Vec::with_capacity(moves.len());

    for m in moves.moves() {
        let mut child = board.clone();
        let applied = child.apply(m.from(), m.to(), &mut DefaultPromotion);
        debug_assert!(applied.is_ok(), "legal move {m} failed to apply: {applied:?}");
        if applied.is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(&child, side.opposite(), depth - 1)
        } else {
            1
        };
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
