//! Per-piece move geometry.
//!
//! [`pseudo_legal_moves`] answers "where could this piece go", ignoring
//! whether its own King would be left in check. [`attacked_squares`] is the
//! narrower "which squares does it threaten" used for check and castling
//! safety: pawn pushes are not attacks, and neither are castling moves.

use crate::{Board, SquareSet};
use chess_core::{CastleSide, Color, Piece, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = KING_OFFSETS;

/// Precomputed knight targets.
const KNIGHT_TARGETS: [SquareSet; 64] = compute_leaper_targets(&KNIGHT_OFFSETS);

/// Precomputed king targets (castling excluded).
const KING_TARGETS: [SquareSet; 64] = compute_leaper_targets(&KING_OFFSETS);

/// Precomputed pawn capture squares [color][square].
const PAWN_CAPTURES: [[SquareSet; 64]; 2] = [
    compute_leaper_targets(&[(1, -1), (1, 1)]),
    compute_leaper_targets(&[(-1, -1), (-1, 1)]),
];

/// Computes on-board targets of a fixed-offset mover for all squares at
/// compile time.
const fn compute_leaper_targets(offsets: &[(i8, i8)]) -> [SquareSet; 64] {
    let mut targets = [SquareSet::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (dr, df) = offsets[i];
            let r = rank + dr;
            let f = file + df;
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        targets[sq as usize] = SquareSet(bits);
        sq += 1;
    }

    targets
}

/// Returns the squares the piece on `from` could move to, ignoring checks.
///
/// Castling is offered on occupancy and "has moved" grounds only; attack
/// data is not available here. Returns an empty set for an empty square.
pub fn pseudo_legal_moves(board: &Board, from: Square) -> SquareSet {
    moves_with_attacks(board, from, None)
}

/// Like [`pseudo_legal_moves`], with the opponent's attacked squares used to
/// gate castling when they are known.
pub(crate) fn moves_with_attacks(
    board: &Board,
    from: Square,
    enemy_attacks: Option<SquareSet>,
) -> SquareSet {
    let Some(piece) = board.piece_at(from) else {
        return SquareSet::EMPTY;
    };
    let friendly = board.occupied_by(piece.color);

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece),
        PieceKind::Knight => KNIGHT_TARGETS[from.index() as usize] & !friendly,
        PieceKind::Bishop => ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS),
        PieceKind::Rook => ray_moves(board, from, piece.color, &ROOK_DIRECTIONS),
        PieceKind::Queen => ray_moves(board, from, piece.color, &QUEEN_DIRECTIONS),
        PieceKind::King => {
            (KING_TARGETS[from.index() as usize] & !friendly)
                | castling_moves(board, from, piece, enemy_attacks)
        }
    }
}

/// Returns the squares the piece on `from` attacks.
pub fn attacked_squares(board: &Board, from: Square) -> SquareSet {
    let Some(piece) = board.piece_at(from) else {
        return SquareSet::EMPTY;
    };
    match piece.kind {
        PieceKind::Pawn => PAWN_CAPTURES[piece.color.index()][from.index() as usize],
        PieceKind::King => KING_TARGETS[from.index() as usize] & !board.occupied_by(piece.color),
        _ => moves_with_attacks(board, from, None),
    }
}

fn pawn_moves(board: &Board, from: Square, pawn: Piece) -> SquareSet {
    let mut moves = SquareSet::EMPTY;
    let dir = pawn.color.pawn_direction();

    if let Some(one) = from.offset(dir, 0).filter(|sq| board.is_empty(*sq)) {
        moves.insert(one);
        if !pawn.has_moved {
            if let Some(two) = from.offset(2 * dir, 0).filter(|sq| board.is_empty(*sq)) {
                moves.insert(two);
            }
        }
    }

    for to in PAWN_CAPTURES[pawn.color.index()][from.index() as usize] {
        let enemy = board.piece_at(to).is_some_and(|p| p.color != pawn.color);
        if enemy || board.en_passant_victim(pawn.color, to).is_some() {
            moves.insert(to);
        }
    }

    moves
}

/// Casts rays until the board edge, stopping before a friendly piece and on
/// an enemy one.
fn ray_moves(board: &Board, from: Square, color: Color, directions: &[(i8, i8)]) -> SquareSet {
    let mut moves = SquareSet::EMPTY;
    for &(dr, df) in directions {
        let mut current = from.offset(dr, df);
        while let Some(sq) = current {
            match board.piece_at(sq) {
                None => moves.insert(sq),
                Some(blocker) => {
                    if blocker.color != color {
                        moves.insert(sq);
                    }
                    break;
                }
            }
            current = sq.offset(dr, df);
        }
    }
    moves
}

fn castling_moves(
    board: &Board,
    from: Square,
    king: Piece,
    enemy_attacks: Option<SquareSet>,
) -> SquareSet {
    let mut moves = SquareSet::EMPTY;
    if king.has_moved {
        return moves;
    }
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if can_castle(board, from, side, enemy_attacks) {
            if let Some(to) = from.offset(0, 2 * side.direction()) {
                moves.insert(to);
            }
        }
    }
    moves
}

/// Checks the castling preconditions for the King on `king_sq`.
///
/// The King and the Rook on the `side` corner of its rank must both be
/// unmoved, and every square strictly between them empty. When
/// `enemy_attacks` is given, the King's square, the square it crosses, and
/// its destination must all be outside it.
pub fn can_castle(
    board: &Board,
    king_sq: Square,
    side: CastleSide,
    enemy_attacks: Option<SquareSet>,
) -> bool {
    let Some(king) = board.piece_at(king_sq) else {
        return false;
    };
    if king.kind != PieceKind::King || king.has_moved {
        return false;
    }

    let rank = king_sq.rank_index();
    let rook = Square::from_coords(rank, side.rook_file()).and_then(|sq| board.piece_at(sq));
    let rook_ready = rook.is_some_and(|r| {
        r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved
    });
    if !rook_ready {
        return false;
    }

    let king_file = king_sq.file_index();
    let rook_file = side.rook_file();
    let (low, high) = if king_file < rook_file {
        (king_file, rook_file)
    } else {
        (rook_file, king_file)
    };
    let path_clear = (low + 1..high)
        .filter_map(|file| Square::from_coords(rank, file))
        .all(|sq| board.is_empty(sq));
    if !path_clear {
        return false;
    }

    let dir = side.direction();
    let (Some(crossed), Some(destination)) = (king_sq.offset(0, dir), king_sq.offset(0, 2 * dir))
    else {
        return false;
    };

    match enemy_attacks {
        Some(attacked) => ![king_sq, crossed, destination]
            .iter()
            .any(|sq| attacked.contains(*sq)),
        None => true,
    }
}
