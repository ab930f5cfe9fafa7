//! Game state: side to move, move history, and terminal-state detection.
//!
//! [`GameState`] owns the board and keeps the legal move set for the side to
//! move up to date. Every accepted move is validated against that set before
//! it touches the board, so a rejected move leaves the game untouched.

use crate::movegen::{legal_moves_for, moves_with_attacks, LegalMoveSet};
use crate::{Board, BoardError, DefaultPromotion, FixedPromotion, PromotionChooser};
use chess_core::{CastleSide, Color, Move, Notation, NotationError, PieceKind, Square};
use thiserror::Error;
use tracing::debug;

/// Why a move was rejected. The game is unchanged in every case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The origin square is empty or holds an opponent's piece.
    #[error("invalid selection: no piece of the side to move on {square}")]
    InvalidSelection { square: Square },

    /// The piece cannot reach the destination.
    #[error("illegal move: {from}-{to}")]
    IllegalMove { from: Square, to: Square },

    /// The move would leave the mover's King in check.
    #[error("move {from}-{to} leaves the King in check")]
    LeavesKingInCheck { from: Square, to: Square },

    /// The game has already ended.
    #[error("game has already ended")]
    GameOver,
}

/// What went wrong with one entry of a replayed history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayFault {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("expected a {expected} on {square}, found a {found}")]
    PieceMismatch {
        square: Square,
        expected: PieceKind,
        found: PieceKind,
    },

    #[error("move does not reach the promotion rank")]
    UnexpectedPromotion,
}

/// Errors from [`GameState::replay`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// An entry did not parse or is not legal on the reconstructed board.
    /// No partial game is returned.
    #[error("malformed replay at move {index} ({notation}): {fault}")]
    MalformedReplay {
        index: usize,
        notation: String,
        #[source]
        fault: ReplayFault,
    },
}

/// Whether the game is still going.
///
/// Checkmate and Stalemate are terminal: once reached, no move is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    /// Returns true for Checkmate and Stalemate.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    history: Vec<Notation>,
    /// Plies played since the game started.
    turn_index: u32,
    /// Legal moves for `side_to_move` on `board`, recomputed after every move.
    legal: LegalMoveSet,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a game from an arbitrary position.
    ///
    /// The position may already be terminal.
    pub fn from_board(mut board: Board, side_to_move: Color) -> Self {
        let legal = legal_moves_for(&mut board, side_to_move);
        let status = classify(&board, &legal);
        GameState {
            board,
            side_to_move,
            history: Vec::new(),
            turn_index: 0,
            legal,
            status,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the moves played so far, oldest first.
    pub fn history(&self) -> &[Notation] {
        &self.history
    }

    /// Returns the number of plies played.
    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the legal moves for the side to move.
    pub fn legal_moves(&self) -> &LegalMoveSet {
        &self.legal
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        king_attacked(&self.board, &self.legal)
    }

    /// Checks a move without playing it.
    pub fn validate(&self, from: Square, to: Square) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let owned = self
            .board
            .piece_at(from)
            .is_some_and(|piece| piece.color == self.side_to_move);
        if !owned {
            return Err(MoveError::InvalidSelection { square: from });
        }

        let enemy_attacks = self.legal.attacked().by(self.side_to_move.opposite());
        if !moves_with_attacks(&self.board, from, Some(enemy_attacks)).contains(to) {
            return Err(MoveError::IllegalMove { from, to });
        }

        if !self.legal.contains(Move::new(from, to)) {
            return Err(MoveError::LeavesKingInCheck { from, to });
        }

        Ok(())
    }

    /// Plays a move, promoting to a Queen if a pawn reaches the far rank.
    pub fn play(&mut self, from: Square, to: Square) -> Result<GameStatus, MoveError> {
        self.play_with(from, to, &mut DefaultPromotion)
    }

    /// Plays a move, asking `chooser` for the piece if a pawn promotes.
    pub fn play_with<P>(
        &mut self,
        from: Square,
        to: Square,
        chooser: &mut P,
    ) -> Result<GameStatus, MoveError>
    where
        P: PromotionChooser + ?Sized,
    {
        self.validate(from, to)?;

        // `validate` has already seen a piece of ours on `from`.
        let applied = self
            .board
            .apply(from, to, chooser)
            .map_err(|e| match e {
                BoardError::NoPieceAt(square) => MoveError::InvalidSelection { square },
            })?;
        let notation = applied.notation();
        debug!(side = %self.side_to_move, %notation, "move applied");

        self.history.push(notation);
        self.turn_index += 1;
        self.side_to_move = self.side_to_move.opposite();
        self.legal = legal_moves_for(&mut self.board, self.side_to_move);
        self.status = classify(&self.board, &self.legal);

        if self.status.is_terminal() {
            debug!(status = ?self.status, turn = self.turn_index, "game over");
        }
        Ok(self.status)
    }

    /// Castles the side to move's King towards `side`.
    pub fn castle(&mut self, side: CastleSide) -> Result<GameStatus, MoveError> {
        let king = self
            .board
            .king_square(self.side_to_move)
            .ok_or(MoveError::GameOver)?;
        let to = king
            .offset(0, 2 * side.direction())
            .ok_or(MoveError::IllegalMove { from: king, to: king })?;
        self.play(king, to)
    }

    /// Plays one recorded move.
    pub fn play_notation(&mut self, notation: Notation) -> Result<GameStatus, ReplayFault> {
        match notation {
            Notation::Castle(side) => Ok(self.castle(side)?),
            Notation::Move {
                piece,
                from,
                to,
                promotion,
            } => {
                if let Some(found) = self.board.piece_at(from) {
                    if found.kind != piece {
                        return Err(ReplayFault::PieceMismatch {
                            square: from,
                            expected: piece,
                            found: found.kind,
                        });
                    }
                }
                let promotes = piece == PieceKind::Pawn
                    && to.rank_index() == self.side_to_move.promotion_rank();
                if promotion.is_some() && !promotes {
                    return Err(ReplayFault::UnexpectedPromotion);
                }
                let mut choice = FixedPromotion(promotion.unwrap_or_default());
                Ok(self.play_with(from, to, &mut choice)?)
            }
        }
    }

    /// Rebuilds a game by playing recorded moves from the starting position.
    ///
    /// Stops at the first entry that fails to parse or is not legal; nothing
    /// of the partial game is returned.
    pub fn replay<S: AsRef<str>>(notations: &[S]) -> Result<Self, ReplayError> {
        let mut game = GameState::new();
        debug!(moves = notations.len(), "replaying game");

        for (index, raw) in notations.iter().enumerate() {
            let raw = raw.as_ref();
            let malformed = |fault: ReplayFault| ReplayError::MalformedReplay {
                index,
                notation: raw.to_string(),
                fault,
            };
            let notation = Notation::parse(raw).map_err(|e| malformed(e.into()))?;
            game.play_notation(notation).map_err(malformed)?;
        }

        debug!(turn = game.turn_index, side = %game.side_to_move, "replay finished");
        Ok(game)
    }
}

fn king_attacked(board: &Board, legal: &LegalMoveSet) -> bool {
    let side = legal.side();
    board
        .king_square(side)
        .is_some_and(|king| legal.attacked().by(side.opposite()).contains(king))
}

/// Classifies the position from the legal move set of the side to move.
fn classify(board: &Board, legal: &LegalMoveSet) -> GameStatus {
    if !legal.is_empty() {
        GameStatus::InProgress
    } else if king_attacked(board, legal) {
        GameStatus::Checkmate {
            winner: legal.side().opposite(),
        }
    } else {
        GameStatus::Stalemate
    }
}
