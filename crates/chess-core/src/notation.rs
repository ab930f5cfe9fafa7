//! Long-algebraic move notation used for move history and saved games.
//!
//! A move is written as `<Piece><from>-<to>`, where the piece letter is one
//! of `N`, `B`, `R`, `Q`, `K` and is omitted for pawns (`Nb1-c3`, `e2-e4`).
//! A promoting pawn move carries the promotion letter at the end
//! (`e7-e8Q`). Castling is written `0-0` (kingside) or `0-0-0` (queenside).

use crate::{CastleSide, PieceKind, Promotion, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing squares or move notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty notation")]
    Empty,

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid notation: {0}")]
    InvalidFormat(String),

    #[error("only pawns can promote: {0}")]
    UnexpectedPromotion(String),
}

/// One recorded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// A regular move of the given piece kind.
    Move {
        piece: PieceKind,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    },
    /// A castling move.
    Castle(CastleSide),
}

impl Notation {
    /// Creates the notation for a non-castling move.
    pub const fn piece_move(piece: PieceKind, from: Square, to: Square) -> Self {
        Notation::Move {
            piece,
            from,
            to,
            promotion: None,
        }
    }

    /// Parses a notation string.
    pub fn parse(s: &str) -> Result<Self, NotationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NotationError::Empty);
        }

        match s {
            "0-0" | "O-O" => return Ok(Notation::Castle(CastleSide::Kingside)),
            "0-0-0" | "O-O-O" => return Ok(Notation::Castle(CastleSide::Queenside)),
            _ => {}
        }

        let invalid = || NotationError::InvalidFormat(s.to_string());

        let mut chars = s.chars();
        let first = chars.next().ok_or(NotationError::Empty)?;
        let (piece, rest) = match PieceKind::from_letter(first) {
            Some(kind) => (kind, chars.as_str()),
            None => (PieceKind::Pawn, s),
        };

        let from = rest.get(0..2).ok_or_else(invalid)?;
        if rest.get(2..3) != Some("-") {
            return Err(invalid());
        }
        let to = rest.get(3..5).ok_or_else(invalid)?;
        let from = from.parse::<Square>()?;
        let to = to.parse::<Square>()?;

        let promotion = match rest.get(5..) {
            None | Some("") => None,
            Some(suffix) => {
                let mut suffix_chars = suffix.chars();
                let promo = suffix_chars
                    .next()
                    .and_then(Promotion::from_char)
                    .ok_or_else(invalid)?;
                if suffix_chars.next().is_some() {
                    return Err(invalid());
                }
                if piece != PieceKind::Pawn {
                    return Err(NotationError::UnexpectedPromotion(s.to_string()));
                }
                Some(promo)
            }
        };

        Ok(Notation::Move {
            piece,
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Notation {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Notation::parse(s)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Castle(side) => write!(f, "{}", side.notation()),
            Notation::Move {
                piece,
                from,
                to,
                promotion,
            } => {
                if let Some(letter) = piece.letter() {
                    write!(f, "{}", letter)?;
                }
                write!(f, "{}-{}", from, to)?;
                if let Some(promo) = promotion {
                    write!(f, "{}", promo.letter())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn parse_pawn_move() {
        assert_eq!(
            Notation::parse("e2-e4"),
            Ok(Notation::piece_move(PieceKind::Pawn, sq("e2"), sq("e4")))
        );
    }

    #[test]
    fn parse_piece_move() {
        assert_eq!(
            Notation::parse("Nb1-c3"),
            Ok(Notation::piece_move(PieceKind::Knight, sq("b1"), sq("c3")))
        );
        assert_eq!(
            Notation::parse("Ke1-g1"),
            Ok(Notation::piece_move(PieceKind::King, sq("e1"), sq("g1")))
        );
    }

    #[test]
    fn parse_castling() {
        assert_eq!(
            Notation::parse("0-0"),
            Ok(Notation::Castle(CastleSide::Kingside))
        );
        assert_eq!(
            Notation::parse("0-0-0"),
            Ok(Notation::Castle(CastleSide::Queenside))
        );
        assert_eq!(
            Notation::parse("O-O"),
            Ok(Notation::Castle(CastleSide::Kingside))
        );
    }

    #[test]
    fn parse_promotion() {
        assert_eq!(
            Notation::parse("e7-e8N"),
            Ok(Notation::Move {
                piece: PieceKind::Pawn,
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(Promotion::Knight),
            })
        );
        assert_eq!(
            Notation::parse("Qd1-d8Q"),
            Err(NotationError::UnexpectedPromotion("Qd1-d8Q".to_string()))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Notation::parse(""), Err(NotationError::Empty));
        assert_eq!(Notation::parse("   "), Err(NotationError::Empty));
        assert!(matches!(
            Notation::parse("e2e4"),
            Err(NotationError::InvalidFormat(_))
        ));
        assert!(matches!(
            Notation::parse("e2-e"),
            Err(NotationError::InvalidFormat(_))
        ));
        assert!(matches!(
            Notation::parse("e2-e4QQ"),
            Err(NotationError::InvalidFormat(_))
        ));
        assert!(matches!(
            Notation::parse("e2-e4X"),
            Err(NotationError::InvalidFormat(_))
        ));
        assert_eq!(
            Notation::parse("e9-e4"),
            Err(NotationError::InvalidSquare("e9".to_string()))
        );
        assert!(Notation::parse("Xe2-e4").is_err());
        assert!(Notation::parse("é2-e4").is_err());
    }

    #[test]
    fn display_matches_format() {
        assert_eq!(
            Notation::piece_move(PieceKind::Knight, sq("b1"), sq("c3")).to_string(),
            "Nb1-c3"
        );
        assert_eq!(
            Notation::piece_move(PieceKind::Pawn, sq("e2"), sq("e4")).to_string(),
            "e2-e4"
        );
        assert_eq!(Notation::Castle(CastleSide::Kingside).to_string(), "0-0");
        assert_eq!(Notation::Castle(CastleSide::Queenside).to_string(), "0-0-0");
        let promo = Notation::Move {
            piece: PieceKind::Pawn,
            from: sq("b2"),
            to: sq("b1"),
            promotion: Some(Promotion::Rook),
        };
        assert_eq!(promo.to_string(), "b2-b1R");
    }

    fn any_square() -> impl Strategy<Value = Square> {
        (0u8..64).prop_map(|i| Square::from_index(i).unwrap())
    }

    fn any_notation() -> impl Strategy<Value = Notation> {
        let kind = prop::sample::select(PieceKind::ALL.to_vec());
        let promo = prop::option::of(prop::sample::select(Promotion::ALL.to_vec()));
        prop_oneof![
            Just(Notation::Castle(CastleSide::Kingside)),
            Just(Notation::Castle(CastleSide::Queenside)),
            (kind, any_square(), any_square(), promo).prop_map(|(piece, from, to, promotion)| {
                let promotion = if piece == PieceKind::Pawn { promotion } else { None };
                Notation::Move {
                    piece,
                    from,
                    to,
                    promotion,
                }
            }),
        ]
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(notation in any_notation()) {
            prop_assert_eq!(Notation::parse(&notation.to_string()), Ok(notation));
        }
    }
}
