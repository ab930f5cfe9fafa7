//! Promotion piece selection.
//!
//! When a pawn reaches the far rank, [`Board::apply`](crate::Board::apply)
//! asks a [`PromotionChooser`] which piece replaces it. Interactive front ends
//! prompt the player; everything else uses [`DefaultPromotion`].

use chess_core::{Color, Promotion};

/// Chooses the piece a pawn promotes to.
///
/// Called synchronously, once, while the promoting move is being applied.
pub trait PromotionChooser {
    /// Returns the promotion piece for a pawn of the given color.
    fn choose_promotion(&mut self, color: Color) -> Promotion;
}

/// Always promotes to a Queen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPromotion;

impl PromotionChooser for DefaultPromotion {
    fn choose_promotion(&mut self, _color: Color) -> Promotion {
        Promotion::Queen
    }
}

/// A fixed choice, used when replaying recorded moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedPromotion(pub Promotion);

impl PromotionChooser for FixedPromotion {
    fn choose_promotion(&mut self, _color: Color) -> Promotion {
        self.0
    }
}

impl<F> PromotionChooser for F
where
    F: FnMut(Color) -> Promotion,
{
    fn choose_promotion(&mut self, color: Color) -> Promotion {
        self(color)
    }
}
