//! Move selection for each side.

use crate::config::PlayerKind;
use chess_core::Move;
use chess_rules::LegalMoveSet;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Picks a uniformly random legal move.
///
/// The random source is owned by the player, so a seeded player replays the
/// same game every time.
#[derive(Debug, Clone)]
pub struct RandomPlayer<R = StdRng> {
    rng: R,
}

impl RandomPlayer<StdRng> {
    /// Creates a player seeded from `seed`, or from the OS if `None`.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        RandomPlayer { rng }
    }
}

impl<R: Rng> RandomPlayer<R> {
    pub fn new(rng: R) -> Self {
        RandomPlayer { rng }
    }

    /// Returns a legal move, or `None` if there are none.
    pub fn pick(&mut self, legal: &LegalMoveSet) -> Option<Move> {
        legal.moves().choose(&mut self.rng).copied()
    }
}

/// One side of the board.
#[derive(Debug, Clone)]
pub enum Player {
    /// Moves come from the prompt.
    Human,
    Random(RandomPlayer),
}

impl Player {
    /// Builds a player of the given kind. Random players get `seed` if set.
    pub fn from_kind(kind: PlayerKind, seed: Option<u64>) -> Self {
        match kind {
            PlayerKind::Human => Player::Human,
            PlayerKind::Random => Player::Random(RandomPlayer::seeded(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::GameState;

    #[test]
    fn picks_only_legal_moves() {
        let game = GameState::new();
        let mut player = RandomPlayer::seeded(Some(7));
        for _ in 0..50 {
            let m = player.pick(game.legal_moves()).unwrap();
            assert!(game.legal_moves().contains(m));
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let game = GameState::new();
        let mut a = RandomPlayer::new(StdRng::seed_from_u64(99));
        let mut b = RandomPlayer::new(StdRng::seed_from_u64(99));
        let picks_a: Vec<_> = (0..10).map(|_| a.pick(game.legal_moves())).collect();
        let picks_b: Vec<_> = (0..10).map(|_| b.pick(game.legal_moves())).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn no_moves_no_pick() {
        let mut game = GameState::new();
        let sq = |s| chess_core::Square::from_algebraic(s).unwrap();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.play(sq(from), sq(to)).unwrap();
        }
        let mut player = RandomPlayer::seeded(Some(1));
        assert_eq!(player.pick(game.legal_moves()), None);
    }

    #[test]
    fn from_kind() {
        assert!(matches!(Player::from_kind(PlayerKind::Human, None), Player::Human));
        assert!(matches!(
            Player::from_kind(PlayerKind::Random, Some(3)),
            Player::Random(_)
        ));
    }
}
