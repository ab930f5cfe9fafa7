//! Terminal board rendering.

use chess_core::Square;
use chess_rules::Board;

/// Renders the board with rank 8 at the top, rank digits on the left and
/// file letters underneath. Empty squares are drawn as `.`.
pub fn render(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        let cells: Vec<String> = (0..8u8)
            .map(|file| {
                Square::from_coords(rank, file)
                    .and_then(|sq| board.piece_at(sq))
                    .map_or('.', |piece| piece.glyph())
                    .to_string()
            })
            .collect();
        out.push_str(&format!("{}  {}\n", rank + 1, cells.join(" ")));
    }
    out.push_str("   a b c d e f g h\n");
    out
}
