use chess_common::{Board, Piece, Square};

/// Short algebraic notation for a move made on the board.
///
/// Pawns are written by destination (`e4`), or origin file and destination
/// when capturing (`exd5`). Other pieces get their letter, an `x` for a
/// capture and the destination (`Nf3`, `Bxc6`). No disambiguation, check
/// marker or castling form is ever produced, so a king moving two files is
/// written `Kg1`.
pub fn algebraic_notation(
    _board_before: &Board,
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
) -> String {
    let mut result = String::with_capacity(5);
    match piece.kind().notation_prefix() {
        None => {
            if captured.is_some() {
                result.push(from.file().as_char());
                result.push('x');
            }
        }
        Some(prefix) => {
            result.push(prefix);
            if captured.is_some() {
                result.push('x');
            }
        }
    }
    result.push_str(&to.to_string());
    result
}
