use chess_common::{Piece, PieceKind, Square};
use serde_derive::Serialize;

/// The board-level effect of a move: where a piece goes and what, if
/// anything, it removes.
///
/// For en passant `captured` is the pawn taken from beside the destination,
/// not the (empty) destination square itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BoardMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl BoardMove {
    pub fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
        }
    }

    pub fn is_castle(&self) -> bool {
        self.piece.kind() == PieceKind::King
            && self.from.col().abs_diff(self.to.col()) == 2
    }
}

/// A move as recorded in a game: its board effect plus how it was written
/// and where it sits in the move list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Move {
    #[serde(flatten)]
    board_move: BoardMove,
    notation: String,
    move_number: usize,
}

impl Move {
    pub fn new(board_move: BoardMove, notation: String, move_number: usize) -> Self {
        Self {
            board_move,
            notation,
            move_number,
        }
    }

    pub fn board_move(&self) -> &BoardMove {
        &self.board_move
    }

    pub fn from(&self) -> Square {
        self.board_move.from
    }

    pub fn to(&self) -> Square {
        self.board_move.to
    }

    pub fn piece(&self) -> Piece {
        self.board_move.piece
    }

    pub fn captured(&self) -> Option<Piece> {
        self.board_move.captured
    }

    /// The move as written. For moves read from PGN this is the source
    /// token, annotations included.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// 1-based position in the game's move list, counting both players.
    /// Skipped PGN tokens leave no gap, so this can run behind the token
    /// position kept in [`crate::Diagnostic::ply`].
    pub fn move_number(&self) -> usize {
        self.move_number
    }
}

#[cfg(test)]
mod tests {
    use chess_common::{Piece, PieceKind, Player, Square};

    use super::BoardMove;

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn only_two_file_king_moves_castle() {
        let king = Piece::new(Player::White, PieceKind::King);
        assert!(BoardMove::new(square("e1"), square("g1"), king, None).is_castle());
        assert!(BoardMove::new(square("e1"), square("c1"), king, None).is_castle());
        assert!(!BoardMove::new(square("e1"), square("f1"), king, None).is_castle());

        let rook = Piece::new(Player::White, PieceKind::Rook);
        assert!(!BoardMove::new(square("a1"), square("c1"), rook, None).is_castle());
    }
}
