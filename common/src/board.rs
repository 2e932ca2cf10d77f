use std::{
    fmt::{Debug, Display},
    ops::{Index, IndexMut},
};

use serde_derive::Serialize;

use crate::{Piece, PieceKind, Player, Square};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid of optional pieces indexed `[row][col]`.
///
/// The board enforces nothing beyond one piece per square. Positions with
/// missing kings or otherwise illegal layouts are representable, which replay
/// relies on while it is part way through a game.
#[derive(Clone, Eq, PartialEq, Serialize)]
pub struct Board {
    pieces: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// A board with no pieces on it.
    pub const fn empty() -> Self {
        Self {
            pieces: [[None; 8]; 8],
        }
    }

    /// The standard starting layout.
    pub const fn initial() -> Self {
        let mut pieces = [[None; 8]; 8];
        let mut col = 0;
        while col < 8 {
            pieces[0][col] = Some(Piece::new(Player::Black, BACK_ROW[col]));
            pieces[1][col] = Some(Piece::BLACK_PAWN);
            pieces[6][col] = Some(Piece::WHITE_PAWN);
            pieces[7][col] = Some(Piece::new(Player::White, BACK_ROW[col]));
            col += 1;
        }
        Self { pieces }
    }

    pub fn at(&self, square: Square) -> Option<Piece> {
        self.pieces[square.row()][square.col()]
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.at(square).is_none()
    }

    /// Places `piece` on `square`, returning whatever stood there before.
    pub fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.pieces[square.row()][square.col()].replace(piece)
    }

    /// Clears `square`, returning the piece that stood there.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.pieces[square.row()][square.col()].take()
    }

    /// Every occupied square with its piece, in board-scan order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all_squares().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// The board turned 180 degrees with every piece handed to the other
    /// player.
    pub fn rotated(&self) -> Board {
        let mut result = Board::empty();
        for (square, piece) in self.pieces() {
            result.put(square.rotated(), piece.swap_player());
        }
        result
    }

    /// Rows as rendered in FEN piece placement, e.g.
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
    pub fn to_fen_placement(&self) -> String {
        let mut result = String::with_capacity(64);
        for (row_index, row) in self.pieces.iter().enumerate() {
            if row_index != 0 {
                result.push('/');
            }

            let mut empty_run = 0;
            for square in row {
                match square {
                    None => empty_run += 1,
                    Some(piece) => {
                        if empty_run != 0 {
                            result.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        result.push(piece.to_fen());
                    }
                }
            }
            if empty_run != 0 {
                result.push_str(&empty_run.to_string());
            }
        }
        result
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.pieces[index.row()][index.col()]
    }
}

impl IndexMut<Square> for Board {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.pieces[index.row()][index.col()]
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board({})", self.to_fen_placement())
    }
}

/// Renders the board from white's side with rank and file labels. Empty
/// squares are drawn as `.`.
impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row_index, row) in self.pieces.iter().enumerate() {
            write!(f, "{} ", 8 - row_index)?;
            for square in row {
                let ch = square.map(|piece| piece.to_fen()).unwrap_or('.');
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for file in crate::File::all_files_ascending() {
            write!(f, " {}", file.as_char())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Board, Piece, PieceKind, Player, Square};

    #[test]
    fn initial_layout() {
        let board = Board::initial();
        assert_eq!(
            board.to_fen_placement(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(
            board.at(Square::new(7, 4).unwrap()),
            Some(Piece::new(Player::White, PieceKind::King))
        );
        assert_eq!(
            board.at(Square::new(0, 3).unwrap()),
            Some(Piece::new(Player::Black, PieceKind::Queen))
        );
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board, Board::default());
    }

    #[test]
    fn rotation_swaps_queen_and_king_files() {
        let rotated = Board::initial().rotated();
        assert_eq!(
            rotated.to_fen_placement(),
            "rnbkqbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBKQBNR"
        );
        assert_eq!(rotated.rotated(), Board::initial());
    }

    #[test]
    fn put_and_take_report_previous_occupant() {
        let mut board = Board::empty();
        let e4 = "e4".parse::<Square>().unwrap();
        assert_eq!(board.put(e4, Piece::WHITE_PAWN), None);
        assert_eq!(board.put(e4, Piece::BLACK_PAWN), Some(Piece::WHITE_PAWN));
        assert_eq!(board.take(e4), Some(Piece::BLACK_PAWN));
        assert!(board.is_empty_at(e4));
        assert_eq!(board.to_fen_placement(), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn display_draws_white_at_the_bottom() {
        let rendered = Board::initial().to_string();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
