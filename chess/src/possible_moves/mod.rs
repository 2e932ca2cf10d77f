//! Pseudo-legal destinations for a single piece. Nothing here looks at
//! whether the mover's own king ends up attacked, and castling only checks
//! that the squares between king and rook are empty.

mod king;
mod knight;
mod pawn;
mod sliding;

use chess_common::{Board, Piece, PieceKind, Player, Square};

use king::KingMovesIterator;
use knight::KnightMovesIterator;
use pawn::PawnMovesIterator;
use sliding::{DiagonalDirection, SlidingMovesIterator, StraightDirection};

/// Every square `piece` standing on `from` could move to on `board`.
///
/// The result is a pure function of its inputs. The piece does not need to
/// actually be on `from`.
pub fn possible_moves(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    let player = piece.player();
    match piece.kind() {
        PieceKind::Pawn => PawnMovesIterator::new(board, from, player).collect(),
        PieceKind::Knight => KnightMovesIterator::new(board, from, player).collect(),
        PieceKind::Bishop => {
            SlidingMovesIterator::new(board, from, player, DiagonalDirection::all()).collect()
        }
        PieceKind::Rook => {
            SlidingMovesIterator::new(board, from, player, StraightDirection::all()).collect()
        }
        PieceKind::Queen => {
            let mut result: Vec<Square> =
                SlidingMovesIterator::new(board, from, player, StraightDirection::all()).collect();
            result.extend(SlidingMovesIterator::new(
                board,
                from,
                player,
                DiagonalDirection::all(),
            ));
            result
        }
        PieceKind::King => KingMovesIterator::new(board, from, player).collect(),
    }
}

/// A square a piece of `player` may land on: empty or held by the opponent.
fn can_land_on(board: &Board, square: Square, player: Player) -> bool {
    match board.at(square) {
        None => true,
        Some(piece) => piece.player() != player,
    }
}
