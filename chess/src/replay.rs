use chess_common::{Board, File, PieceKind, Player, Square};
use serde_derive::Serialize;

use crate::{BoardMove, Move};

/// A board together with the player whose turn it is.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Position {
    board: Board,
    player_to_move: Player,
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl Position {
    pub fn new(board: Board, player_to_move: Player) -> Self {
        Self {
            board,
            player_to_move,
        }
    }

    /// The standard starting layout with white to move.
    pub fn initial() -> Self {
        Self::new(Board::initial(), Player::White)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player_to_move(&self) -> Player {
        self.player_to_move
    }

    /// Applies `move_` and hands the turn to the other player.
    pub fn play(&mut self, move_: &BoardMove) {
        apply_move(&mut self.board, move_);
        self.player_to_move = self.player_to_move.other_player();
    }
}

/// Applies a single move to `board`.
///
/// Three cases are told apart:
/// 1. a king moving two files castles, so the corner rook jumps over it,
/// 2. a pawn that captures onto an empty square takes en passant, removing
///    the pawn directly behind the destination,
/// 3. anything else vacates `from` and puts the piece on `to`.
///
/// The piece written to `to` is `move_.piece`, whatever stood on `from`.
pub fn apply_move(board: &mut Board, move_: &BoardMove) {
    let BoardMove {
        from,
        to,
        piece,
        captured,
    } = *move_;

    if move_.is_castle() {
        let (rook_file, rook_destination) = if to.col() > from.col() {
            (File::h, File::f)
        } else {
            (File::a, File::d)
        };
        board.take(from);
        board.put(to, piece);

        let row = from.row() as u8;
        let rook_from = Square::new(row, rook_file.as_index() as u8);
        let rook_to = Square::new(row, rook_destination.as_index() as u8);
        if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
            if let Some(rook) = board.take(rook_from) {
                board.put(rook_to, rook);
            }
        }
        return;
    }

    if piece.kind() == PieceKind::Pawn && captured.is_some() && board.is_empty_at(to) {
        board.take(from);
        board.put(to, piece);
        if let Some(behind) = to.offset(-piece.player().forward(), 0) {
            board.take(behind);
        }
        return;
    }

    board.take(from);
    board.put(to, piece);
}

/// Replays `moves` from the standard starting layout. White is assumed to
/// move first.
pub fn replay<'a, I>(initial: &Board, moves: I) -> Position
where
    I: IntoIterator<Item = &'a Move>,
{
    replay_from(&Position::new(initial.clone(), Player::White), moves)
}

/// Replays `moves` in order from `start`. The side to move flips after every
/// move.
pub fn replay_from<'a, I>(start: &Position, moves: I) -> Position
where
    I: IntoIterator<Item = &'a Move>,
{
    let mut position = start.clone();
    for move_ in moves {
        position.play(move_.board_move());
    }
    position
}
