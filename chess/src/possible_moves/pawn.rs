use chess_common::{Board, Player, Square};

/// Forward steps first, then diagonal captures to the left and right.
///
/// En passant is not produced here: the square a pawn captures onto is empty,
/// so the resolver and the session recognise that case themselves.
pub(super) struct PawnMovesIterator {
    moves: std::vec::IntoIter<Square>,
}

impl PawnMovesIterator {
    pub(super) fn new(board: &Board, from: Square, player: Player) -> Self {
        let forward = player.forward();
        let mut moves = Vec::with_capacity(4);

        if let Some(one_step) = from.offset(forward, 0) {
            if board.is_empty_at(one_step) {
                moves.push(one_step);

                if from.row() == player.pawn_row() {
                    if let Some(two_step) = from.offset(2 * forward, 0) {
                        if board.is_empty_at(two_step) {
                            moves.push(two_step);
                        }
                    }
                }
            }
        }

        for col_step in [-1, 1] {
            let Some(target) = from.offset(forward, col_step) else {
                continue;
            };
            if let Some(piece) = board.at(target) {
                if piece.player() != player {
                    moves.push(target);
                }
            }
        }

        Self {
            moves: moves.into_iter(),
        }
    }
}

impl Iterator for PawnMovesIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.moves.next()
    }
}
