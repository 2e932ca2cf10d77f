use chess_common::{Board, Player, Square};

use super::can_land_on;

#[derive(Debug, Clone, Copy)]
enum KnightDirection {
    Downx2Right,
    Downx2Left,
    Upx2Right,
    Upx2Left,
    DownRightx2,
    DownLeftx2,
    UpRightx2,
    UpLeftx2,
}

impl KnightDirection {
    fn step(&self) -> (i8, i8) {
        match self {
            KnightDirection::Downx2Right => (2, 1),
            KnightDirection::Downx2Left => (2, -1),
            KnightDirection::Upx2Right => (-2, 1),
            KnightDirection::Upx2Left => (-2, -1),
            KnightDirection::DownRightx2 => (1, 2),
            KnightDirection::DownLeftx2 => (1, -2),
            KnightDirection::UpRightx2 => (-1, 2),
            KnightDirection::UpLeftx2 => (-1, -2),
        }
    }
}

pub(super) struct KnightMovesIterator<'board> {
    board: &'board Board,
    player: Player,
    original: Square,
    directions_to_check: std::array::IntoIter<KnightDirection, 8>,
}

impl<'board> KnightMovesIterator<'board> {
    pub(super) fn new(board: &'board Board, from: Square, player: Player) -> Self {
        Self {
            board,
            player,
            original: from,
            directions_to_check: [
                KnightDirection::Downx2Right,
                KnightDirection::Downx2Left,
                KnightDirection::Upx2Right,
                KnightDirection::Upx2Left,
                KnightDirection::DownRightx2,
                KnightDirection::DownLeftx2,
                KnightDirection::UpRightx2,
                KnightDirection::UpLeftx2,
            ]
            .into_iter(),
        }
    }
}

impl<'board> Iterator for KnightMovesIterator<'board> {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        for direction in self.directions_to_check.by_ref() {
            let (row_step, col_step) = direction.step();
            if let Some(square) = self.original.offset(row_step, col_step) {
                if can_land_on(self.board, square, self.player) {
                    return Some(square);
                }
            }
        }
        None
    }
}
