use chess_common::{Board, File, PieceKind, Player, Square};

use super::can_land_on;

const NEIGHBOURS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The eight neighbouring squares followed by any castling destinations.
pub(super) struct KingMovesIterator {
    moves: std::vec::IntoIter<Square>,
}

impl KingMovesIterator {
    pub(super) fn new(board: &Board, from: Square, player: Player) -> Self {
        let mut moves = NEIGHBOURS
            .iter()
            .filter_map(|(row_step, col_step)| from.offset(*row_step, *col_step))
            .filter(|square| can_land_on(board, *square, player))
            .collect::<Vec<_>>();

        let back_row = player.back_row();
        if from.row() == back_row && from.col() == File::king_starting().as_index() {
            if let Some(target) = castle_target(
                board,
                player,
                back_row,
                &[File::f, File::g],
                File::h,
                File::castle_kingside_destination(),
            ) {
                moves.push(target);
            }
            if let Some(target) = castle_target(
                board,
                player,
                back_row,
                &[File::b, File::c, File::d],
                File::a,
                File::castle_queenside_destination(),
            ) {
                moves.push(target);
            }
        }

        Self {
            moves: moves.into_iter(),
        }
    }
}

/// Castling is decided from the layout alone: the files between king and
/// rook must be empty and the corner must hold a rook of the same player.
/// Whether either piece has moved before is not tracked.
fn castle_target(
    board: &Board,
    player: Player,
    back_row: usize,
    between: &[File],
    rook_file: File,
    destination: File,
) -> Option<Square> {
    let on_back_row = |file: File| Square::new(back_row as u8, file.as_index() as u8);

    for file in between {
        if !board.is_empty_at(on_back_row(*file)?) {
            return None;
        }
    }

    match board.at(on_back_row(rook_file)?) {
        Some(rook) if rook.kind() == PieceKind::Rook && rook.player() == player => {
            on_back_row(destination)
        }
        _ => None,
    }
}

impl Iterator for KingMovesIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.moves.next()
    }
}
