use chess_common::{Board, Player, Square};

use super::can_land_on;

/// A direction a slider can travel in, as a `(row, col)` step.
pub(crate) trait Direction: Copy {
    fn step(&self) -> (i8, i8);
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum StraightDirection {
    Right,
    Left,
    Down,
    Up,
}

impl StraightDirection {
    pub(crate) fn all() -> [StraightDirection; 4] {
        [Self::Right, Self::Left, Self::Down, Self::Up]
    }
}

impl Direction for StraightDirection {
    fn step(&self) -> (i8, i8) {
        match self {
            StraightDirection::Right => (0, 1),
            StraightDirection::Left => (0, -1),
            StraightDirection::Down => (1, 0),
            StraightDirection::Up => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum DiagonalDirection {
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl DiagonalDirection {
    pub(crate) fn all() -> [DiagonalDirection; 4] {
        [Self::DownRight, Self::DownLeft, Self::UpRight, Self::UpLeft]
    }
}

impl Direction for DiagonalDirection {
    fn step(&self) -> (i8, i8) {
        match self {
            DiagonalDirection::DownRight => (1, 1),
            DiagonalDirection::DownLeft => (1, -1),
            DiagonalDirection::UpRight => (-1, 1),
            DiagonalDirection::UpLeft => (-1, -1),
        }
    }
}

/// Walks each ray in turn until it leaves the board, hits an own piece, or
/// lands on an enemy piece (which is included).
pub(crate) struct SlidingMovesIterator<'board, D: Direction, const N: usize> {
    board: &'board Board,
    player: Player,
    original: Square,
    previous: Square,
    directions_to_check: std::array::IntoIter<D, N>,
    current_direction: Option<D>,
}

impl<'board, D: Direction, const N: usize> SlidingMovesIterator<'board, D, N> {
    pub(crate) fn new(board: &'board Board, from: Square, player: Player, directions: [D; N]) -> Self {
        let mut directions_to_check = directions.into_iter();
        let current_direction = directions_to_check.next();
        Self {
            board,
            player,
            original: from,
            previous: from,
            directions_to_check,
            current_direction,
        }
    }

    fn next_direction(&mut self) {
        self.current_direction = self.directions_to_check.next();
        self.previous = self.original;
    }
}

impl<'board, D: Direction, const N: usize> Iterator for SlidingMovesIterator<'board, D, N> {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(direction) = self.current_direction {
            let (row_step, col_step) = direction.step();
            let Some(square) = self.previous.offset(row_step, col_step) else {
                self.next_direction();
                continue;
            };

            match self.board.at(square) {
                None => {
                    self.previous = square;
                    return Some(square);
                }
                Some(_) => {
                    self.next_direction();
                    if can_land_on(self.board, square, self.player) {
                        return Some(square);
                    }
                }
            }
        }
        None
    }
}
