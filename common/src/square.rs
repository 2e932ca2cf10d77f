use std::{
    error::Error,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Serialize, Serializer};

use crate::{file::File, rank::Rank};

/// A `(row, col)` coordinate on the board array. Row 0 is the black back
/// rank, row 7 the white back rank, col 0 the a-file.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Returns `None` when either coordinate falls outside `0..8`.
    pub const fn new(row: u8, col: u8) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    pub const fn from_file_rank(file: File, rank: Rank) -> Square {
        Square {
            row: rank.as_row() as u8,
            col: file.as_index() as u8,
        }
    }

    /// Every square in board-scan order: row 0 first, columns ascending
    /// within a row.
    pub fn all_squares() -> impl Iterator<Item = Square> {
        (0_u8..8).flat_map(|row| (0_u8..8).map(move |col| Square { row, col }))
    }

    pub const fn row(&self) -> usize {
        self.row as usize
    }

    pub const fn col(&self) -> usize {
        self.col as usize
    }

    pub fn file(&self) -> File {
        File::try_from(self.col).expect("col is always in 0..8")
    }

    pub fn rank(&self) -> Rank {
        Rank::from_row(self.row()).expect("row is always in 0..8")
    }

    /// The square `row_offset` rows and `col_offset` columns away, if it is
    /// still on the board.
    pub fn offset(&self, row_offset: i8, col_offset: i8) -> Option<Square> {
        let row = self.row as i8 + row_offset;
        let col = self.col as i8 + col_offset;
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return None;
        }

        Square::new(row as u8, col as u8)
    }

    /// The same square seen from the other side of the board.
    pub const fn rotated(&self) -> Square {
        Square {
            row: 7 - self.row,
            col: 7 - self.col,
        }
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct SquareErr {
    input: String,
}

impl Display for SquareErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not a square. Expected a file a-h followed by a rank 1-8",
            self.input
        )
    }
}

impl Error for SquareErr {}

impl FromStr for Square {
    type Err = SquareErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SquareErr {
            input: s.to_string(),
        };

        let mut chars = s.chars();
        let file = chars.next().ok_or_else(err)?;
        let rank = chars.next().ok_or_else(err)?;
        if chars.next().is_some() {
            return Err(err());
        }

        let file = File::try_from(file).map_err(|_| err())?;
        let rank = Rank::try_from(rank).map_err(|_| err())?;
        Ok(Square::from_file_rank(file, rank))
    }
}

#[cfg(test)]
mod tests {
    use crate::{File, Rank, Square};

    #[test]
    fn algebraic_names_follow_board_array_convention() {
        let e2 = Square::new(6, 4).unwrap();
        assert_eq!(e2.to_string(), "e2");
        assert_eq!(e2.file(), File::e);
        assert_eq!(e2.rank(), Rank::Two);
        assert_eq!("a8".parse::<Square>().unwrap(), Square::new(0, 0).unwrap());
        assert_eq!("h1".parse::<Square>().unwrap(), Square::new(7, 7).unwrap());
        assert_eq!(Square::from_file_rank(File::d, Rank::Five), Square::new(3, 3).unwrap());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn offsets_stay_on_the_board() {
        let a1 = Square::new(7, 0).unwrap();
        assert_eq!(a1.offset(-1, 1), Square::new(6, 1));
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.rotated(), Square::new(0, 7).unwrap());
    }

    #[test]
    fn scan_order_is_row_major() {
        let squares = Square::all_squares().collect::<Vec<_>>();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::new(0, 0).unwrap());
        assert_eq!(squares[1], Square::new(0, 1).unwrap());
        assert_eq!(squares[8], Square::new(1, 0).unwrap());
        assert_eq!(squares[63], Square::new(7, 7).unwrap());
    }
}
