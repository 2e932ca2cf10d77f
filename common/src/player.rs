use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const fn as_char(self) -> char {
        match self {
            Player::Black => 'B',
            Player::White => 'W',
        }
    }

    pub const fn other_player(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// The row this player's king and rooks start on.
    pub const fn back_row(self) -> usize {
        match self {
            Player::White => 7,
            Player::Black => 0,
        }
    }

    /// The row this player's pawns start on.
    pub const fn pawn_row(self) -> usize {
        match self {
            Player::White => 6,
            Player::Black => 1,
        }
    }

    /// Row step of a pawn advance: white moves toward row 0, black toward
    /// row 7.
    pub const fn forward(self) -> i8 {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }
}
