use serde::{Serialize, Serializer};

/// A board rank as printed in algebraic notation. Rank eight is row 0 of the
/// board array and rank one is row 7.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Rank {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
}

impl Rank {
    pub fn all_ranks_ascending() -> impl DoubleEndedIterator<Item = Rank> {
        [
            Self::One,
            Self::Two,
            Self::Three,
            Self::Four,
            Self::Five,
            Self::Six,
            Self::Seven,
            Self::Eight,
        ]
        .into_iter()
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
        }
    }

    pub const fn as_int(self) -> i8 {
        self as i8
    }

    /// The row this rank occupies in the board array.
    pub const fn as_row(self) -> usize {
        8 - self as usize
    }

    /// Inverse of [`Rank::as_row`].
    pub const fn from_row(row: usize) -> Option<Rank> {
        match row {
            0 => Some(Self::Eight),
            1 => Some(Self::Seven),
            2 => Some(Self::Six),
            3 => Some(Self::Five),
            4 => Some(Self::Four),
            5 => Some(Self::Three),
            6 => Some(Self::Two),
            7 => Some(Self::One),
            _ => None,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1' => Ok(Rank::One),
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            _ => Err(()),
        }
    }
}

impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i8(self.as_int())
    }
}
