use serde_derive::Serialize;

/// A board column. `File::a` is column 0 of the board array.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum File {
    a = 0,
    b = 1,
    c = 2,
    d = 3,
    e = 4,
    f = 5,
    g = 6,
    h = 7,
}

impl File {
    pub fn all_files_ascending() -> impl DoubleEndedIterator<Item = File> {
        [
            Self::a,
            Self::b,
            Self::c,
            Self::d,
            Self::e,
            Self::f,
            Self::g,
            Self::h,
        ]
        .into_iter()
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::a => 'a',
            Self::b => 'b',
            Self::c => 'c',
            Self::d => 'd',
            Self::e => 'e',
            Self::f => 'f',
            Self::g => 'g',
            Self::h => 'h',
        }
    }

    /// The column this file occupies in the board array.
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// The file the king starts on for both players.
    pub const fn king_starting() -> File {
        File::e
    }

    pub const fn castle_kingside_destination() -> File {
        File::g
    }

    pub const fn castle_queenside_destination() -> File {
        File::c
    }
}

impl TryFrom<u8> for File {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(File::a),
            1 => Ok(File::b),
            2 => Ok(File::c),
            3 => Ok(File::d),
            4 => Ok(File::e),
            5 => Ok(File::f),
            6 => Ok(File::g),
            7 => Ok(File::h),
            _ => Err(()),
        }
    }
}

impl TryFrom<char> for File {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a' => Ok(File::a),
            'b' => Ok(File::b),
            'c' => Ok(File::c),
            'd' => Ok(File::d),
            'e' => Ok(File::e),
            'f' => Ok(File::f),
            'g' => Ok(File::g),
            'h' => Ok(File::h),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::File;

    #[test]
    fn char_and_index_agree() {
        for (i, file) in File::all_files_ascending().enumerate() {
            assert_eq!(file.as_index(), i);
            assert_eq!(File::try_from(file.as_char()), Ok(file));
            assert_eq!(File::try_from(i as u8), Ok(file));
        }
        assert!(File::try_from('i').is_err());
        assert!(File::try_from(8_u8).is_err());
    }
}
