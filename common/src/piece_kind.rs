use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const fn as_char(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// The letter written in front of a move in algebraic notation. Pawn moves
    /// carry no letter.
    pub const fn notation_prefix(self) -> Option<char> {
        match self {
            Self::Pawn => None,
            _ => Some(self.as_char()),
        }
    }

    /// Parses the piece letters that may open an algebraic move. `P` is not
    /// accepted here since pawn moves are written without a prefix.
    pub const fn from_notation_prefix(ch: char) -> Option<PieceKind> {
        match ch {
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }
}
