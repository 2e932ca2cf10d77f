use std::{
    error::Error,
    fmt::{Debug, Display},
};

use chess_common::{File, PieceKind, Rank, Square};

/// Parses a single algebraic chess notation token into the pieces of
/// information needed to find the move on a board.
pub fn parse_algebraic_notation(move_: &str) -> Result<PieceMove, AcnErr> {
    ACNParser::parse(move_)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PieceMove {
    CastleKingside,
    CastleQueenside,
    Normal(NormalMove),
}

#[derive(Clone, Eq, PartialEq)]
pub struct NormalMove {
    /// The piece being moved
    pub piece_kind: PieceKind,
    /// The destination square of the move
    pub destination: Square,
    /// The file from which the piece is moving (only given if necessary for disambiguation)
    pub disambiguation_file: Option<File>,
    /// The rank from which the piece is moving (only given if necessary for disambiguation)
    pub disambiguation_rank: Option<Rank>,
    pub is_capture: bool,
}

impl Debug for NormalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for NormalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::with_capacity(6);
        if let Some(prefix) = self.piece_kind.notation_prefix() {
            result.push(prefix);
        }

        if let Some(disambiguation_file) = self.disambiguation_file {
            result.push(disambiguation_file.as_char());
        }

        if let Some(disambiguation_rank) = self.disambiguation_rank {
            result.push(disambiguation_rank.as_char());
        }

        if self.is_capture {
            result.push('x');
        }

        result.push_str(&self.destination.to_string());
        f.write_str(&result)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AcnErr {
    /// Nothing left once annotation characters were removed.
    Empty,
    /// The token does not end in a square such as `e4`.
    MissingDestination,
    /// A pawn capture whose origin file before the `x` is not a file letter.
    InvalidCaptureFile(char),
}

impl Display for AcnErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcnErr::Empty => write!(f, "empty move"),
            AcnErr::MissingDestination => write!(f, "no destination square"),
            AcnErr::InvalidCaptureFile(ch) => {
                write!(f, "'{ch}' is not a file a pawn can capture from")
            }
        }
    }
}

impl Error for AcnErr {}

const ANNOTATION_CHARS: [char; 4] = ['+', '#', '!', '?'];

pub(crate) struct ACNParser;
impl ACNParser {
    fn parse(source: &str) -> Result<PieceMove, AcnErr> {
        let cleaned = source.trim().trim_end_matches(&ANNOTATION_CHARS[..]);

        match cleaned {
            "O-O" | "0-0" => return Ok(PieceMove::CastleKingside),
            "O-O-O" | "0-0-0" => return Ok(PieceMove::CastleQueenside),
            "" => return Err(AcnErr::Empty),
            _ => {}
        }

        let mut chars = cleaned.chars().collect::<Vec<_>>();
        let piece_kind = match PieceKind::from_notation_prefix(chars[0]) {
            Some(kind) => {
                // consume it!
                chars.remove(0);
                kind
            }
            None => PieceKind::Pawn,
        };

        if chars.len() < 2 {
            return Err(AcnErr::MissingDestination);
        }
        let (before_destination, destination) = chars.split_at(chars.len() - 2);
        let destination = match (
            File::try_from(destination[0]),
            Rank::try_from(destination[1]),
        ) {
            (Ok(file), Ok(rank)) => Square::from_file_rank(file, rank),
            _ => return Err(AcnErr::MissingDestination),
        };

        let capture_index = before_destination.iter().position(|ch| *ch == 'x');
        let is_capture = capture_index.is_some();

        // Only what comes ahead of the capture marker can disambiguate.
        let disambiguation = match capture_index {
            Some(index) => &before_destination[..index],
            None => before_destination,
        };

        let mut disambiguation_file = None;
        let mut disambiguation_rank = None;
        for ch in disambiguation {
            if let Ok(file) = File::try_from(*ch) {
                disambiguation_file = Some(file);
            } else if let Ok(rank) = Rank::try_from(*ch) {
                disambiguation_rank = Some(rank);
            }
        }

        // Pawn captures always name their origin file right before the `x`.
        if piece_kind == PieceKind::Pawn {
            if let Some(index) = capture_index.filter(|index| *index > 0) {
                let ch = before_destination[index - 1];
                disambiguation_file =
                    Some(File::try_from(ch).map_err(|_| AcnErr::InvalidCaptureFile(ch))?);
            }
        }

        Ok(PieceMove::Normal(NormalMove {
            piece_kind,
            destination,
            disambiguation_file,
            disambiguation_rank,
            is_capture,
        }))
    }
}
