use std::{error::Error, fmt::Display};

use chess_common::{Board, File, Piece, PieceKind, Player, Square};
use chess_parsers::{parse_algebraic_notation, AcnErr, NormalMove, PieceMove};

use crate::{possible_moves, BoardMove};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolveErr {
    /// The token is not algebraic notation this resolver understands.
    Notation(AcnErr),
    /// The token parsed, but no piece of the side to move can make it.
    NoCandidates(NormalMove),
}

impl Display for ResolveErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveErr::Notation(err) => write!(f, "unreadable move: {}", err),
            ResolveErr::NoCandidates(normal_move) => {
                write!(f, "no piece can play {}", normal_move)
            }
        }
    }
}

impl Error for ResolveErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveErr::Notation(err) => Some(err),
            ResolveErr::NoCandidates(_) => None,
        }
    }
}

impl From<AcnErr> for ResolveErr {
    fn from(value: AcnErr) -> Self {
        ResolveErr::Notation(value)
    }
}

/// Turns a notation token into a concrete move for `player` on `board`.
///
/// Castling tokens map straight onto the king's two-file move. Otherwise
/// every piece of the right kind that can reach the destination is a
/// candidate, narrowed by any disambiguating file and then rank. When more
/// than one candidate remains, the first in board-scan order wins.
///
/// A pawn capture onto an empty square is taken to be en passant: the pawn
/// taken is the enemy pawn directly behind the destination and the capturing
/// pawn must stand beside it.
pub fn resolve_move(board: &Board, token: &str, player: Player) -> Result<BoardMove, ResolveErr> {
    let normal_move = match parse_algebraic_notation(token)? {
        PieceMove::CastleKingside => {
            return Ok(castle(player, File::castle_kingside_destination()))
        }
        PieceMove::CastleQueenside => {
            return Ok(castle(player, File::castle_queenside_destination()))
        }
        PieceMove::Normal(normal_move) => normal_move,
    };

    let destination = normal_move.destination;
    let en_passant = if normal_move.piece_kind == PieceKind::Pawn
        && normal_move.is_capture
        && board.is_empty_at(destination)
    {
        en_passant_victim(board, destination, player)
    } else {
        None
    };

    let candidates = board
        .pieces()
        .filter(|(_, piece)| piece.kind() == normal_move.piece_kind && piece.player() == player)
        .filter(|(from, piece)| {
            possible_moves(board, *from, *piece).contains(&destination)
                || (en_passant.is_some() && is_diagonal_step(*from, destination, player))
        })
        .filter(|(from, _)| {
            normal_move
                .disambiguation_file
                .map_or(true, |file| from.file() == file)
        })
        .filter(|(from, _)| {
            normal_move
                .disambiguation_rank
                .map_or(true, |rank| from.rank() == rank)
        })
        .collect::<Vec<_>>();

    if let Some((_, captured)) = en_passant {
        let capture_row = destination.row() as isize - player.forward() as isize;
        let en_passant_candidate = candidates.iter().find(|(from, _)| {
            from.row() as isize == capture_row && from.col().abs_diff(destination.col()) == 1
        });
        if let Some((from, piece)) = en_passant_candidate {
            return Ok(BoardMove::new(*from, destination, *piece, Some(captured)));
        }
    }

    match candidates.first() {
        Some((from, piece)) => Ok(BoardMove::new(
            *from,
            destination,
            *piece,
            board.at(destination),
        )),
        None => Err(ResolveErr::NoCandidates(normal_move)),
    }
}

/// The enemy pawn a pawn of `player` would take by moving diagonally onto
/// the empty `destination`, with the square it stands on.
pub(crate) fn en_passant_victim(
    board: &Board,
    destination: Square,
    player: Player,
) -> Option<(Square, Piece)> {
    let behind = destination.offset(-player.forward(), 0)?;
    match board.at(behind) {
        Some(piece) if piece.kind() == PieceKind::Pawn && piece.player() != player => {
            Some((behind, piece))
        }
        _ => None,
    }
}

fn is_diagonal_step(from: Square, to: Square, player: Player) -> bool {
    [-1, 1]
        .into_iter()
        .any(|col_step| from.offset(player.forward(), col_step) == Some(to))
}

fn castle(player: Player, destination: File) -> BoardMove {
    let row = player.back_row() as u8;
    let from = Square::new(row, File::king_starting().as_index() as u8);
    let to = Square::new(row, destination.as_index() as u8);
    match (from, to) {
        (Some(from), Some(to)) => {
            BoardMove::new(from, to, Piece::new(player, PieceKind::King), None)
        }
        _ => unreachable!("back rows and castling files are on the board"),
    }
}
