//! Move generation, notation, replay and PGN game resolution on top of the
//! board model in `chess_common`.

mod chess_move;
mod game;
mod notation;
mod possible_moves;
mod replay;
mod resolver;
mod session;

pub use chess_move::{BoardMove, Move};
pub use game::{parse_game, parse_multi_pgn, parse_pgn, Diagnostic, Game, GameErr, PgnErr};
pub use notation::algebraic_notation;
pub use possible_moves::possible_moves;
pub use replay::{apply_move, replay, replay_from, Position};
pub use resolver::{resolve_move, ResolveErr};
pub use session::Session;
