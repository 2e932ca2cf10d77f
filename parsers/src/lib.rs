mod pgn_parser;
pub use pgn_parser::{
    find_tag, split_games, tag_pairs, tokenize_movetext, GameResult, GameText, MoveToken,
    Movetext, Span, UNKNOWN_PLAYER,
};
mod fen;
use fen::FenParser;
pub use fen::{BoardLayout, FenErr};
mod acn_parser;
pub use acn_parser::{parse_algebraic_notation, AcnErr, NormalMove, PieceMove};

pub fn parse_fen(fen: &str) -> Result<BoardLayout, FenErr> {
    FenParser::parse_fen(fen)
}
