mod fen_parser;
pub(crate) use fen_parser::FenParser;
pub use fen_parser::{BoardLayout, FenErr};
