mod board;
mod file;
mod piece;
mod piece_kind;
mod player;
mod rank;
mod square;

pub use board::Board;
pub use file::File;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use player::Player;
pub use rank::Rank;
pub use square::{Square, SquareErr};
