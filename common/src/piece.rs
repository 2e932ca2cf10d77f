use std::fmt::Debug;

use serde_derive::Serialize;

use crate::{PieceKind, Player};

#[derive(Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    player: Player,
}

impl Piece {
    pub const WHITE_PAWN: Piece = Piece::new(Player::White, PieceKind::Pawn);
    pub const BLACK_PAWN: Piece = Piece::new(Player::Black, PieceKind::Pawn);

    pub const fn new(player: Player, kind: PieceKind) -> Self {
        Self { kind, player }
    }

    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    pub const fn player(&self) -> Player {
        self.player
    }

    pub const fn to_fen(&self) -> char {
        match self.player() {
            Player::White => self.kind().as_char().to_ascii_uppercase(),
            Player::Black => self.kind().as_char().to_ascii_lowercase(),
        }
    }

    pub const fn from_fen(ch: char) -> Option<Piece> {
        let kind = match ch.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        let player = if ch.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Some(Piece::new(player, kind))
    }

    /// The same kind of piece belonging to the other player.
    pub const fn swap_player(&self) -> Piece {
        Piece::new(self.player.other_player(), self.kind)
    }
}

impl Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut repr_string = String::with_capacity(2);
        repr_string.push(self.player.as_char());
        repr_string.push(self.kind.as_char());
        f.write_str(&repr_string)
    }
}
