use std::error::Error;
use std::fmt::Display;
use std::iter::{Enumerate, Peekable};
use std::str::Chars;

use chess_common::{Board, Piece, Player, Square};

#[derive(Debug, Eq, PartialEq)]
pub struct FenErr {
    failed_at_char_index: usize,
}

impl FenErr {
    fn new(char_index: usize) -> Self {
        Self {
            failed_at_char_index: char_index,
        }
    }

    pub fn char_index(&self) -> usize {
        self.failed_at_char_index
    }
}

impl Display for FenErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to parse FEN. Error at character number {} (0-indexed)",
            self.failed_at_char_index
        )
    }
}

impl Error for FenErr {}

/// The parts of a FEN record a game can start from. Castling rights, the en
/// passant square and the clocks are checked for shape and then dropped:
/// nothing downstream tracks them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoardLayout {
    board: Board,
    player_to_move: Player,
}

impl BoardLayout {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player_to_move(&self) -> Player {
        self.player_to_move
    }

    pub fn into_parts(self) -> (Board, Player) {
        (self.board, self.player_to_move)
    }
}

pub(crate) struct FenParser<'fen> {
    chars: Peekable<Enumerate<Chars<'fen>>>,
    last_index: usize,
}

impl<'fen> FenParser<'fen> {
    pub(crate) fn parse_fen(input: &'fen str) -> Result<BoardLayout, FenErr> {
        let mut parser = Self {
            chars: input.trim().chars().enumerate().peekable(),
            last_index: 0,
        };

        let board = parser.parse_piece_placement()?;

        parser.match_char_or_err(' ')?;

        let mut player_to_move = Player::White;
        parser.match_char_or_err_if(|ch| match ch {
            'b' => {
                player_to_move = Player::Black;
                true
            }
            'w' => {
                player_to_move = Player::White;
                true
            }
            _ => false,
        })?;

        // Export format always carries the remaining four fields, but
        // hand-written FEN tags frequently stop after the side to move.
        if parser.at_end() {
            return Ok(BoardLayout {
                board,
                player_to_move,
            });
        }

        parser.match_char_or_err(' ')?;
        if !parser.match_char('-') {
            let mut matched_any = false;
            for right in ['K', 'Q', 'k', 'q'] {
                matched_any |= parser.match_char(right);
            }
            if !matched_any {
                return Err(FenErr::new(parser.last_index));
            }
        }

        parser.match_char_or_err(' ')?;
        if !parser.match_char('-') {
            parser.match_char_or_err_if(|ch| ('a'..='h').contains(&ch))?;
            parser.match_char_or_err_if(|ch| ch == '3' || ch == '6')?;
        }

        parser.match_char_or_err(' ')?;
        parser.match_number()?;
        parser.match_char_or_err(' ')?;
        parser.match_number()?;

        if !parser.at_end() {
            return Err(FenErr::new(parser.last_index + 1));
        }

        Ok(BoardLayout {
            board,
            player_to_move,
        })
    }

    fn parse_piece_placement(&mut self) -> Result<Board, FenErr> {
        let mut result = Board::empty();
        for row in 0_u8..8_u8 {
            if row != 0 {
                self.match_char_or_err('/')?;
            }

            let mut col = 0_u8;
            while col < 8 {
                let mut skip = 0_u8;
                let mut piece = None;
                let matched = self.match_char_if(|ch| match ch {
                    '1'..='8' => {
                        skip = ch as u8 - b'0';
                        true
                    }
                    _ => {
                        piece = Piece::from_fen(ch);
                        piece.is_some()
                    }
                });

                if !matched {
                    return Err(FenErr::new(self.last_index));
                }

                match piece {
                    Some(piece) => {
                        let square = Square::new(row, col).ok_or(FenErr::new(self.last_index))?;
                        result.put(square, piece);
                        col += 1;
                    }
                    None => {
                        // It's important that a run of empty squares cannot
                        // spill into the next rank, e.g. ppppp8/...
                        if col + skip > 8 {
                            return Err(FenErr::new(self.last_index));
                        }
                        col += skip;
                    }
                }
            }
        }

        Ok(result)
    }

    fn match_number(&mut self) -> Result<(), FenErr> {
        self.match_char_or_err_if(|ch| ch.is_ascii_digit())?;
        while self.match_char_if(|ch| ch.is_ascii_digit()) {}
        Ok(())
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn match_char_or_err(&mut self, ch: char) -> Result<(), FenErr> {
        if self.match_char(ch) {
            Ok(())
        } else {
            Err(FenErr::new(self.last_index))
        }
    }

    fn match_char(&mut self, ch: char) -> bool {
        self.match_char_if(|other| other == ch)
    }

    fn match_char_or_err_if<P: FnOnce(char) -> bool>(
        &mut self,
        predicate: P,
    ) -> Result<(), FenErr> {
        if self.match_char_if(predicate) {
            Ok(())
        } else {
            Err(FenErr::new(self.last_index))
        }
    }

    fn match_char_if<P: FnOnce(char) -> bool>(&mut self, predicate: P) -> bool {
        match self.chars.peek() {
            None => false,
            Some((index, ch)) => {
                self.last_index = *index;
                if predicate(*ch) {
                    self.chars.next();
                    true
                } else {
                    false
                }
            }
        }
    }
}
