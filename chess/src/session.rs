use std::sync::Arc;

use chess_common::{Board, PieceKind, Player, Square};
use log::debug;

use crate::{
    algebraic_notation, parse_multi_pgn, possible_moves, replay_from,
    resolver::en_passant_victim, BoardMove, Game, Move, PgnErr, Position,
};

/// Everything a board viewer shows at one point in time.
///
/// A session is never changed in place. Every operation returns the next
/// snapshot, so earlier ones can be kept around for undo or comparison.
#[derive(Clone, Debug)]
pub struct Session {
    games: Arc<[Game]>,
    active_game: Option<usize>,
    starting_position: Position,
    moves: Vec<Move>,
    /// Index of the move whose resulting position is shown. `None` shows the
    /// starting position.
    current_move: Option<usize>,
    position: Position,
    selected_square: Option<Square>,
    possible_moves: Vec<Square>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// The standard starting position with no game loaded.
    pub fn new() -> Self {
        Self::with_games(Arc::from(Vec::new()))
    }

    fn with_games(games: Arc<[Game]>) -> Self {
        Self {
            games,
            active_game: None,
            starting_position: Position::initial(),
            moves: Vec::new(),
            current_move: None,
            position: Position::initial(),
            selected_square: None,
            possible_moves: Vec::new(),
        }
    }

    /// Loads every game in `pgn` and shows the final position of the last
    /// one.
    pub fn load_pgn(&self, pgn: &str) -> Result<Session, PgnErr> {
        let games = parse_multi_pgn(pgn)?;
        let last = games.len() - 1;
        Ok(Self::with_games(Arc::from(games)).select_game(last))
    }

    /// Makes game `index` active and shows its final position. An index past
    /// the loaded games leaves the snapshot as it was.
    pub fn select_game(&self, index: usize) -> Session {
        let Some(game) = self.games.get(index) else {
            debug!("no game {} among {} loaded", index, self.games.len());
            return self.clone();
        };

        let moves = game.moves().to_vec();
        let starting_position = game.starting_position().clone();
        let position = replay_from(&starting_position, &moves);
        Session {
            games: Arc::clone(&self.games),
            active_game: Some(index),
            starting_position,
            current_move: moves.len().checked_sub(1),
            moves,
            position,
            selected_square: None,
            possible_moves: Vec::new(),
        }
    }

    /// Shows the position after move `index`, where `-1` is the starting
    /// position. Out of range indexes are clamped.
    pub fn navigate_to_move(&self, index: isize) -> Session {
        let last = self.moves.len() as isize - 1;
        let current_move = usize::try_from(index.clamp(-1, last)).ok();
        let shown = current_move.map_or(0, |index| index + 1);

        Session {
            current_move,
            position: replay_from(&self.starting_position, &self.moves[..shown]),
            selected_square: None,
            possible_moves: Vec::new(),
            ..self.clone()
        }
    }

    /// Handles a click on `square`. With a piece selected and `square` one of
    /// its destinations the move is played. Otherwise a piece of the side to
    /// move becomes selected, and anything else clears the selection.
    pub fn select_square(&self, square: Square) -> Session {
        if let Some(from) = self.selected_square {
            if self.possible_moves.contains(&square) {
                if let Some(next) = self.commit_move(from, square) {
                    return next;
                }
            }
        }

        match self.position.board().at(square) {
            Some(piece) if piece.player() == self.position.player_to_move() => Session {
                selected_square: Some(square),
                possible_moves: possible_moves(self.position.board(), square, piece),
                ..self.clone()
            },
            _ => Session {
                selected_square: None,
                possible_moves: Vec::new(),
                ..self.clone()
            },
        }
    }

    /// Plays the piece on `from` to `to` and shows the result. Moves after
    /// the one currently shown are dropped first, so playing while looking
    /// at an earlier position starts a new line from there.
    ///
    /// Returns `None` when `from` is empty.
    pub fn commit_move(&self, from: Square, to: Square) -> Option<Session> {
        let board = self.position.board();
        let piece = board.at(from)?;

        let captured = board.at(to).or_else(|| {
            let diagonal = from.col().abs_diff(to.col()) == 1;
            if piece.kind() == PieceKind::Pawn && diagonal {
                en_passant_victim(board, to, piece.player()).map(|(_, pawn)| pawn)
            } else {
                None
            }
        });
        let board_move = BoardMove::new(from, to, piece, captured);
        let notation = algebraic_notation(board, from, to, piece, captured);

        let mut moves = self.moves[..self.current_move.map_or(0, |index| index + 1)].to_vec();
        moves.push(Move::new(board_move, notation, moves.len() + 1));

        let mut position = self.position.clone();
        position.play(&board_move);

        Some(Session {
            current_move: Some(moves.len() - 1),
            moves,
            position,
            selected_square: None,
            possible_moves: Vec::new(),
            ..self.clone()
        })
    }

    /// Back to the standard starting position. Loaded games stay available
    /// but none is active.
    pub fn reset(&self) -> Session {
        Self::with_games(Arc::clone(&self.games))
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn player_to_move(&self) -> Player {
        self.position.player_to_move()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The index passed to [`Session::navigate_to_move`] that shows the
    /// current position.
    pub fn current_move_index(&self) -> isize {
        self.current_move.map_or(-1, |index| index as isize)
    }

    /// The move that led to the position shown, if any.
    pub fn last_move(&self) -> Option<&Move> {
        self.current_move.and_then(|index| self.moves.get(index))
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selected_square
    }

    pub fn possible_moves(&self) -> &[Square] {
        &self.possible_moves
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn active_game(&self) -> Option<usize> {
        self.active_game
    }
}

#[cfg(test)]
mod tests {
    use chess_common::{Board, Piece, PieceKind, Player, Square};

    use super::Session;
    use crate::PgnErr;

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    const TWO_GAMES: &str = "[Event \"A\"]\n[White \"Anna\"]\n\n1. e4 e5 2. Nf3 1-0\n\n[Event \"B\"]\n[White \"Ben\"]\n\n1. d4 d5 0-1\n";

    #[test]
    fn starts_at_the_initial_position() {
        let session = Session::new();
        assert_eq!(session.board(), &Board::initial());
        assert_eq!(session.player_to_move(), Player::White);
        assert_eq!(session.current_move_index(), -1);
        assert!(session.moves().is_empty());
        assert!(session.last_move().is_none());
        assert!(session.games().is_empty());
        assert_eq!(session.active_game(), None);
    }

    #[test]
    fn loading_shows_the_last_game_at_its_end() {
        let session = Session::new().load_pgn(TWO_GAMES).unwrap();
        assert_eq!(session.games().len(), 2);
        assert_eq!(session.active_game(), Some(1));
        assert_eq!(session.moves().len(), 2);
        assert_eq!(session.current_move_index(), 1);
        assert_eq!(session.last_move().unwrap().notation(), "d5");
        assert_eq!(
            session.board().to_fen_placement(),
            "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR"
        );
        assert_eq!(session.player_to_move(), Player::White);
    }

    #[test]
    fn loading_nothing_is_an_error() {
        assert_eq!(
            Session::new().load_pgn("").unwrap_err(),
            PgnErr::NoValidGames { skipped: 0 }
        );
    }

    #[test]
    fn selecting_games() {
        let session = Session::new().load_pgn(TWO_GAMES).unwrap();
        let first = session.select_game(0);
        assert_eq!(first.active_game(), Some(0));
        assert_eq!(first.games()[0].white_player_name(), "Anna");
        assert_eq!(first.moves().len(), 3);
        assert_eq!(first.player_to_move(), Player::Black);

        let unchanged = first.select_game(7);
        assert_eq!(unchanged.active_game(), Some(0));
        assert_eq!(unchanged.board(), first.board());
    }

    #[test]
    fn navigation_is_clamped() {
        let session = Session::new().load_pgn(TWO_GAMES).unwrap().select_game(0);

        let start = session.navigate_to_move(-5);
        assert_eq!(start.current_move_index(), -1);
        assert_eq!(start.board(), &Board::initial());
        assert!(start.last_move().is_none());

        let first = session.navigate_to_move(0);
        assert_eq!(first.last_move().unwrap().notation(), "e4");
        assert_eq!(first.player_to_move(), Player::Black);

        let end = session.navigate_to_move(99);
        assert_eq!(end.current_move_index(), 2);
        assert_eq!(end.board(), session.board());

        // the earlier snapshot is untouched
        assert_eq!(session.current_move_index(), 2);
    }

    #[test]
    fn clicking_selects_then_moves() {
        let session = Session::new();
        let selected = session.select_square(square("g1"));
        assert_eq!(selected.selected_square(), Some(square("g1")));
        let mut targets = selected.possible_moves().to_vec();
        targets.sort();
        assert_eq!(targets, vec![square("f3"), square("h3")]);

        let moved = selected.select_square(square("f3"));
        assert_eq!(moved.selected_square(), None);
        assert_eq!(moved.moves().len(), 1);
        assert_eq!(moved.last_move().unwrap().notation(), "Nf3");
        assert_eq!(moved.last_move().unwrap().move_number(), 1);
        assert_eq!(moved.player_to_move(), Player::Black);
        assert_eq!(
            moved.board().at(square("f3")),
            Some(Piece::new(Player::White, PieceKind::Knight))
        );
    }

    #[test]
    fn clicking_elsewhere_clears_or_reselects() {
        let session = Session::new().select_square(square("e2"));
        let cleared = session.select_square(square("e5"));
        assert_eq!(cleared.selected_square(), None);
        assert!(cleared.possible_moves().is_empty());

        let black = session.select_square(square("e7"));
        assert_eq!(black.selected_square(), None);

        let other = session.select_square(square("d2"));
        assert_eq!(other.selected_square(), Some(square("d2")));
    }

    #[test]
    fn committed_captures_are_recorded() {
        let session = Session::new()
            .commit_move(square("e2"), square("e4"))
            .and_then(|session| session.commit_move(square("d7"), square("d5")))
            .and_then(|session| session.commit_move(square("e4"), square("d5")))
            .unwrap();
        let last = session.last_move().unwrap();
        assert_eq!(last.notation(), "exd5");
        assert_eq!(last.captured(), Some(Piece::BLACK_PAWN));
        assert_eq!(last.move_number(), 3);

        assert!(session.commit_move(square("e4"), square("e5")).is_none());
    }

    #[test]
    fn committed_en_passant_removes_the_pawn() {
        let session = Session::new()
            .commit_move(square("e2"), square("e4"))
            .and_then(|session| session.commit_move(square("a7"), square("a6")))
            .and_then(|session| session.commit_move(square("e4"), square("e5")))
            .and_then(|session| session.commit_move(square("d7"), square("d5")))
            .and_then(|session| session.commit_move(square("e5"), square("d6")))
            .unwrap();
        let last = session.last_move().unwrap();
        assert_eq!(last.notation(), "exd6");
        assert_eq!(last.captured(), Some(Piece::BLACK_PAWN));
        assert!(session.board().is_empty_at(square("d5")));
        assert_eq!(session.board().at(square("d6")), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn committing_from_history_drops_later_moves() {
        let session = Session::new().load_pgn(TWO_GAMES).unwrap().select_game(0);
        let branched = session
            .navigate_to_move(0)
            .commit_move(square("c7"), square("c5"))
            .unwrap();
        assert_eq!(
            branched
                .moves()
                .iter()
                .map(|move_| move_.notation())
                .collect::<Vec<_>>(),
            vec!["e4", "c5"]
        );
        assert_eq!(branched.current_move_index(), 1);
        assert_eq!(branched.last_move().unwrap().move_number(), 2);
        assert_eq!(
            branched.navigate_to_move(1).board(),
            branched.board()
        );
    }

    #[test]
    fn reset_keeps_the_games() {
        let session = Session::new().load_pgn(TWO_GAMES).unwrap();
        let reset = session.reset();
        assert_eq!(reset.games().len(), 2);
        assert_eq!(reset.active_game(), None);
        assert_eq!(reset.board(), &Board::initial());
        assert_eq!(reset.current_move_index(), -1);
        assert!(reset.moves().is_empty());
    }
}
