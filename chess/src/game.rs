use std::{error::Error, fmt::Display};

use chess_parsers::{
    find_tag, parse_fen, split_games, tag_pairs, tokenize_movetext, FenErr, GameResult, Span,
    UNKNOWN_PLAYER,
};
use log::{debug, warn};
use serde::ser::{SerializeStruct, Serializer};
use serde_derive::Serialize;

use crate::{resolve_move, Move, Position, ResolveErr};

/// A move token that could not be turned into a move and was skipped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    token: String,
    ply: usize,
    span: Span,
    reason: ResolveErr,
}

impl Diagnostic {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 1-based position of the token in the game's token list.
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Byte range of the token in the text handed to the parser.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn reason(&self) -> &ResolveErr {
        &self.reason
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "skipped move {} \"{}\": {}",
            self.ply, self.token, self.reason
        )
    }
}

impl serde::Serialize for Diagnostic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Diagnostic", 5)?;
        state.serialize_field("token", &self.token)?;
        state.serialize_field("ply", &self.ply)?;
        state.serialize_field("start", &self.span.start())?;
        state.serialize_field("end", &self.span.end())?;
        state.serialize_field("reason", &self.reason.to_string())?;
        state.end()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Game {
    white_player_name: String,
    tag_pairs: Vec<(String, String)>,
    result: Option<GameResult>,
    starting_position: Position,
    moves: Vec<Move>,
    diagnostics: Vec<Diagnostic>,
}

impl Game {
    pub fn white_player_name(&self) -> &str {
        &self.white_player_name
    }

    pub fn tag_pairs(&self) -> &[(String, String)] {
        &self.tag_pairs
    }

    /// Looks up a tag value, ignoring ASCII case in the name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tag_pairs
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn starting_position(&self) -> &Position {
        &self.starting_position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum GameErr {
    /// The game's `FEN` tag does not describe a position.
    InvalidFen { fen: String, err: FenErr },
}

impl Display for GameErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameErr::InvalidFen { fen, err } => write!(f, "invalid FEN tag \"{}\": {}", fen, err),
        }
    }
}

impl Error for GameErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GameErr::InvalidFen { err, .. } => Some(err),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum PgnErr {
    /// Splitting and parsing produced no games. `skipped` counts the game
    /// segments that were found but failed to parse.
    NoValidGames { skipped: usize },
}

impl Display for PgnErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PgnErr::NoValidGames { skipped: 0 } => write!(f, "no valid games found"),
            PgnErr::NoValidGames { skipped } => write!(
                f,
                "no valid games found ({} game(s) could not be parsed)",
                skipped
            ),
        }
    }
}

impl Error for PgnErr {}

/// Parses the text of a single game.
///
/// Tokens that cannot be resolved on the current board are skipped and
/// recorded as diagnostics; the remaining moves are still played. Spans in
/// the diagnostics are relative to `game_text`.
pub fn parse_game(game_text: &str) -> Result<Game, GameErr> {
    let tag_pairs = tag_pairs(game_text);
    let white_player_name = find_tag(game_text, "White")
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());

    let starting_position = match find_tag(game_text, "FEN") {
        None => Position::initial(),
        Some(fen) => match parse_fen(&fen) {
            Ok(layout) => {
                let (board, player_to_move) = layout.into_parts();
                Position::new(board, player_to_move)
            }
            Err(err) => return Err(GameErr::InvalidFen { fen, err }),
        },
    };

    let movetext = tokenize_movetext(game_text);
    let mut position = starting_position.clone();
    let mut moves = Vec::with_capacity(movetext.tokens.len());
    let mut diagnostics = Vec::new();

    for (index, token) in movetext.tokens.iter().enumerate() {
        match resolve_move(position.board(), token.text(), position.player_to_move()) {
            Ok(board_move) => {
                position.play(&board_move);
                moves.push(Move::new(
                    board_move,
                    token.text().to_string(),
                    moves.len() + 1,
                ));
            }
            Err(reason) => {
                let diagnostic = Diagnostic {
                    token: token.text().to_string(),
                    ply: index + 1,
                    span: token.span(),
                    reason,
                };
                warn!("{}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    debug!(
        "parsed game of {}: {} move(s), {} skipped",
        white_player_name,
        moves.len(),
        diagnostics.len()
    );

    Ok(Game {
        white_player_name,
        tag_pairs,
        result: movetext.result,
        starting_position,
        moves,
        diagnostics,
    })
}

/// Splits `pgn` into games and parses each one. Games that fail to parse are
/// logged and left out. Diagnostic spans are relative to `pgn`.
pub fn parse_multi_pgn(pgn: &str) -> Result<Vec<Game>, PgnErr> {
    let mut games = Vec::new();
    let mut skipped = 0;

    for (index, game_text) in split_games(pgn).into_iter().enumerate() {
        match parse_game(game_text.text()) {
            Ok(mut game) => {
                for diagnostic in game.diagnostics.iter_mut() {
                    diagnostic.span = diagnostic.span.shifted(game_text.offset());
                }
                games.push(game);
            }
            Err(err) => {
                warn!("skipping game {}: {}", index + 1, err);
                skipped += 1;
            }
        }
    }

    if games.is_empty() {
        return Err(PgnErr::NoValidGames { skipped });
    }
    Ok(games)
}

/// The moves of the first game in `pgn`.
pub fn parse_pgn(pgn: &str) -> Result<Vec<Move>, PgnErr> {
    let mut games = parse_multi_pgn(pgn)?;
    Ok(games.swap_remove(0).moves)
}

#[cfg(test)]
mod tests {
    use chess_common::{Piece, PieceKind, Player, Square};
    use chess_parsers::GameResult;

    use super::{parse_game, parse_multi_pgn, parse_pgn, GameErr, PgnErr};
    use crate::{algebraic_notation, replay_from, resolve_move, ResolveErr};

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn splits_two_games() {
        let games =
            parse_multi_pgn("[Event \"A\"]\n1. e4 e5\n[Event \"B\"]\n1. d4 d5").unwrap();
        assert_eq!(games.len(), 2);
        for game in &games {
            assert_eq!(game.white_player_name(), "Unknown Player");
            assert_eq!(game.moves().len(), 2);
        }
        assert_eq!(games[1].moves()[0].notation(), "d4");
        assert_eq!(games[1].tag("event"), Some("B"));
    }

    #[test]
    fn reads_tags_and_result() {
        let game = parse_game(
            "[Event \"Casual\"]\n[White \"Magnus\"]\n[Black \"Hikaru\"]\n\n1. e4 e5 2. Nf3 Nc6 1-0",
        )
        .unwrap();
        assert_eq!(game.white_player_name(), "Magnus");
        assert_eq!(game.tag_pairs().len(), 3);
        assert_eq!(game.result(), Some(GameResult::WhiteWin));
        assert_eq!(game.moves().len(), 4);
        assert!(game.diagnostics().is_empty());
    }

    #[test]
    fn numbers_and_records_moves() {
        let game = parse_game("1. e4 d5 2. exd5+ Qxd5").unwrap();
        let moves = game.moves();
        assert_eq!(
            moves.iter().map(|move_| move_.move_number()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(moves[2].notation(), "exd5+");
        assert_eq!(moves[2].captured(), Some(Piece::BLACK_PAWN));
        assert_eq!(
            moves[3].piece(),
            Piece::new(Player::Black, PieceKind::Queen)
        );
        assert_eq!(moves[3].captured(), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn skips_unresolvable_tokens() {
        let pgn = "[Event \"A\"]\n1. e4 Qh4 2. Zz e5";
        let games = parse_multi_pgn(pgn).unwrap();
        let game = &games[0];

        // Qh4 needs the f- or e-pawn out of the way first.
        assert_eq!(
            game.moves().iter().map(|move_| move_.notation()).collect::<Vec<_>>(),
            vec!["e4", "e5"]
        );
        let diagnostics = game.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].token(), "Qh4");
        assert_eq!(diagnostics[0].ply(), 2);
        assert!(matches!(diagnostics[0].reason(), ResolveErr::NoCandidates(_)));
        assert_eq!(diagnostics[1].ply(), 3);
        assert!(matches!(diagnostics[1].reason(), ResolveErr::Notation(_)));

        let span = diagnostics[1].span();
        assert_eq!(&pgn[span.start()..span.end()], "Zz");
    }

    #[test]
    fn move_numbers_skip_no_slots_for_dropped_tokens() {
        let game = parse_game("1. e4 Zz e5 2. Nf3").unwrap();
        assert_eq!(
            game.moves()
                .iter()
                .map(|move_| (move_.notation(), move_.move_number()))
                .collect::<Vec<_>>(),
            vec![("e4", 1), ("e5", 2), ("Nf3", 3)]
        );
        assert_eq!(game.diagnostics()[0].ply(), 2);
    }

    #[test]
    fn the_side_to_move_only_flips_on_success() {
        let game = parse_game("1. e4 Ke2 e5").unwrap();
        let moves = game.moves();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[1].piece(), Piece::BLACK_PAWN);
    }

    #[test]
    fn games_without_moves_are_kept() {
        let games = parse_multi_pgn("[Event \"Empty\"]\n[White \"Nobody\"]\n\n*").unwrap();
        assert_eq!(games.len(), 1);
        assert!(games[0].moves().is_empty());
        assert_eq!(games[0].result(), Some(GameResult::Inconclusive));
    }

    #[test]
    fn fen_tags_set_the_starting_position() {
        let game = parse_game(
            "[Event \"Endgame\"]\n[SetUp \"1\"]\n[FEN \"4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1\"]\n\n1. exd6 Kd7",
        )
        .unwrap();
        assert_eq!(game.starting_position().player_to_move(), Player::White);
        assert_eq!(game.moves().len(), 2);
        assert_eq!(game.moves()[0].captured(), Some(Piece::BLACK_PAWN));

        let end = replay_from(game.starting_position(), game.moves());
        assert_eq!(end.board().to_fen_placement(), "8/3k4/3P4/8/8/8/8/4K3");
        assert_eq!(end.player_to_move(), Player::White);
    }

    #[test]
    fn bad_fen_skips_only_that_game() {
        let bad = "[Event \"A\"]\n[FEN \"not a position\"]\n\n1. e4";
        assert!(matches!(parse_game(bad), Err(GameErr::InvalidFen { .. })));

        let games = parse_multi_pgn(&format!("{}\n[Event \"B\"]\n1. d4", bad)).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].moves()[0].notation(), "d4");

        assert_eq!(parse_multi_pgn(bad), Err(PgnErr::NoValidGames { skipped: 1 }));
    }

    #[test]
    fn empty_input_has_no_games() {
        assert_eq!(parse_multi_pgn(""), Err(PgnErr::NoValidGames { skipped: 0 }));
        assert_eq!(parse_multi_pgn("  \n\n"), Err(PgnErr::NoValidGames { skipped: 0 }));
    }

    #[test]
    fn first_game_moves() {
        let moves = parse_pgn("[Event \"A\"]\n1. e4 e5\n[Event \"B\"]\n1. d4").unwrap();
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn movetext_without_numbers_still_parses() {
        let game = parse_game("e4 e5 Nf3 Nc6").unwrap();
        assert_eq!(game.moves().len(), 4);
    }

    #[test]
    fn formatted_quiet_moves_resolve_back() {
        let game = parse_game("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6").unwrap();
        let mut position = game.starting_position().clone();
        for move_ in game.moves() {
            if move_.captured().is_none() {
                let notation = algebraic_notation(
                    position.board(),
                    move_.from(),
                    move_.to(),
                    move_.piece(),
                    None,
                );
                let resolved =
                    resolve_move(position.board(), &notation, position.player_to_move()).unwrap();
                assert_eq!(resolved.from, move_.from());
                assert_eq!(resolved.to, move_.to());
                assert_eq!(resolved.piece, move_.piece());
            }
            position.play(move_.board_move());
        }
        assert_eq!(
            position.board().at(square("f6")),
            Some(Piece::new(Player::Black, PieceKind::Knight))
        );
    }
}
