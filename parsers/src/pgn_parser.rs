use std::{fmt::Debug, ops::Range};

use log::{debug, trace};
use serde::{Serialize, Serializer};

/// The default white player name for games without a usable `White` tag.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    Inconclusive,
}

impl GameResult {
    pub fn from_marker(marker: &str) -> Option<GameResult> {
        match marker {
            "1-0" => Some(GameResult::WhiteWin),
            "0-1" => Some(GameResult::BlackWin),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Inconclusive),
            _ => None,
        }
    }

    fn all() -> [GameResult; 4] {
        [
            GameResult::WhiteWin,
            GameResult::BlackWin,
            GameResult::Draw,
            GameResult::Inconclusive,
        ]
    }
}

impl AsRef<str> for GameResult {
    fn as_ref(&self) -> &str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Inconclusive => "*",
        }
    }
}

impl Serialize for GameResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}

/// Byte offsets into the text a token was scanned from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    /// Moves the span by `offset` bytes, e.g. from game-relative to
    /// file-relative positions.
    pub const fn shifted(&self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A single move as written in the movetext, e.g. `Nbd7` or `exd6+`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MoveToken {
    text: String,
    span: Span,
}

impl MoveToken {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Default)]
pub struct Movetext {
    pub tokens: Vec<MoveToken>,
    /// The result marker that closed the movetext, if there was one.
    pub result: Option<GameResult>,
}

/// Extracts the ordered move tokens of a single game.
///
/// Tag pairs, `{}` and `;` comments and a trailing result marker are blanked
/// out first. Tokens are then collected after every move number marker
/// (`12.` or `12...`). Some producers drop or mangle move numbers, so when
/// that finds nothing the remaining words are taken as they are instead.
pub fn tokenize_movetext(game_text: &str) -> Movetext {
    let mut scanner = MovetextScanner::new(game_text);
    scanner.blank_tag_pairs();
    scanner.blank_brace_comments();
    scanner.blank_line_comments();
    let result = scanner.blank_trailing_result();

    let mut tokens = scanner.numbered_tokens();
    if tokens.is_empty() {
        debug!("movetext has no move numbers, reading bare tokens");
        scanner.blank_move_numbers();
        tokens = scanner.bare_tokens();
    }

    trace!("tokenized {} moves, result {:?}", tokens.len(), result);
    Movetext { tokens, result }
}

/// Works on a copy of the game text in which stripped regions are overwritten
/// with spaces. Offsets therefore stay valid for the game text.
struct MovetextScanner {
    bytes: Vec<u8>,
}

impl MovetextScanner {
    fn new(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
        }
    }

    fn blank(&mut self, range: Range<usize>) {
        for byte in &mut self.bytes[range] {
            *byte = b' ';
        }
    }

    fn find_from(&self, start: usize, mut stop: impl FnMut(u8) -> bool, target: u8) -> Option<usize> {
        for (index, byte) in self.bytes.iter().enumerate().skip(start) {
            if *byte == target {
                return Some(index);
            }
            if stop(*byte) {
                return None;
            }
        }
        None
    }

    /// `[Tag "value"]` pairs. The closing bracket has to be on the same line.
    fn blank_tag_pairs(&mut self) {
        let mut index = 0;
        while index < self.bytes.len() {
            if self.bytes[index] == b'[' {
                if let Some(end) = self.find_from(index + 1, is_line_break, b']') {
                    self.blank(index..end + 1);
                    index = end + 1;
                    continue;
                }
            }
            index += 1;
        }
    }

    /// `{...}` comments, which may run over several lines and do not nest.
    fn blank_brace_comments(&mut self) {
        let mut index = 0;
        while index < self.bytes.len() {
            if self.bytes[index] == b'{' {
                match self.find_from(index + 1, |_| false, b'}') {
                    None => return,
                    Some(end) => {
                        self.blank(index..end + 1);
                        index = end + 1;
                        continue;
                    }
                }
            }
            index += 1;
        }
    }

    /// `;` comments running to the end of the line.
    fn blank_line_comments(&mut self) {
        let mut index = 0;
        while index < self.bytes.len() {
            if self.bytes[index] == b';' {
                let end = self.bytes[index..]
                    .iter()
                    .position(|byte| is_line_break(*byte))
                    .map(|len| index + len)
                    .unwrap_or(self.bytes.len());
                self.blank(index..end);
                index = end;
            }
            index += 1;
        }
    }

    fn blank_trailing_result(&mut self) -> Option<GameResult> {
        let end = self
            .bytes
            .iter()
            .rposition(|byte| !byte.is_ascii_whitespace())
            .map(|index| index + 1)?;

        for result in GameResult::all() {
            let marker = result.as_ref().as_bytes();
            if self.bytes[..end].ends_with(marker) {
                self.blank(end - marker.len()..end);
                return Some(result);
            }
        }
        None
    }

    /// Blanks every run of digits directly followed by dots.
    fn blank_move_numbers(&mut self) {
        let mut index = 0;
        while index < self.bytes.len() {
            if self.bytes[index].is_ascii_digit() {
                let digits_end = index
                    + self.bytes[index..]
                        .iter()
                        .take_while(|byte| byte.is_ascii_digit())
                        .count();
                let dots_end = digits_end
                    + self.bytes[digits_end..]
                        .iter()
                        .take_while(|byte| **byte == b'.')
                        .count();
                if dots_end > digits_end {
                    self.blank(index..dots_end);
                }
                index = dots_end;
            } else {
                index += 1;
            }
        }
    }

    /// Whitespace separated words with their byte ranges.
    fn words(&self) -> Vec<Span> {
        let mut result = Vec::new();
        let mut start = None;
        for (index, byte) in self.bytes.iter().enumerate() {
            match (byte.is_ascii_whitespace(), start) {
                (true, Some(word_start)) => {
                    result.push(Span::new(word_start, index));
                    start = None;
                }
                (false, None) => start = Some(index),
                _ => {}
            }
        }
        if let Some(word_start) = start {
            result.push(Span::new(word_start, self.bytes.len()));
        }
        result
    }

    fn text(&self, span: Span) -> String {
        String::from_utf8_lossy(&self.bytes[span.start..span.end]).into_owned()
    }

    /// Tokens following move number markers. Words ahead of the first marker
    /// are not movetext and are ignored.
    fn numbered_tokens(&self) -> Vec<MoveToken> {
        let mut tokens = Vec::new();
        let mut seen_marker = false;
        for word in self.words() {
            let bytes = &self.bytes[word.start..word.end];
            let word = match move_number_len(bytes) {
                Some(marker_len) => {
                    seen_marker = true;
                    if marker_len == bytes.len() {
                        continue;
                    }
                    // text glued to the marker, as in `1.e4`
                    Span::new(word.start + marker_len, word.end)
                }
                None => word,
            };

            if !seen_marker {
                continue;
            }

            let text = self.text(word);
            if GameResult::from_marker(&text).is_some() || text.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            tokens.push(MoveToken { text, span: word });
        }
        tokens
    }

    fn bare_tokens(&self) -> Vec<MoveToken> {
        self.words()
            .into_iter()
            .map(|span| MoveToken {
                text: self.text(span),
                span,
            })
            .filter(|token| {
                GameResult::from_marker(&token.text).is_none() && token.text.chars().count() > 1
            })
            .collect()
    }
}

fn is_line_break(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Length of a leading `<digits><dots>` move number marker.
fn move_number_len(word: &[u8]) -> Option<usize> {
    let digits = word.iter().take_while(|byte| byte.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let dots = word[digits..].iter().take_while(|byte| **byte == b'.').count();
    if dots == 0 {
        return None;
    }
    Some(digits + dots)
}

/// One game's worth of text inside a larger PGN file.
#[derive(Clone, Copy)]
pub struct GameText<'pgn> {
    text: &'pgn str,
    offset: usize,
}

impl<'pgn> GameText<'pgn> {
    pub fn text(&self) -> &'pgn str {
        self.text
    }

    /// Byte offset of this game inside the text it was split from.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Debug for GameText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameText")
            .field("offset", &self.offset)
            .field("len", &self.text.len())
            .finish()
    }
}

const EVENT_TAG: &str = "[Event";

/// Splits a PGN file into games. A game starts right before each `[Event`
/// tag; whitespace-only pieces are dropped.
pub fn split_games(pgn: &str) -> Vec<GameText<'_>> {
    let mut starts = vec![0];
    let mut search_from = 0;
    while let Some(found) = pgn[search_from..].find(EVENT_TAG) {
        let start = search_from + found;
        let after = start + EVENT_TAG.len();
        // `[EventDate` and friends do not open a game
        if pgn[after..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_whitespace())
            && start != 0
        {
            starts.push(start);
        }
        search_from = after;
    }

    let mut games = Vec::with_capacity(starts.len());
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(pgn.len());
        let text = &pgn[*start..end];
        if text.trim().is_empty() {
            continue;
        }
        games.push(GameText {
            text,
            offset: *start,
        });
    }
    debug!("split PGN input into {} game(s)", games.len());
    games
}

/// Looks up `[Name "value"]` in a game's tag section. The tag name matches
/// without regard to ASCII case and the first match wins.
pub fn find_tag(game_text: &str, name: &str) -> Option<String> {
    tag_pairs(game_text)
        .into_iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Every well formed `[Name "value"]` tag pair in source order.
pub fn tag_pairs(game_text: &str) -> Vec<(String, String)> {
    let mut result = Vec::new();
    let mut rest = game_text;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        if let Some((tag, value, remaining)) = match_tag_pair(rest) {
            result.push((tag.to_string(), value.to_string()));
            rest = remaining;
        }
    }
    result
}

/// Matches `Name<whitespace>"value"]` directly after an opening bracket.
fn match_tag_pair(source: &str) -> Option<(&str, &str, &str)> {
    let name_len = source
        .find(|ch: char| ch != '_' && !ch.is_ascii_alphanumeric())
        .unwrap_or(source.len());
    if name_len == 0 {
        return None;
    }
    let (name, rest) = source.split_at(name_len);

    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }

    let value_and_rest = trimmed.strip_prefix('"')?;
    let close_quote = value_and_rest.find('"')?;
    let value = &value_and_rest[..close_quote];
    let remaining = value_and_rest[close_quote + 1..].strip_prefix(']')?;
    Some((name, value, remaining))
}

#[cfg(test)]
mod tests {
    use super::{find_tag, split_games, tag_pairs, tokenize_movetext, GameResult};

    fn token_texts(game: &str) -> Vec<String> {
        tokenize_movetext(game)
            .tokens
            .iter()
            .map(|token| token.text().to_string())
            .collect()
    }

    #[test]
    fn tokenizes_numbered_movetext() {
        let game = "[Event \"Casual\"]\n[White \"Morphy\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0";
        let movetext = tokenize_movetext(game);
        assert_eq!(
            token_texts(game),
            vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]
        );
        assert_eq!(movetext.result, Some(GameResult::WhiteWin));
    }

    #[test]
    fn strips_comments() {
        let game = "1. e4 {best by test} e5 ; classical\n2. Nf3 {a\nmultiline ; comment} Nc6 *";
        assert_eq!(token_texts(game), vec!["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(
            tokenize_movetext(game).result,
            Some(GameResult::Inconclusive)
        );
    }

    #[test]
    fn handles_black_move_numbers_and_glued_tokens() {
        let game = "1.e4 1... c5 2.Nf3 d6 1/2-1/2";
        assert_eq!(token_texts(game), vec!["e4", "c5", "Nf3", "d6"]);
        assert_eq!(tokenize_movetext(game).result, Some(GameResult::Draw));
    }

    #[test]
    fn castling_and_digit_free_moves_are_kept() {
        let game = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O O-O 5. d3 d6";
        assert_eq!(token_texts(game).len(), 10);
        assert_eq!(token_texts(game)[6], "O-O");
    }

    #[test]
    fn falls_back_without_move_numbers() {
        let game = "e4 e5 Nf3 Nc6 0-1";
        let movetext = tokenize_movetext(game);
        assert_eq!(token_texts(game), vec!["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(movetext.result, Some(GameResult::BlackWin));
    }

    #[test]
    fn fallback_drops_single_characters() {
        assert_eq!(token_texts("e4 x e5 - Nf3"), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn spans_point_into_the_game_text() {
        let game = "[Event \"x\"]\n1. e4 {hm} d5 2. exd5";
        let movetext = tokenize_movetext(game);
        for token in movetext.tokens.iter() {
            let range: std::ops::Range<usize> = token.span().into();
            assert_eq!(&game[range], token.text());
        }
        assert_eq!(movetext.result, None);
    }

    #[test]
    fn empty_movetext() {
        assert!(tokenize_movetext("").tokens.is_empty());
        assert!(tokenize_movetext("[Event \"A\"]\n\n*").tokens.is_empty());
    }

    #[test]
    fn splits_games_on_event_tags() {
        let pgn = "[Event \"A\"]\n1. e4 e5\n[Event \"B\"]\n1. d4 d5";
        let games = split_games(pgn);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].text(), "[Event \"A\"]\n1. e4 e5\n");
        assert_eq!(games[1].offset(), pgn.find("[Event \"B\"]").unwrap());
        assert_eq!(find_tag(games[1].text(), "Event").as_deref(), Some("B"));
    }

    #[test]
    fn event_date_does_not_start_a_game() {
        let pgn = "[Event \"A\"]\n[EventDate \"2023.01.01\"]\n1. e4 e5\n\n[Event \"B\"]\n1. d4";
        assert_eq!(split_games(pgn).len(), 2);
    }

    #[test]
    fn leading_text_without_event_is_its_own_game() {
        let games = split_games("1. e4 e5\n[Event \"B\"]\n1. d4");
        assert_eq!(games.len(), 2);
        assert!(split_games("  \n\t").is_empty());
    }

    #[test]
    fn looks_up_tags() {
        let game = "[Event \"Open\"]\n[White \"Carlsen, Magnus\"]\n[WhiteElo \"2830\"]\n1. e4";
        assert_eq!(find_tag(game, "White").as_deref(), Some("Carlsen, Magnus"));
        assert_eq!(find_tag(game, "white").as_deref(), Some("Carlsen, Magnus"));
        assert_eq!(find_tag(game, "WhiteElo").as_deref(), Some("2830"));
        assert_eq!(find_tag(game, "Black"), None);
        assert_eq!(find_tag("[White Carlsen]", "White"), None);
        assert_eq!(find_tag("[White\"Carlsen\"]", "White"), None);
        assert_eq!(tag_pairs(game).len(), 3);
    }
}
