use std::{fs::OpenOptions, io::Read, process::ExitCode};

use chess_common::{Player, Square};
use chess_core::{possible_moves, Game, Session};
use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use env_logger::Env;
use log::{debug, error};
use serde_json::json;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let matches = create_command().get_matches();

    let result = match matches.subcommand() {
        Some(("games", args)) => handle_games_subcommand(args),
        Some(("moves", args)) => handle_moves_subcommand(args),
        Some(("board", args)) => handle_board_subcommand(args),
        Some(("targets", args)) => handle_targets_subcommand(args),
        Some((_, _)) => {
            unreachable!("clap should prevent coming to this branch");
        }
        None => {
            create_command().print_long_help().ok();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn create_command() -> Command {
    let pgn_file = || {
        Arg::new("pgn file")
            .required(true)
            .help("the PGN file to read")
    };
    let game = || {
        Arg::new("game")
            .long("game")
            .short('g')
            .value_parser(value_parser!(usize))
            .help("1-based number of the game to show (default: the last game)")
    };
    let index = || {
        Arg::new("index")
            .long("index")
            .short('i')
            .allow_negative_numbers(true)
            .value_parser(value_parser!(isize))
            .help("show the position after this 0-based move; -1 is the start (default: the end)")
    };
    let json = || {
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("print JSON instead of text")
    };

    command!()
        .subcommand(
            Command::new("games")
                .about("list the games in a PGN file")
                .arg(pgn_file()),
        )
        .subcommand(
            Command::new("moves")
                .about("list the moves of a game")
                .arg(pgn_file())
                .arg(game())
                .arg(json()),
        )
        .subcommand(
            Command::new("board")
                .about("draw the board at a point in a game")
                .arg(pgn_file())
                .arg(game())
                .arg(index())
                .arg(json()),
        )
        .subcommand(
            Command::new("targets")
                .about("list the squares the piece on a square can move to")
                .arg(pgn_file())
                .arg(
                    Arg::new("square")
                        .required(true)
                        .value_parser(|value: &str| value.parse::<Square>())
                        .help("a square such as e2"),
                )
                .arg(game())
                .arg(index()),
        )
}

/// A PGN file read into memory together with the games found in it.
struct LoadedPgn {
    files: SimpleFiles<String, String>,
    file_id: usize,
    session: Session,
}

impl LoadedPgn {
    fn load(args: &ArgMatches) -> Result<LoadedPgn, ()> {
        let file_name = args
            .get_one::<String>("pgn file")
            .expect("'pgn file' is required");

        let mut pgn = String::new();
        match OpenOptions::new().read(true).write(false).open(file_name) {
            Err(err) => {
                error!("Failed to open {file_name}. Inner error: {err}");
                return Err(());
            }
            Ok(mut file) => {
                if let Err(err) = file.read_to_string(&mut pgn) {
                    error!("Failed to read {file_name}. Inner error: {err}");
                    return Err(());
                }
            }
        }

        let session = Session::new().load_pgn(&pgn);
        let mut files = SimpleFiles::new();
        let file_id = files.add(file_name.clone(), pgn);

        match session {
            Err(err) => {
                error!("Failed to load {file_name}: {err}");
                let diagnostic = Diagnostic::error().with_message(err.to_string());
                emit(&files, &diagnostic);
                Err(())
            }
            Ok(session) => {
                debug!("loaded {} game(s) from {file_name}", session.games().len());
                Ok(LoadedPgn {
                    files,
                    file_id,
                    session,
                })
            }
        }
    }

    /// Applies `--game` and `--index`, when the subcommand takes them.
    fn navigate(&self, args: &ArgMatches) -> Result<Session, ()> {
        let mut session = self.session.clone();

        if let Some(game) = args.get_one::<usize>("game") {
            let count = session.games().len();
            if *game == 0 || *game > count {
                error!("There is no game {game}. The file holds {count} game(s)");
                return Err(());
            }
            session = session.select_game(game - 1);
        }

        if let Ok(Some(index)) = args.try_get_one::<isize>("index") {
            session = session.navigate_to_move(*index);
        }

        Ok(session)
    }

    fn report_skipped_moves(&self, game: &Game) {
        for skipped in game.diagnostics() {
            let diagnostic = Diagnostic::warning()
                .with_message(format!("skipped move \"{}\"", skipped.token()))
                .with_label(
                    Label::primary(self.file_id, skipped.span())
                        .with_message(skipped.reason().to_string()),
                )
                .with_note(format!("token {} of the game", skipped.ply()));
            emit(&self.files, &diagnostic);
        }
    }

    fn report_active_game(&self, session: &Session) {
        if let Some(game) = session.active_game().and_then(|index| session.games().get(index)) {
            self.report_skipped_moves(game);
        }
    }
}

fn emit(files: &SimpleFiles<String, String>, diagnostic: &Diagnostic<usize>) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = codespan_reporting::term::Config::default();
    term::emit(&mut writer.lock(), &config, files, diagnostic).ok();
}

fn player_name(player: Player) -> &'static str {
    match player {
        Player::White => "White",
        Player::Black => "Black",
    }
}

fn handle_games_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let loaded = LoadedPgn::load(args)?;
    for (index, game) in loaded.session.games().iter().enumerate() {
        loaded.report_skipped_moves(game);
        println!(
            "{}. {} - {} move(s) - {}",
            index + 1,
            game.white_player_name(),
            game.moves().len(),
            game.result().as_ref().map_or("?", |result| result.as_ref())
        );
    }
    Ok(())
}

fn handle_moves_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let loaded = LoadedPgn::load(args)?;
    let session = loaded.navigate(args)?;
    loaded.report_active_game(&session);

    if args.get_flag("json") {
        match serde_json::to_string_pretty(session.moves()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!("Failed to write moves as JSON. Inner error: {err}");
                return Err(());
            }
        }
        return Ok(());
    }

    for move_ in session.moves() {
        let capture = match move_.captured() {
            Some(_) => "x",
            None => "-",
        };
        println!(
            "{:>4}. {:<8} {}{}{}",
            move_.move_number(),
            move_.notation(),
            move_.from(),
            capture,
            move_.to()
        );
    }
    Ok(())
}

fn handle_board_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let loaded = LoadedPgn::load(args)?;
    let session = loaded.navigate(args)?;
    loaded.report_active_game(&session);

    if args.get_flag("json") {
        let view = json!({
            "index": session.current_move_index(),
            "position": session.position(),
            "fen": session.board().to_fen_placement(),
            "last_move": session.last_move(),
        });
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!("Failed to write the board as JSON. Inner error: {err}");
                return Err(());
            }
        }
        return Ok(());
    }

    print!("{}", session.board());
    match session.last_move() {
        Some(last) => println!(
            "after {}. {}, {} to move",
            last.move_number(),
            last.notation(),
            player_name(session.player_to_move())
        ),
        None => println!(
            "starting position, {} to move",
            player_name(session.player_to_move())
        ),
    }
    Ok(())
}

fn handle_targets_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let loaded = LoadedPgn::load(args)?;
    let session = loaded.navigate(args)?;
    let square = *args
        .get_one::<Square>("square")
        .expect("'square' is required");

    let Some(piece) = session.board().at(square) else {
        error!("There is no piece on {square}");
        return Err(());
    };

    let mut targets = possible_moves(session.board(), square, piece);
    targets.sort_by_key(|target| (target.col(), std::cmp::Reverse(target.row())));
    let targets = targets
        .iter()
        .map(|target| target.to_string())
        .collect::<Vec<_>>();
    println!("{}", targets.join(" "));
    Ok(())
}
