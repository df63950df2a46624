//! Go Text Protocol (GTP) front end for the NoGo engine.
//!
//! Implements the GTP version 2 framing plus the commands GoGui uses for
//! NoGo, so the engine can be driven from GoGui or a regression script.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <size>` - Reset to an empty board of the given size (2-25)
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Accepted and stored; NoGo has no scoring
//! - `showboard` - Print the board
//! - `play <color> <vertex>` - Play a move; answers `illegal move` if not allowed
//! - `genmove <color>` - Pick, play and print a move, or `resign`
//! - `solve` - Solve the position: `<color> <move>` for a win, the winning
//!   color for a loss, `unknown` if the time limit runs out
//! - `timelimit <seconds>` - Time limit for `solve` and `genmove`
//! - `gogui-analyze_commands` and the `gogui-rules_*` family
//!
//! ## Example
//!
//! ```ignore
//! use nogo_solver::gtp::GtpEngine;
//! let mut engine = GtpEngine::new();
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::board::{Board, Point};
use crate::config::EngineConfig;
use crate::constants::{DEFAULT_TIME_LIMIT, ENGINE_NAME, GAME_ID};
use crate::notation::{Coord, coord_to_point, format_point, parse_color, parse_coord};
use crate::player::RandomPlayer;
use crate::solver::Outcome;
use crate::timeout::{SolveResult, solve_with_timeout};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "gogui-analyze_commands",
    "gogui-rules_board",
    "gogui-rules_board_size",
    "gogui-rules_final_result",
    "gogui-rules_game_id",
    "gogui-rules_legal_moves",
    "gogui-rules_side_to_move",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "solve",
    "timelimit",
    "version",
];

/// Commands with a fixed argument count, and their usage message.
const ARG_COUNTS: &[(&str, usize, &str)] = &[
    ("boardsize", 1, "Usage: boardsize INT"),
    ("komi", 1, "Usage: komi FLOAT"),
    ("known_command", 1, "Usage: known_command CMD_NAME"),
    ("genmove", 1, "Usage: genmove {w,b}"),
    ("play", 2, "Usage: play {b,w} MOVE"),
    ("timelimit", 1, "Usage: timelimit INT"),
];

const ANALYZE_COMMANDS: &str = "pstring/Legal Moves For ToPlay/gogui-rules_legal_moves\n\
                                pstring/Side to Play/gogui-rules_side_to_move\n\
                                pstring/Final Result/gogui-rules_final_result\n\
                                pstring/Board Size/gogui-rules_board_size\n\
                                pstring/Rules GameID/gogui-rules_game_id\n\
                                pstring/Show Board/gogui-rules_board";

/// GTP engine state.
pub struct GtpEngine {
    /// The live game; only `play`, `genmove` and resets touch it
    board: Board,
    /// Candidate moves for `genmove`
    player: RandomPlayer,
    /// Seconds allowed per solve
    time_limit: u64,
    komi: f32,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GtpEngine {
    /// Create a new GTP engine with default settings.
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            player: RandomPlayer::new(),
            time_limit: DEFAULT_TIME_LIMIT,
            komi: 0.0,
        }
    }

    /// Create an engine from startup settings.
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        let board = Board::new(config.size).context("invalid initial board size")?;
        let player = config
            .seed
            .map_or_else(RandomPlayer::new, RandomPlayer::with_seed);
        Ok(Self {
            board,
            player,
            time_limit: config.time_limit,
            komi: 0.0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn time_limit(&self) -> u64 {
        self.time_limit
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams until EOF or `quit`.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            output.write_all(Self::format_response(id, success, &message).as_bytes())?;
            output.flush()?;

            // Quit if requested
            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Frame a response: `=id body` or `?id message`, then a blank line.
    pub fn format_response(id: Option<u32>, success: bool, message: &str) -> String {
        let prefix = if success { '=' } else { '?' };
        let id_str = id.map(|i| i.to_string()).unwrap_or_default();
        format!("{prefix}{id_str} {message}\n\n")
    }

    /// Execute a GTP command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        if let Some(&(_, _, usage)) = ARG_COUNTS
            .iter()
            .find(|&&(name, count, _)| name == command && count != args.len())
        {
            return (false, usage.to_string());
        }

        debug!(command, ?args, "gtp command");
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(e) => {
                warn!(command, error = %e, "command failed");
                (false, format!("{e:#}"))
            }
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(ENGINE_NAME.to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let size: usize = args[0].parse().context("invalid size")?;
                self.board.reset(size)?;
                info!(size, "board reset");
                Ok(String::new())
            }

            "clear_board" => {
                self.board.reset(self.board.size)?;
                Ok(String::new())
            }

            "komi" => {
                self.komi = args[0].parse().context("invalid komi")?;
                Ok(String::new())
            }

            "showboard" => Ok(format!("\n{}", self.board).trim_end().to_string()),

            "play" => self.play(args[0], args[1]),

            "genmove" => self.genmove(args[0]),

            "solve" => self.solve(),

            "timelimit" => {
                let seconds: u64 = args[0].parse().context("Usage: timelimit INT")?;
                self.time_limit = seconds;
                info!(seconds, "time limit set");
                Ok(String::new())
            }

            "gogui-analyze_commands" => Ok(ANALYZE_COMMANDS.to_string()),

            "gogui-rules_game_id" => Ok(GAME_ID.to_string()),

            "gogui-rules_board_size" => Ok(self.board.size.to_string()),

            "gogui-rules_side_to_move" => Ok(self.board.current_player.name().to_string()),

            "gogui-rules_board" => Ok(self.board.rules_board_string().trim_end().to_string()),

            "gogui-rules_legal_moves" => {
                let to_play = self.board.current_player;
                let mut moves = self
                    .board
                    .legal_moves(to_play)
                    .into_iter()
                    .map(|pt| format_point(pt, self.board.size))
                    .collect::<Result<Vec<_>, _>>()?;
                moves.sort();
                Ok(moves.join(" "))
            }

            "gogui-rules_final_result" => {
                let to_play = self.board.current_player;
                if self.board.legal_moves(to_play).is_empty() {
                    Ok(to_play.opponent().name().to_string())
                } else {
                    Ok("unknown".to_string())
                }
            }

            _ => bail!("unknown command: {command}"),
        }
    }

    fn play(&mut self, color: &str, vertex: &str) -> Result<String> {
        let color = parse_color(color)?;
        let coord = parse_coord(vertex, self.board.size)?;
        if coord == Coord::Pass {
            return Ok("illegal move".to_string());
        }

        let pt = coord_to_point(coord, self.board.size);
        match self.board.play(pt, color) {
            Ok(()) => Ok(String::new()),
            Err(e) => {
                debug!(vertex, reason = %e, "rejected move");
                Ok("illegal move".to_string())
            }
        }
    }

    fn genmove(&mut self, color: &str) -> Result<String> {
        let color = parse_color(color)?;
        let Some(candidate) = self.player.get_move(&self.board, color) else {
            return Ok("resign".to_string());
        };

        // Solve with `color` to move, whoever the board thinks is next.
        let mut position = self.board.clone();
        position.current_player = color;
        let mv = match solve_with_timeout(&position, self.time_limit) {
            SolveResult::Solved { outcome, .. } if outcome.win => proving_move(outcome)?,
            _ => candidate,
        };

        match self.board.play(mv, color) {
            Ok(()) => self.vertex(mv),
            Err(_) => Ok("resign".to_string()),
        }
    }

    fn solve(&self) -> Result<String> {
        Ok(match solve_with_timeout(&self.board, self.time_limit) {
            SolveResult::Solved { to_play, outcome } if outcome.win => {
                let mv = proving_move(outcome)?;
                format!("{} {}", to_play.letter(), self.vertex(mv)?)
            }
            SolveResult::Solved { to_play, .. } => to_play.opponent().letter().to_string(),
            SolveResult::Unknown => "unknown".to_string(),
        })
    }

    fn vertex(&self, pt: Point) -> Result<String> {
        Ok(format_point(pt, self.board.size)?.to_lowercase())
    }
}

/// A proven win always carries its move; anything else is a solver bug.
fn proving_move(outcome: Outcome) -> Result<Point> {
    outcome
        .proving_move
        .context("solver proved a win without a move")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    fn engine(size: usize) -> GtpEngine {
        GtpEngine::with_config(&EngineConfig {
            size,
            time_limit: 10,
            seed: Some(3),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_format_response() {
        assert_eq!(GtpEngine::format_response(Some(4), true, "b a1"), "=4 b a1\n\n");
        assert_eq!(GtpEngine::format_response(None, false, "oops"), "? oops\n\n");
    }

    #[test]
    fn test_name_command() {
        let mut engine = GtpEngine::new();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "nogo-solver");
    }

    #[test]
    fn test_known_command() {
        let mut engine = GtpEngine::new();
        assert_eq!(engine.execute("known_command", &["solve"]), (true, "true".to_string()));
        assert_eq!(
            engine.execute("known_command", &["unknown_cmd"]),
            (true, "false".to_string())
        );
    }

    #[test]
    fn test_argument_count_checked() {
        let mut engine = GtpEngine::new();
        assert_eq!(
            engine.execute("play", &["b"]),
            (false, "Usage: play {b,w} MOVE".to_string())
        );
        assert_eq!(
            engine.execute("timelimit", &[]),
            (false, "Usage: timelimit INT".to_string())
        );
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine(7);
        assert!(engine.execute("boardsize", &["9"]).0);
        assert_eq!(engine.board().size, 9);
        assert!(!engine.execute("boardsize", &["26"]).0);
        assert!(!engine.execute("boardsize", &["nine"]).0);
        assert_eq!(engine.board().size, 9);
    }

    #[test]
    fn test_timelimit() {
        let mut engine = engine(7);
        assert!(engine.execute("timelimit", &["5"]).0);
        assert_eq!(engine.time_limit(), 5);
        assert!(!engine.execute("timelimit", &["-1"]).0);
        assert_eq!(engine.time_limit(), 5);
    }

    #[test]
    fn test_komi() {
        let mut engine = engine(7);
        assert!(engine.execute("komi", &["6.5"]).0);
        assert_eq!(engine.komi(), 6.5);
        assert!(!engine.execute("komi", &["lots"]).0);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = engine(5);
        assert_eq!(engine.execute("play", &["black", "C3"]), (true, String::new()));
        assert_eq!(engine.board().current_player, Color::White);

        assert!(engine.execute("clear_board", &[]).0);
        assert_eq!(engine.board().empty_points().count(), 25);
        assert_eq!(engine.board().current_player, Color::Black);
    }

    #[test]
    fn test_play_pass_is_illegal() {
        let mut engine = engine(5);
        let before = engine.board().clone();
        assert_eq!(engine.execute("play", &["b", "pass"]), (true, "illegal move".to_string()));
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_play_occupied_is_illegal() {
        let mut engine = engine(5);
        engine.execute("play", &["b", "a1"]);
        let before = engine.board().clone();
        assert_eq!(engine.execute("play", &["w", "a1"]), (true, "illegal move".to_string()));
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_play_bad_color() {
        let mut engine = engine(5);
        let (success, response) = engine.execute("play", &["x", "a1"]);
        assert!(!success);
        assert!(response.contains("invalid color"));
    }

    #[test]
    fn test_solve_on_loss_reports_opponent() {
        let mut engine = engine(2);
        engine.execute("play", &["b", "a1"]);
        engine.execute("play", &["b", "b2"]);
        assert_eq!(engine.execute("solve", &[]), (true, "b".to_string()));
    }

    #[test]
    fn test_solve_on_win_reports_move() {
        let mut engine = engine(3);
        assert_eq!(engine.execute("solve", &[]), (true, "b a1".to_string()));
        // The live board is not touched by a solve.
        assert_eq!(engine.board().empty_points().count(), 9);
    }

    #[test]
    fn test_solve_zero_time_limit_is_unknown() {
        let mut engine = engine(5);
        engine.execute("timelimit", &["0"]);
        assert_eq!(engine.execute("solve", &[]), (true, "unknown".to_string()));
    }

    #[test]
    fn test_largest_time_limit_still_solves() {
        let mut engine = engine(3);
        let limit = u64::MAX.to_string();
        assert!(engine.execute("timelimit", &[limit.as_str()]).0);
        assert_eq!(engine.execute("solve", &[]), (true, "b a1".to_string()));
        assert_eq!(engine.execute("genmove", &["b"]), (true, "a1".to_string()));
    }

    #[test]
    fn test_genmove_plays_winning_move() {
        let mut engine = engine(3);
        assert_eq!(engine.execute("genmove", &["b"]), (true, "a1".to_string()));
        let a1 = engine.board().point(1, 1);
        assert_eq!(engine.board().get(a1), crate::board::Cell::Black);
        assert_eq!(engine.board().current_player, Color::White);
    }

    #[test]
    fn test_genmove_resigns_without_moves() {
        let mut engine = engine(2);
        engine.execute("play", &["b", "a1"]);
        engine.execute("play", &["b", "b2"]);
        assert_eq!(engine.execute("genmove", &["w"]), (true, "resign".to_string()));
    }

    #[test]
    fn test_gogui_rules_commands() {
        let mut engine = engine(2);
        assert_eq!(engine.execute("gogui-rules_game_id", &[]).1, "NoGo");
        assert_eq!(engine.execute("gogui-rules_board_size", &[]).1, "2");
        assert_eq!(engine.execute("gogui-rules_legal_moves", &[]).1, "A1 A2 B1 B2");
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "unknown");

        engine.execute("play", &["b", "a1"]);
        engine.execute("play", &["b", "b2"]);
        assert_eq!(engine.execute("gogui-rules_side_to_move", &[]).1, "white");
        assert_eq!(engine.execute("gogui-rules_board", &[]).1, ".X\nX.");
        assert_eq!(engine.execute("gogui-rules_legal_moves", &[]).1, "");
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "black");
    }

    #[test]
    fn test_unknown_command() {
        let mut engine = GtpEngine::new();
        let (success, response) = engine.execute("frobnicate", &[]);
        assert!(!success);
        assert_eq!(response, "unknown command: frobnicate");
    }
}
