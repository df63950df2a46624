//! NoGo-Solver: a NoGo engine with an exact solver.
//!
//! ## Usage
//!
//! - `nogo-solver` - Start the GTP server (same as `nogo-solver gtp`)
//! - `nogo-solver solve --moves "b c3 w b2"` - Solve a position from the command line
//! - `nogo-solver demo` - Solve the empty board for a few small sizes
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nogo_solver::board::Board;
use nogo_solver::config::EngineConfig;
use nogo_solver::constants::{DEFAULT_SIZE, DEFAULT_TIME_LIMIT};
use nogo_solver::gtp::GtpEngine;
use nogo_solver::notation::{coord_to_point, format_point, parse_color, parse_coord};
use nogo_solver::timeout::{Deadline, SolveResult, solve_until};

/// NoGo-Solver: play and exactly solve NoGo positions
#[derive(Parser)]
#[command(name = "nogo-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board size (2-25)
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Solver time limit in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIME_LIMIT)]
    time_limit: u64,

    /// Seed for the random move generator
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GoGui
    Gtp,
    /// Solve one position and print the winner
    Solve {
        /// Moves to play first, as color/vertex pairs: "b c3 w b2"
        #[arg(long, default_value = "")]
        moves: String,
    },
    /// Solve the empty board for small sizes
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = EngineConfig {
        size: cli.size,
        time_limit: cli.time_limit,
        seed: cli.seed,
    };

    match cli.command {
        Some(Commands::Gtp) | None => {
            let mut engine = GtpEngine::with_config(&config)?;
            engine.run()
        }
        Some(Commands::Solve { moves }) => run_solve(&config, &moves),
        Some(Commands::Demo) => run_demo(config.time_limit),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_solve(config: &EngineConfig, moves: &str) -> Result<()> {
    let mut board = Board::new(config.size)?;
    let tokens: Vec<&str> = moves.split_whitespace().collect();
    for pair in tokens.chunks(2) {
        let [color, vertex] = pair else {
            bail!("moves must come in color/vertex pairs");
        };
        let color = parse_color(color)?;
        let pt = coord_to_point(parse_coord(vertex, board.size)?, board.size);
        board
            .play(pt, color)
            .with_context(|| format!("cannot play {vertex}"))?;
    }
    println!("{board}");

    // Ctrl-C stops the search the same way the time limit does.
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to set Ctrl-C handler")?;

    let deadline = Deadline::after_secs(config.time_limit).with_stop_flag(stop);
    let start = Instant::now();
    let result = solve_until(&board, deadline);
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        SolveResult::Solved { to_play, outcome } => match outcome.proving_move {
            Some(mv) if outcome.win => println!(
                "{} wins with {} ({elapsed:.2}s)",
                to_play.name(),
                format_point(mv, board.size)?
            ),
            _ => println!("{} wins ({elapsed:.2}s)", to_play.opponent().name()),
        },
        SolveResult::Unknown => println!("unknown ({elapsed:.2}s)"),
    }
    Ok(())
}

fn run_demo(time_limit: u64) -> Result<()> {
    println!("NoGo-Solver: exact solves of the empty board\n");
    for size in 2..=5 {
        let board = Board::new(size)?;
        let start = Instant::now();
        let result = solve_until(&board, Deadline::after_secs(time_limit));
        let elapsed = start.elapsed().as_secs_f64();
        let verdict = match result.winner() {
            Some(color) => format!("{} wins", color.name()),
            None => "unknown".to_string(),
        };
        println!("{size}x{size}: {verdict} ({elapsed:.2}s)");
    }
    Ok(())
}
