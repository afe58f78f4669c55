//! # nonogram
//!
//! `nonogram` is a command-line solver for nonogram (paint-by-numbers)
//! puzzles. It compiles the row and column hints of a puzzle into a CNF
//! formula and hands that formula to a SAT backend, then decodes the model
//! back into a grid.
//!
//! Two encodings are available:
//! 1.  **Placement**: every valid pattern of every line is enumerated and the
//!     line is constrained to be one of them. Compact for tight lines, but the
//!     formula grows combinatorially with slack.
//! 2.  **Run-position**: every cell carries a progress counter that may only
//!     advance through the values the hints allow. Grows with line length,
//!     not with slack.
//!
//! `auto` (the default) picks placements while the puzzle is small.
//!
//! ## Usage
//!
//! ```sh
//! nonogram [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! -   `nonogram puzzle.non`: solve a puzzle file with default options.
//! -   `nonogram solve --path puzzle.non [--encoding run-position] [--prefill]
//!     [--seed-overlap] [--export-dimacs] [--count N]`: solve with explicit
//!     options; `--count N` lists up to `N` solutions and reports uniqueness.
//! -   `nonogram overlap --path puzzle.non`: run only the overlap pass.
//! -   `nonogram dir --path puzzles/`: solve every `.non`/`.nonogram` file below a directory.
//! -   `nonogram generate --width 10 --height 10 [--density 0.5] [--seed 7]`:
//!     print a random solvable puzzle.
//! -   `nonogram completions bash`: print shell completions.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: debug logging (`RUST_LOG` overrides the level).
//! -   `-v, --verify <BOOL>`: check decoded grids against the hints (default: `true`).
//! -   `-s, --stats <BOOL>`: print the statistics table (default: `true`).
//! -   `-p, --print-solution`: print the raw model.
//!
//! ## Puzzle format
//!
//! ```text
//! # a heart
//! 5 4
//! 2 2
//! 5
//! 3
//! 1
//! 2
//! 3
//! 3
//! 3
//! 2
//! ```
//!
//! The first line gives the width and height, followed by one line of hints
//! per row and then one per column. Lines starting with `#` and blank lines
//! are ignored; a line `0` stands for a row or column with no filled cells.
//!
//! ## Exit status
//!
//! `0` when the puzzle was processed, whether or not it has a solution, `1`
//! for unreadable paths and backend failures, `2` for malformed puzzles.

use crate::command_line::cli::{
    Cli, Commands, CommonOptions, SolveArgs, generate_nonogram, overlap_nonogram, solve_dir,
    solve_nonogram,
};
use clap::{CommandFactory, Parser};
use nonogram_sat::nonogram::error::NonogramError;
use std::process::ExitCode;

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Installs `env_logger`; `--debug` lowers the default level from `warn` to `debug`.
fn init_logging(common: &CommonOptions) {
    let level = if common.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn exit_code(result: Result<(), NonogramError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_format_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let common = match &cli.command {
        Some(
            Commands::Solve { common, .. }
            | Commands::Overlap { common, .. }
            | Commands::Dir { common, .. },
        ) => common,
        _ => &cli.common,
    };
    init_logging(common);

    let result = match cli.command {
        Some(Commands::Solve { path, solve, common }) => solve_nonogram(&path, &solve, &common),
        Some(Commands::Overlap { path, common }) => overlap_nonogram(&path, &common),
        Some(Commands::Dir { path, solve, common }) => solve_dir(&path, &solve, &common),
        Some(Commands::Generate {
            width,
            height,
            density,
            seed,
            with_grid,
        }) => {
            generate_nonogram(width, height, density, seed, with_grid);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            if let Some(path) = cli.path {
                solve_nonogram(&path, &SolveArgs::default(), &cli.common)
            } else {
                eprintln!("No puzzle given. Use --help for usage.");
                return ExitCode::FAILURE;
            }
        }
    };
    exit_code(result)
}
