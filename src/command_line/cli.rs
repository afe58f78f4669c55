#![allow(clippy::cast_precision_loss)]

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use nonogram_sat::encoding::Encoding;
use nonogram_sat::nonogram::error::NonogramError;
use nonogram_sat::nonogram::generator::random_puzzle;
use nonogram_sat::nonogram::overlap;
use nonogram_sat::nonogram::puzzle::{Cell, Puzzle};
use nonogram_sat::nonogram::solver::{Session, SolveOutcome, SolveStats, SolverOptions};
use nonogram_sat::sat::backend::SatBackend;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the nonogram solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "nonogram", version, about = "A nonogram solver built on SAT encodings")]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand, it's
    /// treated as a puzzle file to solve with the default encoding.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `overlap`, `dir`, `generate`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file by compiling it to CNF.
    Solve {
        /// Path to the puzzle description.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        solve: SolveArgs,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Run only the overlap pass and print the partial grid (`X` marks unknown cells).
    Overlap {
        /// Path to the puzzle description.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.non` and `.nonogram` file below a directory.
    Dir {
        /// Directory to search.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        solve: SolveArgs,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print a random, solvable puzzle in the description format.
    Generate {
        #[arg(long, value_parser = positive())]
        width: usize,

        #[arg(long, value_parser = positive())]
        height: usize,

        /// Probability that a cell of the hidden grid is filled.
        #[arg(long, default_value_t = 0.5)]
        density: f64,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Also print the hidden grid, as comment lines.
        #[arg(long, default_value_t = false)]
        with_grid: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options that shape how a puzzle is encoded and submitted.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SolveArgs {
    /// Line encoding. `auto` picks placements for small puzzles.
    #[arg(long, value_enum, default_value_t = Encoding::Auto)]
    pub(crate) encoding: Encoding,

    /// Run the overlap pass first and print the partial grid.
    #[arg(long, default_value_t = false)]
    pub(crate) prefill: bool,

    /// Add cells forced by the overlap pass to the formula.
    #[arg(long, default_value_t = false)]
    pub(crate) seed_overlap: bool,

    /// Write the generated formula next to the puzzle as `<path>.cnf`.
    #[arg(short, long, default_value_t = false)]
    pub(crate) export_dimacs: bool,

    /// Enumerate up to this many solutions instead of stopping at the first.
    #[arg(long, value_parser = positive())]
    pub(crate) count: Option<usize>,
}

/// Accepts integers of at least 1.
fn positive() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every decoded grid against the hints.
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment (model) as signed literals.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verify: true,
            stats: true,
            print_solution: false,
        }
    }
}

impl SolveArgs {
    pub(crate) const fn options(&self, common: &CommonOptions) -> SolverOptions {
        SolverOptions {
            encoding: self.encoding,
            prefill: self.prefill,
            seed_overlap: self.seed_overlap,
            verify: common.verify,
        }
    }
}

/// Reads a puzzle file, timing the parse.
fn read_puzzle(path: &Path) -> Result<(Puzzle, Duration), NonogramError> {
    let time = Instant::now();
    let puzzle = Puzzle::from_file(path)?;
    log::debug!("parsed {}: {}x{}", path.display(), puzzle.width(), puzzle.height());
    Ok((puzzle, time.elapsed()))
}

/// Solves a puzzle file and reports the result.
///
/// Prints `UNSATISFIABLE` for puzzles without a solution; that is not an error.
///
/// # Errors
///
/// I/O errors for unreadable files, format errors for malformed puzzles, and
/// backend or verification failures.
pub(crate) fn solve_nonogram(
    path: &Path,
    args: &SolveArgs,
    common: &CommonOptions,
) -> Result<(), NonogramError> {
    let (mut puzzle, parse_time) = read_puzzle(path)?;
    println!("Solving: {}", path.display());

    let mut session = Session::new(args.options(common));
    if let Some(limit) = args.count {
        return count_solutions(&mut session, &mut puzzle, limit, parse_time, common);
    }

    let encoded = session.encode(&mut puzzle)?;
    if args.prefill || args.seed_overlap {
        println!("Overlap:\n{}", puzzle.grid());
    }
    if args.export_dimacs {
        let dimacs_path = format!("{}.cnf", path.display());
        std::fs::write(&dimacs_path, encoded.cnf.to_string())?;
        println!("DIMACS written to: {dimacs_path}");
    }

    let outcome = session.solve_encoded(&puzzle, &encoded)?;

    if common.stats {
        print_stats(parse_time, &puzzle, &session);
    }
    if common.print_solution {
        if let Some(model) = session.model() {
            println!("Solutions: {model}");
        }
    }
    match outcome {
        SolveOutcome::Solved(grid) => println!("\nSATISFIABLE\n{grid}"),
        SolveOutcome::Unsolvable => println!("\nUNSATISFIABLE"),
    }
    Ok(())
}

fn count_solutions<B: SatBackend>(
    session: &mut Session<B>,
    puzzle: &mut Puzzle,
    limit: usize,
    parse_time: Duration,
    common: &CommonOptions,
) -> Result<(), NonogramError> {
    let grids = session.solutions(puzzle, limit)?;
    if common.stats {
        print_stats(parse_time, puzzle, session);
    }
    for (i, grid) in grids.iter().enumerate() {
        println!("\nSolution {}:\n{grid}", i + 1);
    }
    match grids.len() {
        0 => println!("\nUNSATISFIABLE"),
        1 if limit > 1 => println!("\nSATISFIABLE (unique)"),
        n if n < limit => println!("\nSATISFIABLE ({n} solutions)"),
        n => println!("\nSATISFIABLE (at least {n} solutions)"),
    }
    Ok(())
}

/// Runs the overlap pass alone and prints the partially known grid.
///
/// # Errors
///
/// I/O errors for unreadable files and format errors for malformed puzzles.
pub(crate) fn overlap_nonogram(path: &Path, common: &CommonOptions) -> Result<(), NonogramError> {
    let (mut puzzle, parse_time) = read_puzzle(path)?;
    let time = Instant::now();
    let marked = overlap::apply(&mut puzzle)?;
    let elapsed = time.elapsed();

    if common.stats {
        let cells = puzzle.width() * puzzle.height();
        println!("\n=======================[ Overlap Statistics ]=========================");
        stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
        stat_line("Grid", format!("{}x{}", puzzle.width(), puzzle.height()));
        stat_line("Cells forced", marked);
        stat_line(
            "Cells unknown",
            cells - puzzle.grid().count(Cell::Filled),
        );
        stat_line("CPU time (s)", format!("{:.6}", elapsed.as_secs_f64()));
        println!("=====================================================================");
    }
    println!("{}", puzzle.grid());
    Ok(())
}

/// Solves a directory of puzzle files.
///
/// Iterates over every `.non` and `.nonogram` file below `path` and reports
/// each one in turn.
///
/// # Errors
///
/// If `path` is not a directory, or the first error any file produces.
pub(crate) fn solve_dir(path: &Path, args: &SolveArgs, common: &CommonOptions) -> Result<(), NonogramError> {
    if !path.is_dir() {
        return Err(NonogramError::Io(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("provided path is not a directory: {}", path.display()),
        )));
    }

    let mut solved = 0;
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path
            .extension()
            .is_none_or(|ext| ext != "non" && ext != "nonogram")
        {
            log::debug!("skipping non-puzzle file: {}", file_path.display());
            continue;
        }
        solve_nonogram(file_path, args, common)?;
        solved += 1;
    }
    println!("\nProcessed {solved} puzzle files");
    Ok(())
}

/// Prints a random puzzle in the description format.
pub(crate) fn generate_nonogram(width: usize, height: usize, density: f64, seed: Option<u64>, with_grid: bool) {
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let (puzzle, grid) = random_puzzle(width, height, density, &mut rng);
    if with_grid {
        for line in grid.to_string().lines() {
            println!("# {line}");
        }
    }
    print!("{puzzle}");
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Allocated and resident memory in MiB, or zeros when jemalloc cannot say.
fn memory_usage() -> (f64, f64) {
    let _ = epoch::advance();
    let allocated = stats::allocated::read().unwrap_or(0);
    let resident = stats::resident::read().unwrap_or(0);
    (
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    )
}

/// Prints a summary of problem and search statistics for the last call on `session`.
pub(crate) fn print_stats<B: SatBackend>(parse_time: Duration, puzzle: &Puzzle, session: &Session<B>) {
    let s: &SolveStats = session.stats();
    let (allocated, resident) = memory_usage();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Grid", format!("{}x{}", puzzle.width(), puzzle.height()));
    stat_line("Encoding", s.encoding);
    stat_line("Variables", s.variables);
    stat_line("Clauses", s.clauses);
    stat_line("Literals", s.literals);
    stat_line("Cells prefilled", s.prefilled);
    stat_line("Feasibility sets", session.cache().len());
    println!("========================[ Search Statistics ]========================");
    stat_line("Backend", session.backend().name());
    stat_line("Submissions", s.submissions);
    stat_line("Encode time (s)", format!("{:.3}", s.encode_time.as_secs_f64()));
    stat_line("Solve time (s)", format!("{:.3}", s.solve_time.as_secs_f64()));
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_count_must_be_positive() {
        assert!(Cli::try_parse_from(["nonogram", "solve", "--path", "d.non", "--count", "0"]).is_err());

        let cli = Cli::try_parse_from(["nonogram", "solve", "--path", "d.non", "--count", "2"]).unwrap();
        let Some(Commands::Solve { solve, .. }) = cli.command else {
            panic!("expected the solve subcommand");
        };
        assert_eq!(solve.count, Some(2));
    }

    #[test]
    fn test_generate_dimensions_must_be_positive() {
        for args in [["--width", "0", "--height", "3"], ["--width", "3", "--height", "0"]] {
            let argv = ["nonogram", "generate"].into_iter().chain(args);
            assert!(Cli::try_parse_from(argv).is_err());
        }
        let cli = Cli::try_parse_from(["nonogram", "generate", "--width", "4", "--height", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Generate { width: 4, height: 2, .. })
        ));
    }
}
