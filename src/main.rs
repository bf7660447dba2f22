//! T-Tetracube Packing Solver
//!
//! Packs an N x N x N cube with T-shaped tetracubes so every cell is
//! covered exactly once. Prints the first packing(s) as layered text,
//! saves them to disk and provides an interactive 3D viewer.

mod visualization;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use tetracube::config::{check_size, DEFAULT_SIZE};
use tetracube::{
    enumerate_placements, format_board, persistence, Board, LogObserver, PackingMode, PieceId,
    PuzzleConfig, TouchingOrder,
};

/// Packs a cubic lattice with T-tetracubes.
#[derive(Parser)]
#[command(name = "tetracube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    puzzle: PuzzleArgs,

    /// Directory holding solutions.txt and solutions.bin.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct PuzzleArgs {
    /// Lattice side length.
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Number of pieces to place (defaults to size^3 / 4).
    #[arg(short, long)]
    pieces: Option<PieceId>,

    /// Allow packings that leave cells empty.
    #[arg(long)]
    partial: bool,

    /// Shuffle the candidate order with this seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of solutions to find (at least 1).
    #[arg(short, long, default_value_t = NonZeroUsize::MIN)]
    count: NonZeroUsize,
}

impl PuzzleArgs {
    fn config(&self) -> PuzzleConfig {
        let exact = PuzzleConfig::exact(self.size);
        PuzzleConfig {
            size: self.size,
            pieces: self.pieces.unwrap_or(exact.pieces),
            mode: if self.partial {
                PackingMode::Partial
            } else {
                PackingMode::Exact
            },
        }
    }

    fn order(&self) -> TouchingOrder {
        match self.seed {
            Some(seed) => TouchingOrder::Shuffled { seed },
            None => TouchingOrder::Enumeration,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Solve the puzzle, print and save the solutions.
    Solve,
    /// Display saved solutions in an interactive 3D viewer.
    Display,
    /// Show the number of saved solutions.
    Count,
    /// Show the number of distinct placements for the lattice.
    Placements,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Solve) {
        Command::Solve => {
            run_solver(&cli.puzzle, &cli.dir)?;
        }
        Command::Display => run_display(&cli.dir)?,
        Command::Count => run_count(&cli.dir),
        Command::Placements => run_placements(cli.puzzle.size)?,
    }

    Ok(())
}

/// Solves the puzzle, prints and saves the solutions, and returns them.
fn run_solver(args: &PuzzleArgs, dir: &Path) -> anyhow::Result<Vec<Board>> {
    let config = args.config();
    let search = config
        .solutions()
        .with_context(|| format!("invalid puzzle {config:?}"))?
        .with_order(args.order())
        .with_observer(LogObserver::new());

    let solutions: Vec<Board> = search.take(args.count.get()).collect();
    if solutions.is_empty() {
        println!("No solution for side {} with {} pieces", config.size, config.pieces);
        return Ok(solutions);
    }

    for (i, board) in solutions.iter().enumerate() {
        println!("Solution {}:", i + 1);
        println!("{}", format_board(board));
    }

    persistence::save(dir, &solutions)
        .with_context(|| format!("failed to save solutions to {}", dir.display()))?;
    println!("Found {} solutions", solutions.len());
    println!("Wrote solutions.txt and solutions.bin");

    Ok(solutions)
}

/// Loads and displays saved solutions.
fn run_display(dir: &Path) -> anyhow::Result<()> {
    let Some(solutions) = persistence::load_all(dir) else {
        bail!("No solutions.bin found in {}. Run 'tetracube solve' first.", dir.display());
    };
    println!("Loaded {} solutions", solutions.len());
    println!("Controls: Left/Right navigate, Up/Down explode, R reset");
    visualization::display(solutions);
    Ok(())
}

/// Prints the count of saved solutions.
fn run_count(dir: &Path) {
    match persistence::count(dir) {
        Some(count) => println!("{} solutions", count),
        None => eprintln!("No solutions.bin found. Run 'tetracube solve' first."),
    }
}

/// Prints how many placements the enumerator produces.
fn run_placements(size: usize) -> anyhow::Result<()> {
    check_size(size)?;
    println!("{} placements for side {}", enumerate_placements(size).len(), size);
    Ok(())
}
