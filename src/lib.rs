//! T-Tetracube Packing Solver Library
//!
//! Packs an N x N x N lattice with T-tetracubes (three cubes in a row plus
//! one attached to the middle) so that every cell is covered exactly once.

pub mod config;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod placements;
pub mod solver;

pub use config::{ConfigError, PackingMode, PuzzleConfig};
pub use grid::{format_board, Board};
pub use pieces::{Cell, PieceId, Placement};
pub use placements::{enumerate_placements, verify_packing};
pub use solver::{LogObserver, NoopObserver, SearchObserver, Solutions, TouchingOrder};

/// Lazily searches for packings of `piece_budget` pieces in a lattice of
/// side `size`, starting from an empty board.
///
/// The budget is not checked against the lattice: a budget below capacity
/// yields boards with empty cells, one above capacity yields nothing. Use
/// [`PuzzleConfig`] to enforce a policy.
pub fn solve(size: usize, piece_budget: PieceId) -> Solutions {
    Solutions::new(Board::new(size), enumerate_placements(size), piece_budget)
}
