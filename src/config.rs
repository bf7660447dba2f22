//! Puzzle parameters and their validation.

use thiserror::Error;

use crate::grid::{cell_count, Board};
use crate::pieces::{PieceId, PIECE_CELLS};
use crate::placements::enumerate_placements;
use crate::solver::Solutions;

/// Default lattice side.
pub const DEFAULT_SIZE: usize = 6;

/// Default piece budget: 6^3 / 4.
pub const DEFAULT_PIECES: PieceId = 54;

/// Largest accepted lattice side.
pub const MAX_SIZE: usize = 256;

/// How the piece budget must relate to lattice capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackingMode {
    /// Every cell must be covered: `4 * pieces == size^3`.
    #[default]
    Exact,
    /// Pieces may leave cells empty: `4 * pieces <= size^3`.
    Partial,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a lattice of side {size} is too large (maximum side {max})")]
    LatticeTooLarge { size: usize, max: usize },

    #[error("a lattice of side {size} has {cells} cells, which is not a multiple of 4")]
    SizeNotDivisible { size: usize, cells: usize },

    #[error("{pieces} pieces cover {covered} cells but the lattice has {cells}")]
    BudgetMismatch {
        pieces: PieceId,
        covered: usize,
        cells: usize,
    },

    #[error("{pieces} pieces need {covered} cells but the lattice only has {cells}")]
    BudgetExceedsCapacity {
        pieces: PieceId,
        covered: usize,
        cells: usize,
    },
}

/// A puzzle instance: lattice side, piece budget and packing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub size: usize,
    pub pieces: PieceId,
    pub mode: PackingMode,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            pieces: DEFAULT_PIECES,
            mode: PackingMode::Exact,
        }
    }
}

impl PuzzleConfig {
    /// An exact-cover puzzle using the largest budget the lattice allows.
    pub fn exact(size: usize) -> Self {
        let cells = cell_count(size).unwrap_or(usize::MAX);
        let pieces = (cells / PIECE_CELLS).min(usize::from(PieceId::MAX));
        Self {
            size,
            pieces: pieces as PieceId,
            mode: PackingMode::Exact,
        }
    }

    /// Number of lattice cells, or an error if the side is above [`MAX_SIZE`].
    pub fn cells(&self) -> Result<usize, ConfigError> {
        check_size(self.size)
    }

    /// Checks the budget against lattice capacity under `mode`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = self.cells()?;
        let covered = usize::from(self.pieces) * PIECE_CELLS;

        match self.mode {
            PackingMode::Exact => {
                if cells % PIECE_CELLS != 0 {
                    return Err(ConfigError::SizeNotDivisible {
                        size: self.size,
                        cells,
                    });
                }
                if covered != cells {
                    return Err(ConfigError::BudgetMismatch {
                        pieces: self.pieces,
                        covered,
                        cells,
                    });
                }
            }
            PackingMode::Partial => {
                if covered > cells {
                    return Err(ConfigError::BudgetExceedsCapacity {
                        pieces: self.pieces,
                        covered,
                        cells,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validates the configuration and prepares the search on an empty board.
    pub fn solutions(&self) -> Result<Solutions, ConfigError> {
        self.validate()?;
        Ok(Solutions::new(
            Board::new(self.size),
            enumerate_placements(self.size),
            self.pieces,
        ))
    }
}

/// Returns the cell count of a lattice of side `size` if the side is
/// accepted.
pub fn check_size(size: usize) -> Result<usize, ConfigError> {
    cell_count(size)
        .filter(|_| size <= MAX_SIZE)
        .ok_or(ConfigError::LatticeTooLarge {
            size,
            max: MAX_SIZE,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PuzzleConfig::default();
        assert_eq!(config.cells(), Ok(216));
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(PuzzleConfig::exact(6), config);
    }

    #[test]
    fn test_huge_lattice_is_rejected() {
        for size in [MAX_SIZE + 1, usize::MAX] {
            for mode in [PackingMode::Exact, PackingMode::Partial] {
                let config = PuzzleConfig {
                    size,
                    pieces: 1,
                    mode,
                };
                assert_eq!(
                    config.validate(),
                    Err(ConfigError::LatticeTooLarge {
                        size,
                        max: MAX_SIZE
                    })
                );
                assert!(config.solutions().is_err());
            }
        }
        assert_eq!(PuzzleConfig::exact(usize::MAX).pieces, PieceId::MAX);
        assert_eq!(check_size(MAX_SIZE), Ok(MAX_SIZE.pow(3)));
    }

    #[test]
    fn test_exact_rejects_odd_lattice() {
        let config = PuzzleConfig {
            size: 3,
            pieces: 6,
            mode: PackingMode::Exact,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SizeNotDivisible { size: 3, cells: 27 })
        );
    }

    #[test]
    fn test_exact_rejects_budget_mismatch() {
        let config = PuzzleConfig {
            size: 4,
            pieces: 15,
            mode: PackingMode::Exact,
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::BudgetMismatch {
                pieces: 15,
                covered: 60,
                cells: 64
            }
        );
        assert_eq!(
            err.to_string(),
            "15 pieces cover 60 cells but the lattice has 64"
        );
    }

    #[test]
    fn test_partial_allows_smaller_budget_only() {
        let mut config = PuzzleConfig {
            size: 3,
            pieces: 6,
            mode: PackingMode::Partial,
        };
        assert_eq!(config.validate(), Ok(()));

        config.pieces = 7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BudgetExceedsCapacity { covered: 28, .. })
        ));
        assert!(config.solutions().is_err());
    }

    #[test]
    fn test_solutions_for_valid_config() {
        let board = PuzzleConfig::exact(4)
            .solutions()
            .unwrap()
            .next()
            .unwrap();
        assert!(board.is_full());
    }
}
