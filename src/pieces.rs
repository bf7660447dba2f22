//! Piece definitions and coordinate types.
//!
//! The puzzle uses a single piece shape, the T-tetracube: three collinear
//! unit cubes plus one cube attached to the middle of the run.

/// A 3D coordinate of a unit cell in the lattice.
pub type Cell = (i32, i32, i32);

/// Identifier written into the board for a placed piece (1-based, 0 is empty).
pub type PieceId = u16;

/// Number of cubes in the piece.
pub const PIECE_CELLS: usize = 4;

/// The T-tetracube, normalized so the minimum coordinates are at the origin.
pub const TETRACUBE: [Cell; PIECE_CELLS] = [(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 1, 0)];

/// One in-bounds way to lay the piece in the lattice.
///
/// Cells are kept sorted, so two geometrically identical placements
/// compare equal and the derived ordering is lexicographic over the
/// sorted cell tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    cells: [Cell; PIECE_CELLS],
}

impl Placement {
    /// Builds a placement from any arrangement of its four cells.
    pub fn new(mut cells: [Cell; PIECE_CELLS]) -> Self {
        cells.sort_unstable();
        Self { cells }
    }

    /// The cells in canonical (ascending) order.
    #[inline]
    pub fn cells(&self) -> &[Cell; PIECE_CELLS] {
        &self.cells
    }

    /// The smallest cell of the placement.
    #[inline]
    pub fn first_cell(&self) -> Cell {
        self.cells[0]
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns true if every cell lies in `[0, size)` on all three axes.
    pub fn is_within(&self, size: usize) -> bool {
        let bound = size as i64;
        self.cells.iter().all(|&(x, y, z)| {
            [x, y, z]
                .iter()
                .all(|&c| (0..bound).contains(&i64::from(c)))
        })
    }

    /// Returns true if the four cells are pairwise distinct.
    pub fn is_distinct(&self) -> bool {
        // sorted, so duplicates are adjacent
        self.cells.windows(2).all(|pair| pair[0] != pair[1])
    }
}
