//! Board representation and rendering for the cubic lattice.
//!
//! The board is a flat array in x-major order where each cell holds a
//! piece number (1-based) or 0 for empty. Because the index order matches
//! the lexicographic order of `(x, y, z)`, "first empty index" and
//! "smallest empty cell" are the same thing.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::pieces::{Cell, PieceId, Placement};

/// Marker stored in unoccupied cells.
const EMPTY: PieceId = 0;

/// Glyph rendered for unoccupied cells.
const EMPTY_GLYPH: &str = ".";

/// Number of cells in a lattice of side `size`, or `None` on overflow.
#[inline]
pub fn cell_count(size: usize) -> Option<usize> {
    size.checked_pow(3)
}

/// Converts (x, y, z) coordinates to a linear cell index.
///
/// Index order is x-major: `idx = x * size * size + y * size + z`.
#[inline(always)]
pub const fn coord_to_idx(size: usize, (x, y, z): Cell) -> usize {
    (x as usize) * size * size + (y as usize) * size + (z as usize)
}

/// Converts a linear cell index to (x, y, z) coordinates.
#[inline(always)]
pub const fn idx_to_coord(size: usize, cell_index: usize) -> Cell {
    (
        (cell_index / (size * size)) as i32,
        ((cell_index / size) % size) as i32,
        (cell_index % size) as i32,
    )
}

/// An N x N x N lattice mapping each cell to an optional piece identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<PieceId>,
    occupied: usize,
}

impl Board {
    /// Creates an empty board of side `size`.
    ///
    /// # Panics
    ///
    /// If `size^3` overflows `usize`. Use [`cell_count`] to check first.
    pub fn new(size: usize) -> Self {
        let Some(count) = cell_count(size) else {
            panic!("lattice side {size} overflows the cell count");
        };
        Self {
            size,
            cells: vec![EMPTY; count],
            occupied: 0,
        }
    }

    /// Rebuilds a board from raw x-major identifiers (0 for empty).
    ///
    /// Returns `None` if the number of identifiers is not `size^3`.
    pub fn from_cells(size: usize, cells: Vec<PieceId>) -> Option<Self> {
        if cell_count(size) != Some(cells.len()) {
            return None;
        }
        let occupied = cells.iter().filter(|&&id| id != EMPTY).count();
        Some(Self {
            size,
            cells,
            occupied,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw identifiers in x-major order, 0 for empty.
    #[inline]
    pub fn raw_cells(&self) -> &[PieceId] {
        &self.cells
    }

    /// Returns true if the cell lies inside the lattice.
    pub fn contains(&self, (x, y, z): Cell) -> bool {
        let size = self.size as i64;
        [x, y, z]
            .iter()
            .all(|&c| (0..size).contains(&i64::from(c)))
    }

    /// The identifier at `cell`, or `None` if it is empty or out of bounds.
    pub fn get(&self, cell: Cell) -> Option<PieceId> {
        if !self.contains(cell) {
            return None;
        }
        match self.cells[coord_to_idx(self.size, cell)] {
            EMPTY => None,
            id => Some(id),
        }
    }

    /// Returns true if the cell is inside the lattice and unoccupied.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.contains(cell) && self.cells[coord_to_idx(self.size, cell)] == EMPTY
    }

    /// Returns true if all four cells of the placement are free.
    #[inline]
    pub fn fits(&self, placement: &Placement) -> bool {
        placement.cells().iter().all(|&cell| self.is_free(cell))
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn unoccupied_count(&self) -> usize {
        self.cells.len() - self.occupied
    }

    /// Returns true if every cell carries an identifier.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// The smallest unoccupied cell, or `None` if the board is full.
    pub fn first_unoccupied(&self) -> Option<Cell> {
        self.cells
            .iter()
            .position(|&id| id == EMPTY)
            .map(|idx| idx_to_coord(self.size, idx))
    }

    /// Writes `id` into every cell of the placement.
    ///
    /// The cells must be in bounds and free.
    pub fn place(&mut self, placement: &Placement, id: PieceId) {
        debug_assert!(id != EMPTY, "piece identifiers start at 1");
        for &cell in placement.cells() {
            debug_assert!(self.is_free(cell), "cell {cell:?} is not free");
            self.cells[coord_to_idx(self.size, cell)] = id;
        }
        self.occupied += placement.cells().len();
    }

    /// Clears the cells written by a matching [`Board::place`].
    pub fn remove(&mut self, placement: &Placement, id: PieceId) {
        for &cell in placement.cells() {
            let slot = &mut self.cells[coord_to_idx(self.size, cell)];
            debug_assert_eq!(*slot, id, "cell {cell:?} not owned by piece {id}");
            *slot = EMPTY;
        }
        self.occupied -= placement.cells().len();
    }

    /// Iterates every cell with its identifier, in x-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<PieceId>)> + '_ {
        self.cells.iter().enumerate().map(|(idx, &id)| {
            let cell = idx_to_coord(self.size, idx);
            (cell, (id != EMPTY).then_some(id))
        })
    }

    /// Groups occupied cells by piece identifier.
    ///
    /// Cells within each group are in ascending order.
    pub fn pieces(&self) -> FxHashMap<PieceId, Vec<Cell>> {
        let mut pieces: FxHashMap<PieceId, Vec<Cell>> = FxHashMap::default();
        for (cell, id) in self.iter() {
            if let Some(id) = id {
                pieces.entry(id).or_default().push(cell);
            }
        }
        pieces
    }
}

/// Formats a board as layered text.
///
/// Each layer is one x slice headed `Layer k`, with one line per y and
/// one right-justified 3-character column per z. Empty cells show as '.'.
pub fn format_board(board: &Board) -> String {
    let size = board.size();
    let mut output = String::new();

    for x in 0..size {
        if x > 0 {
            output.push('\n');
        }
        // writing to a String cannot fail
        let _ = writeln!(output, "Layer {}", x + 1);
        for y in 0..size {
            for z in 0..size {
                let cell = (x as i32, y as i32, z as i32);
                let _ = match board.get(cell) {
                    Some(id) => write!(output, "{id:>3}"),
                    None => write!(output, "{EMPTY_GLYPH:>3}"),
                };
            }
            output.push('\n');
        }
    }

    output
}
