//! Placement enumeration for the T-tetracube.
//!
//! Every orientation of the piece is translated to every anchor cell of
//! the lattice; variants that leave the lattice are dropped and the rest
//! are collected as canonical placements.

use rustc_hash::FxHashSet;

use crate::geometry::all_orientations;
use crate::grid::{cell_count, idx_to_coord, Board};
use crate::pieces::{Cell, PieceId, Placement, PIECE_CELLS, TETRACUBE};

/// Returns every in-bounds placement of the T-tetracube in a lattice of
/// side `size`, sorted ascending by the canonical cell tuple.
///
/// Lattices with `size < 3` cannot hold a straight run of three cells and
/// produce no placements; neither does a side whose cell count overflows.
pub fn enumerate_placements(size: usize) -> Vec<Placement> {
    let orientations: Vec<[Cell; PIECE_CELLS]> = all_orientations(&TETRACUBE)
        .into_iter()
        .filter_map(|orientation| orientation.try_into().ok())
        .collect();

    let mut seen: FxHashSet<Placement> = FxHashSet::default();
    let mut placements = Vec::new();

    let Some(anchors) = cell_count(size) else {
        return placements;
    };

    for anchor_index in 0..anchors {
        let anchor = idx_to_coord(size, anchor_index);
        for orientation in &orientations {
            if let Some(placement) = try_create_placement(orientation, anchor, size) {
                if seen.insert(placement) {
                    placements.push(placement);
                }
            }
        }
    }

    placements.sort_unstable();
    placements
}

/// Translates an orientation to `anchor`.
///
/// Returns `None` if any cube would fall outside the lattice.
fn try_create_placement(
    orientation: &[Cell; PIECE_CELLS],
    anchor: Cell,
    size: usize,
) -> Option<Placement> {
    let mut cells = [(0, 0, 0); PIECE_CELLS];
    let bound = size as i64;

    for (slot, &(dx, dy, dz)) in cells.iter_mut().zip(orientation) {
        let absolute = (anchor.0 + dx, anchor.1 + dy, anchor.2 + dz);
        let inside = [absolute.0, absolute.1, absolute.2]
            .iter()
            .all(|&c| (0..bound).contains(&i64::from(c)));
        if !inside {
            return None;
        }
        *slot = absolute;
    }

    let placement = Placement::new(cells);
    debug_assert!(placement.is_distinct(), "degenerate placement {placement:?}");
    Some(placement)
}

/// Checks that a board is a packing built from `placements`.
///
/// Every identifier present must own exactly four cells, and those cells
/// must form one of the given placements. Unoccupied cells are allowed;
/// pair with [`Board::is_full`] to demand full coverage.
pub fn verify_packing(board: &Board, placements: &[Placement]) -> bool {
    let known: FxHashSet<&Placement> = placements.iter().collect();

    board.pieces().into_iter().all(|(_, cells): (PieceId, Vec<Cell>)| {
        let Ok(cells) = <[Cell; PIECE_CELLS]>::try_from(cells) else {
            return false;
        };
        known.contains(&Placement::new(cells))
    })
}
