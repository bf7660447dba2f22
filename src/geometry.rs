//! Axis-aligned orientation utilities.
//!
//! A planar piece template is laid out along two axes: the template's x
//! component runs along the "run" axis and its y component along the
//! "stick" axis. Choosing the run axis (3 ways), its sign (2), the stick
//! axis among the remaining two (2) and its sign (2) gives 24 variants.
//! Mirror-symmetric pieces collapse many of those after normalization;
//! the T-tetracube keeps 12.

use crate::pieces::Cell;

/// Number of raw axis/sign combinations.
pub const NUM_VARIANTS: usize = 24;

/// Maps template offsets onto lattice axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisMap {
    /// Lattice axis (0 = x, 1 = y, 2 = z) receiving the template x offset.
    pub run_axis: usize,
    pub run_sign: i32,
    /// Lattice axis receiving the template y offset.
    pub stick_axis: usize,
    pub stick_sign: i32,
}

impl AxisMap {
    /// Axis receiving the template z offset.
    #[inline]
    fn depth_axis(&self) -> usize {
        3 - self.run_axis - self.stick_axis
    }

    /// Moves one template offset into lattice space.
    pub fn apply(&self, (x, y, z): Cell) -> Cell {
        let mut out = [0i32; 3];
        out[self.run_axis] = x * self.run_sign;
        out[self.stick_axis] = y * self.stick_sign;
        out[self.depth_axis()] = z;
        (out[0], out[1], out[2])
    }
}

/// All 24 axis/sign combinations, run axis major.
pub fn axis_maps() -> Vec<AxisMap> {
    let mut maps = Vec::with_capacity(NUM_VARIANTS);
    for run_axis in 0..3 {
        for run_sign in [1, -1] {
            for stick_axis in (0..3).filter(|&axis| axis != run_axis) {
                for stick_sign in [1, -1] {
                    maps.push(AxisMap {
                        run_axis,
                        run_sign,
                        stick_axis,
                        stick_sign,
                    });
                }
            }
        }
    }
    maps
}

/// Generates all unique orientations of a piece.
///
/// Each variant is normalized so its minimum coordinates sit at the origin
/// and its cells are sorted, then duplicates are removed. The result is
/// sorted, so the order is stable across runs.
pub fn all_orientations(piece: &[Cell]) -> Vec<Vec<Cell>> {
    let mut orientations: Vec<Vec<Cell>> = axis_maps()
        .iter()
        .map(|map| {
            let mapped: Vec<Cell> = piece.iter().map(|&cell| map.apply(cell)).collect();
            let mut normalized = normalize_to_origin(mapped);
            normalized.sort_unstable();
            normalized
        })
        .collect();

    orientations.sort();
    orientations.dedup();
    orientations
}

/// Translates coordinates so the minimum x, y, z values are all zero.
fn normalize_to_origin(mut coords: Vec<Cell>) -> Vec<Cell> {
    let Some(min_x) = coords.iter().map(|(x, _, _)| *x).min() else {
        return coords;
    };
    let min_y = coords.iter().map(|(_, y, _)| *y).min().unwrap_or(0);
    let min_z = coords.iter().map(|(_, _, z)| *z).min().unwrap_or(0);

    for (x, y, z) in &mut coords {
        *x -= min_x;
        *y -= min_y;
        *z -= min_z;
    }

    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::TETRACUBE;

    #[test]
    fn test_axis_maps_are_distinct() {
        let maps = axis_maps();
        assert_eq!(maps.len(), NUM_VARIANTS);
        for (i, a) in maps.iter().enumerate() {
            for b in &maps[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_apply_moves_offsets_onto_axes() {
        let map = AxisMap {
            run_axis: 2,
            run_sign: -1,
            stick_axis: 0,
            stick_sign: 1,
        };
        assert_eq!(map.apply((2, 1, 0)), (1, 0, -2));
        assert_eq!(map.apply((0, 0, 3)), (0, 3, 0));
    }

    #[test]
    fn test_tetracube_has_twelve_orientations() {
        let orientations = all_orientations(&TETRACUBE);
        assert_eq!(orientations.len(), 12);
        for orientation in &orientations {
            assert_eq!(orientation.len(), 4);
            let min = orientation.iter().fold((i32::MAX, i32::MAX, i32::MAX), |m, c| {
                (m.0.min(c.0), m.1.min(c.1), m.2.min(c.2))
            });
            assert_eq!(min, (0, 0, 0), "orientation {orientation:?} not at origin");
        }
    }

    #[test]
    fn test_straight_piece_has_three_orientations() {
        let orientations = all_orientations(&[(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
        assert_eq!(
            orientations,
            vec![
                vec![(0, 0, 0), (0, 0, 1), (0, 0, 2)],
                vec![(0, 0, 0), (0, 1, 0), (0, 2, 0)],
                vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)],
            ]
        );
    }

    #[test]
    fn test_single_cube_and_empty_piece() {
        assert_eq!(all_orientations(&[(0, 0, 0)]), vec![vec![(0, 0, 0)]]);
        assert_eq!(all_orientations(&[]), vec![Vec::<Cell>::new()]);
    }
}
