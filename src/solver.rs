//! Backtracking exact-cover search over a single mutable board.
//!
//! Key points:
//! - The board is mutated in place and undone on backtrack, never cloned
//!   per branch (only yielded solutions are cloned)
//! - Iterative search with an explicit stack, so depth is not bounded by
//!   the call stack and the search can pause between solutions
//! - Placements are shared by index; each frame only owns index lists
//!
//! Branching always happens on the forced cell: the smallest cell that
//! still appears in the placement pool. The pool is kept in enumeration
//! order, so that cell is the first cell of the first pooled placement.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::grid::Board;
use crate::pieces::{Cell, PieceId, Placement, PIECE_CELLS};

/// Order in which the placements touching a forced cell are tried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchingOrder {
    /// Enumeration order. Deterministic.
    #[default]
    Enumeration,
    /// A seeded random permutation of each touching list.
    Shuffled { seed: u64 },
}

/// Hooks invoked at well-defined points of the search.
///
/// All methods default to doing nothing.
pub trait SearchObserver {
    /// A new frame was opened at `depth` with `pool` candidate placements.
    fn enter_depth(&mut self, _depth: usize, _pool: usize) {}

    /// The state at `depth` cannot lead to a solution.
    fn dead_end(&mut self, _depth: usize, _forced: Option<Cell>) {}

    /// A solution is about to be yielded.
    fn solution_found(&mut self, _board: &Board) {}
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn enter_depth(&mut self, depth: usize, pool: usize) {
        (**self).enter_depth(depth, pool);
    }

    fn dead_end(&mut self, depth: usize, forced: Option<Cell>) {
        (**self).dead_end(depth, forced);
    }

    fn solution_found(&mut self, board: &Board) {
        (**self).solution_found(board);
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer that reports search progress through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver {
    deepest: usize,
    solutions: usize,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest frame reached so far.
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    pub fn solutions(&self) -> usize {
        self.solutions
    }
}

impl SearchObserver for LogObserver {
    fn enter_depth(&mut self, depth: usize, pool: usize) {
        trace!("depth {depth}: {pool} placements in pool");
        if depth > self.deepest {
            self.deepest = depth;
            debug!("new deepest frame {depth} ({pool} placements in pool)");
        }
    }

    fn dead_end(&mut self, depth: usize, forced: Option<Cell>) {
        trace!("dead end at depth {depth} (forced cell {forced:?})");
    }

    fn solution_found(&mut self, board: &Board) {
        self.solutions += 1;
        info!(
            "solution {} found ({} of {} cells occupied)",
            self.solutions,
            board.occupied_count(),
            board.raw_cells().len()
        );
    }
}

/// One level of the search: the choices for a single forced cell.
struct Frame {
    /// Identifier given to the piece placed at this level.
    budget: PieceId,
    /// Pool placements containing the forced cell.
    touching: Vec<usize>,
    /// Pool placements not containing it.
    disjoint: Vec<usize>,
    /// Index into `touching` of the next candidate.
    next: usize,
    /// Candidate currently written on the board.
    placed: Option<usize>,
}

/// Lazy sequence of solved boards.
///
/// Each call to `next` resumes the depth-first search where the previous
/// one stopped. Dropping the iterator abandons the search. Once the
/// iterator is exhausted the board is back in its starting state.
pub struct Solutions<O = NoopObserver> {
    placements: Vec<Placement>,
    board: Board,
    budget: PieceId,
    stack: Vec<Frame>,
    rng: Option<StdRng>,
    observer: O,
    started: bool,
}

impl Solutions<NoopObserver> {
    /// Prepares a search placing `budget` pieces on `board` from `pool`.
    ///
    /// Pieces are numbered from `budget` down to 1. The pool should be in
    /// enumeration order; placements that overlap occupied cells are
    /// dropped before the search starts.
    pub fn new(board: Board, pool: Vec<Placement>, budget: PieceId) -> Self {
        Self {
            placements: pool,
            board,
            budget,
            stack: Vec::new(),
            rng: None,
            observer: NoopObserver,
            started: false,
        }
    }
}

impl<O: SearchObserver> Solutions<O> {
    /// Replaces the observer.
    pub fn with_observer<P: SearchObserver>(self, observer: P) -> Solutions<P> {
        Solutions {
            placements: self.placements,
            board: self.board,
            budget: self.budget,
            stack: self.stack,
            rng: self.rng,
            observer,
            started: self.started,
        }
    }

    /// Sets the order in which touching placements are tried.
    pub fn with_order(mut self, order: TouchingOrder) -> Self {
        self.rng = match order {
            TouchingOrder::Enumeration => None,
            TouchingOrder::Shuffled { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        self
    }

    /// The live board. Between pulls it holds the last yielded solution.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Gives back the board, e.g. to confirm an exhausted search restored it.
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Returns true if the state cannot reach budget zero with every free
    /// cell needed.
    ///
    /// When the remaining pieces must cover every free cell, a free cell
    /// before the forced cell is in no pooled placement and never will be.
    fn is_stranded(&self, forced: Cell, budget: PieceId) -> bool {
        let needed = usize::from(budget) * PIECE_CELLS;
        let free = self.board.unoccupied_count();
        if needed > free {
            return true;
        }
        needed == free && self.board.first_unoccupied() != Some(forced)
    }

    /// Opens a frame for `pool`, or reports a dead end.
    fn descend(&mut self, pool: Vec<usize>, budget: PieceId) {
        let depth = self.stack.len();
        self.observer.enter_depth(depth, pool.len());

        let Some(&first) = pool.first() else {
            self.observer.dead_end(depth, None);
            return;
        };
        let forced = self.placements[first].first_cell();
        if self.is_stranded(forced, budget) {
            self.observer.dead_end(depth, Some(forced));
            return;
        }

        let placements = &self.placements;
        let (mut touching, disjoint): (Vec<usize>, Vec<usize>) = pool
            .into_iter()
            .partition(|&candidate| placements[candidate].contains(forced));
        if let Some(rng) = self.rng.as_mut() {
            touching.shuffle(rng);
        }

        self.stack.push(Frame {
            budget,
            touching,
            disjoint,
            next: 0,
            placed: None,
        });
    }

    /// Builds the root frame from the placements that fit the board.
    fn start(&mut self) -> Option<Board> {
        self.started = true;
        if self.budget == 0 {
            self.observer.solution_found(&self.board);
            return Some(self.board.clone());
        }
        let pool: Vec<usize> = (0..self.placements.len())
            .filter(|&candidate| self.board.fits(&self.placements[candidate]))
            .collect();
        self.descend(pool, self.budget);
        None
    }
}

impl<O: SearchObserver> Iterator for Solutions<O> {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        if !self.started {
            if let Some(board) = self.start() {
                return Some(board);
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            // undo the previous candidate before trying the next one
            if let Some(previous) = frame.placed.take() {
                self.board.remove(&self.placements[previous], frame.budget);
            }

            let Some(&candidate) = frame.touching.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            let id = frame.budget;
            self.board.place(&self.placements[candidate], id);
            frame.placed = Some(candidate);

            if id == 1 {
                self.observer.solution_found(&self.board);
                return Some(self.board.clone());
            }

            let board = &self.board;
            let placements = &self.placements;
            let pool: Vec<usize> = frame
                .disjoint
                .iter()
                .copied()
                .filter(|&other| board.fits(&placements[other]))
                .collect();
            if !pool.is_empty() {
                self.descend(pool, id - 1);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placements::{enumerate_placements, verify_packing};
    use crate::solve;

    #[derive(Default)]
    struct Recorder {
        deepest: usize,
        dead_ends: usize,
        solutions: usize,
    }

    impl SearchObserver for Recorder {
        fn enter_depth(&mut self, depth: usize, _pool: usize) {
            self.deepest = self.deepest.max(depth);
        }

        fn dead_end(&mut self, _depth: usize, _forced: Option<Cell>) {
            self.dead_ends += 1;
        }

        fn solution_found(&mut self, _board: &Board) {
            self.solutions += 1;
        }
    }

    fn assert_valid_packing(board: &Board, budget: PieceId) {
        let placements = enumerate_placements(board.size());
        assert!(verify_packing(board, &placements), "board is not a packing");
        let pieces = board.pieces();
        assert_eq!(pieces.len(), usize::from(budget));
        for id in pieces.keys() {
            assert!((1..=budget).contains(id), "identifier {id} out of range");
        }
    }

    #[test]
    fn test_four_lattice_is_fully_covered() {
        let board = solve(4, 16).next().expect("4x4x4 should be packable");
        assert!(board.is_full());
        assert_valid_packing(&board, 16);
    }

    #[test]
    fn test_first_solution_is_deterministic() {
        let first = solve(4, 16).next();
        let second = solve(4, 16).next();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_identifiers_descend_from_budget() {
        let board = solve(4, 16).next().unwrap();
        // the forced cell of the root frame is (0, 0, 0)
        assert_eq!(board.get((0, 0, 0)), Some(16));
    }

    #[test]
    fn test_two_lattice_has_no_solution() {
        assert_eq!(solve(2, 1).count(), 0);
    }

    #[test]
    fn test_budget_over_capacity_has_no_solution() {
        assert_eq!(solve(3, 7).count(), 0);
    }

    #[test]
    fn test_zero_budget_yields_initial_board_once() {
        let boards: Vec<Board> = solve(3, 0).collect();
        assert_eq!(boards, vec![Board::new(3)]);
    }

    #[test]
    fn test_partial_budget_leaves_cells_free() {
        let board = solve(3, 2).next().unwrap();
        assert_eq!(board.occupied_count(), 8);
        assert!(!board.is_full());
        assert_valid_packing(&board, 2);
    }

    #[test]
    fn test_exhausted_search_restores_seeded_board() {
        let placements = enumerate_placements(3);
        let mut seeded = Board::new(3);
        let seed_piece = Placement::new([(1, 0, 0), (1, 1, 0), (1, 2, 0), (1, 1, 1)]);
        seeded.place(&seed_piece, 3);
        let before = seeded.clone();

        let mut search = Solutions::new(seeded, placements, 2);
        let mut found = 0;
        for board in search.by_ref() {
            found += 1;
            assert_eq!(board.get((1, 0, 0)), Some(3));
            assert_eq!(board.get((1, 1, 1)), Some(3));
            assert_eq!(board.occupied_count(), 12);
            for (id, cells) in board.pieces() {
                assert_eq!(cells.len(), 4, "piece {id} has {} cells", cells.len());
            }
        }
        assert!(found > 0);
        assert_eq!(search.into_board(), before);
    }

    #[test]
    fn test_stranded_corner_is_a_dead_end() {
        // walls off (0, 0, 0) so the exact budget cannot be met
        let mut seeded = Board::new(4);
        seeded.place(&Placement::new([(1, 0, 0), (2, 0, 0), (3, 0, 0), (2, 1, 0)]), 16);
        seeded.place(&Placement::new([(0, 1, 0), (0, 2, 0), (0, 3, 0), (1, 2, 0)]), 15);
        seeded.place(&Placement::new([(0, 0, 1), (0, 0, 2), (0, 0, 3), (1, 0, 2)]), 14);
        let before = seeded.clone();

        let mut recorder = Recorder::default();
        let mut search =
            Solutions::new(seeded, enumerate_placements(4), 13).with_observer(&mut recorder);
        assert!(search.next().is_none());
        assert_eq!(search.into_board(), before);
        assert_eq!(recorder.dead_ends, 1);
        assert_eq!(recorder.solutions, 0);
    }

    #[test]
    fn test_observer_sees_every_depth() {
        let mut recorder = Recorder::default();
        let solved = solve(4, 16).with_observer(&mut recorder).next();
        assert!(solved.is_some());
        assert_eq!(recorder.deepest, 15);
        assert_eq!(recorder.solutions, 1);
    }

    #[test]
    fn test_log_observer_counts_solutions() {
        let mut search = solve(3, 1).with_observer(LogObserver::new());
        let pulled = search.by_ref().take(3).count();
        assert_eq!(pulled, 3);
        assert_eq!(search.observer().solutions(), 3);
        assert_eq!(search.observer().deepest(), 0);
    }

    #[test]
    fn test_single_piece_solutions_touch_forced_cell() {
        // with one piece, only placements through (0, 0, 0) are tried
        let expected = enumerate_placements(3)
            .iter()
            .filter(|placement| placement.contains((0, 0, 0)))
            .count();
        let boards: Vec<Board> = solve(3, 1).collect();
        assert_eq!(boards.len(), expected);
        for board in &boards {
            assert_eq!(board.get((0, 0, 0)), Some(1));
        }
    }

    #[test]
    fn test_shuffled_order_is_reproducible_and_valid() {
        let order = TouchingOrder::Shuffled { seed: 7 };
        let first = solve(4, 16).with_order(order).next().unwrap();
        let again = solve(4, 16).with_order(order).next().unwrap();
        assert_eq!(first, again);
        assert!(first.is_full());
        assert_valid_packing(&first, 16);
    }
}
