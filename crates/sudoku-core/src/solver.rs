use crate::grid::{Grid, Position};
use crate::rules;

/// Brute-force backtracking Sudoku solver.
///
/// Plain depth-first search: no candidate bookkeeping and no constraint
/// propagation. Exponential in the worst case, which is fine for single 9x9
/// puzzles curated to have a unique solution.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver
    pub fn new() -> Self {
        Self
    }

    /// Solve the puzzle, returning the solved grid if one exists.
    ///
    /// `None` means the starting grid is unsatisfiable; callers loading
    /// puzzles from a curated catalog should treat that as a fatal
    /// data-integrity error rather than a recoverable state.
    pub fn solve(&self, grid: &Grid) -> Option<Grid> {
        let mut working = grid.clone();
        if Self::solve_recursive(&mut working) {
            Some(working)
        } else {
            None
        }
    }

    fn solve_recursive(grid: &mut Grid) -> bool {
        if !rules::is_valid_board(grid) {
            return false;
        }
        if rules::is_won(grid) {
            return true;
        }

        // Scan the whole grid and branch on the last empty cell seen, so the
        // bottom-most, right-most empty cell is tried first. Sudoku solutions
        // are unique for catalog puzzles, but keeping the scan order fixed
        // keeps solving deterministic.
        let mut target = Position::new(0, 0);
        for pos in Position::all() {
            if grid.is_empty(pos) {
                target = pos;
            }
        }

        for value in 1..=9 {
            grid.set(target, value);
            if Self::solve_recursive(grid) {
                return true;
            }
        }

        // No candidate worked; restore the cell before backtracking.
        grid.set(target, 0);
        false
    }
}
