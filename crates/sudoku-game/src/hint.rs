//! Check and hint features, built on the precomputed solution grid.

use rand::Rng;
use sudoku_core::{Grid, Position};

use crate::history::History;

/// What a hint request did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    /// Wrong entries were rolled back via undo; positions in undo order
    FixedViaUndo(Vec<Position>),
    /// One empty cell was filled from the solution
    Filled(Position),
    /// No empty cells remain; nothing to do
    AlreadyComplete,
}

/// Returns true iff every filled cell of `grid` matches the solution.
///
/// Empty cells are ignored: they are not yet a mistake.
pub fn check(grid: &Grid, solution: &Grid) -> bool {
    Position::all().all(|pos| {
        let value = grid.get(pos);
        value == 0 || value == solution.get(pos)
    })
}

/// Fill one random empty cell from the solution, or roll back mistakes.
///
/// If the board currently disagrees with the solution, the hint instead
/// undoes moves until [`check`] passes again. Otherwise a uniformly random
/// empty cell (row-major, 0-indexed) is filled with the solution's value.
/// The filled cell is written directly and is not recorded in the history.
///
/// This routine never classifies the board; the session derives the
/// resulting [`BoardState`](crate::session::BoardState) itself.
pub fn hint<R: Rng>(
    grid: &mut Grid,
    solution: &Grid,
    history: &mut History,
    rng: &mut R,
) -> HintOutcome {
    if !check(grid, solution) {
        let mut undone = Vec::new();
        while !check(grid, solution) {
            match history.undo(grid) {
                Some(pos) => undone.push(pos),
                // The starting cells always match the solution, so this only
                // happens if the grid was corrupted outside the session.
                None => break,
            }
        }
        return HintOutcome::FixedViaUndo(undone);
    }

    let empty = grid.empty_positions();
    if empty.is_empty() {
        return HintOutcome::AlreadyComplete;
    }

    let target = empty[rng.gen_range(0..empty.len())];
    grid.set(target, solution.get(target));
    HintOutcome::Filled(target)
}
