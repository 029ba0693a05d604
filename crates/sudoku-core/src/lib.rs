//! Core Sudoku engine.
//!
//! Provides the 9x9 [`Grid`] with its row/column/box unit views, the pure
//! rule checks in [`rules`], and the backtracking [`Solver`]. Game-facing
//! concerns (move history, hints, the session state machine) live in the
//! `sudoku-game` crate.

pub mod grid;
pub mod rules;
pub mod solver;

pub use grid::{box_positions, column_positions, row_positions, Grid, Position};
pub use solver::Solver;
