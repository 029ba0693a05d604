//! Constraint checking for the classic Sudoku rules.
//!
//! Everything here is a pure function over a [`Grid`]; the rendering layer
//! calls the per-unit checks directly to decide which cells to highlight.

use crate::grid::{box_positions, column_positions, row_positions, Grid, Position};

/// Returns true iff no nonzero value appears more than once among the cells.
///
/// Empty cells (0) are unconstrained and may repeat.
pub fn is_valid_unit(values: &[u8; 9]) -> bool {
    let mut counts = [0u8; 9];
    for &value in values {
        if value != 0 {
            let idx = (value - 1) as usize;
            counts[idx] += 1;
            if counts[idx] > 1 {
                return false;
            }
        }
    }
    true
}

fn unit_values(grid: &Grid, positions: &[Position; 9]) -> [u8; 9] {
    std::array::from_fn(|i| grid.get(positions[i]))
}

/// Returns true iff row `row` contains no duplicate values
pub fn is_valid_row(grid: &Grid, row: usize) -> bool {
    is_valid_unit(&unit_values(grid, &row_positions(row)))
}

/// Returns true iff column `col` contains no duplicate values
pub fn is_valid_column(grid: &Grid, col: usize) -> bool {
    is_valid_unit(&unit_values(grid, &column_positions(col)))
}

/// Returns true iff box `b` contains no duplicate values
pub fn is_valid_box(grid: &Grid, b: usize) -> bool {
    is_valid_unit(&unit_values(grid, &box_positions(b)))
}

/// Returns true iff the value at `pos` does not appear elsewhere in its row,
/// its column, or its full 3x3 box.
///
/// An empty cell is always a valid placement.
pub fn is_valid_placement(grid: &Grid, pos: Position) -> bool {
    let value = grid.get(pos);
    if value == 0 {
        return true;
    }

    for other in row_positions(pos.row) {
        if other.col != pos.col && grid.get(other) == value {
            return false;
        }
    }
    for other in column_positions(pos.col) {
        if other.row != pos.row && grid.get(other) == value {
            return false;
        }
    }
    // All nine cells of the containing box, not just those sharing a row or
    // column with `pos`.
    for other in box_positions(pos.box_index()) {
        if other != pos && grid.get(other) == value {
            return false;
        }
    }

    true
}

/// Returns true iff every row, column and box of the grid is valid
pub fn is_valid_board(grid: &Grid) -> bool {
    (0..9).all(|i| is_valid_row(grid, i) && is_valid_column(grid, i) && is_valid_box(grid, i))
}

/// Returns true iff the board is completely filled and valid
pub fn is_won(grid: &Grid) -> bool {
    Position::all().all(|pos| !grid.is_empty(pos)) && is_valid_board(grid)
}
