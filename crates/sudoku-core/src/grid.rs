use serde::{Deserialize, Serialize};

/// A cell coordinate on the 9x9 board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Iterate over all 81 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..9).flat_map(|row| (0..9).map(move |col| Position::new(row, col)))
    }

    /// The index of the 3x3 box containing this position.
    ///
    /// Boxes are numbered column-major: box `b` covers rows `3*(b%3)..` and
    /// columns `3*(b/3)..`, so boxes 0, 1 and 2 run down the left-hand band.
    pub fn box_index(&self) -> usize {
        self.row / 3 + 3 * (self.col / 3)
    }
}

/// The 9 positions of row `row`, left to right
pub fn row_positions(row: usize) -> [Position; 9] {
    std::array::from_fn(|col| Position::new(row, col))
}

/// The 9 positions of column `col`, top to bottom
pub fn column_positions(col: usize) -> [Position; 9] {
    std::array::from_fn(|row| Position::new(row, col))
}

/// The 9 positions of box `b`, row-major within the box.
///
/// Uses the column-major box numbering described on [`Position::box_index`].
pub fn box_positions(b: usize) -> [Position; 9] {
    let top = 3 * (b % 3);
    let left = 3 * (b / 3);
    std::array::from_fn(|i| Position::new(top + i / 3, left + i % 3))
}

/// The 9x9 board. Cell values are 0-9, with 0 meaning empty.
///
/// The grid is purely structural: it stores and indexes cells but performs no
/// rule checking. Validity lives in the [`rules`](crate::rules) module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u8; 9]; 9],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn empty() -> Self {
        Self { cells: [[0; 9]; 9] }
    }

    /// Get the value at a position (0 = empty)
    pub fn get(&self, pos: Position) -> u8 {
        self.cells[pos.row][pos.col]
    }

    /// Set the value at a position (0 = empty)
    pub fn set(&mut self, pos: Position, value: u8) {
        debug_assert!(value <= 9);
        self.cells[pos.row][pos.col] = value;
    }

    /// Check whether the cell at a position is empty
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == 0
    }

    /// All empty positions in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::all().filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Parse a grid from an 81-character string, row-major.
    ///
    /// Digits 1-9 are values; '0' and '.' are empty. Returns `None` for any
    /// other character or length.
    pub fn from_string(s: &str) -> Option<Self> {
        let mut grid = Self::empty();
        let mut positions = Position::all();
        let mut count = 0;

        for c in s.chars() {
            let pos = positions.next()?;
            match c {
                '.' | '0' => {}
                '1'..='9' => grid.set(pos, c as u8 - b'0'),
                _ => return None,
            }
            count += 1;
        }

        if count == 81 {
            Some(grid)
        } else {
            None
        }
    }

    /// Format the grid as an 81-character string, row-major, '0' for empty
    pub fn to_string_compact(&self) -> String {
        Position::all()
            .map(|pos| (self.get(pos) + b'0') as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_numbering_is_column_major() {
        // Box 1 sits directly below box 0: rows 3-5, columns 0-2.
        let positions = box_positions(1);
        assert_eq!(positions[0], Position::new(3, 0));
        assert_eq!(positions[8], Position::new(5, 2));

        // Box 3 sits to the right of box 0: rows 0-2, columns 3-5.
        let positions = box_positions(3);
        assert_eq!(positions[0], Position::new(0, 3));
        assert_eq!(positions[8], Position::new(2, 5));
    }

    #[test]
    fn test_box_index_matches_box_positions() {
        for b in 0..9 {
            for pos in box_positions(b) {
                assert_eq!(pos.box_index(), b);
            }
        }
    }

    #[test]
    fn test_units_cover_the_grid() {
        for i in 0..9 {
            assert_eq!(row_positions(i).len(), 9);
            assert!(row_positions(i).iter().all(|p| p.row == i));
            assert!(column_positions(i).iter().all(|p| p.col == i));
        }
    }

    #[test]
    fn test_string_round_trip() {
        let puzzle =
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let grid = Grid::from_string(puzzle).unwrap();

        assert_eq!(grid.get(Position::new(0, 0)), 5);
        assert_eq!(grid.get(Position::new(0, 2)), 0);
        assert_eq!(grid.get(Position::new(8, 8)), 9);
        assert_eq!(grid.to_string_compact(), puzzle);
    }

    #[test]
    fn test_from_string_accepts_dots() {
        let grid = Grid::from_string(&".".repeat(81)).unwrap();
        assert_eq!(grid, Grid::empty());
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert!(Grid::from_string("123").is_none());
        assert!(Grid::from_string(&"x".repeat(81)).is_none());
        assert!(Grid::from_string(&"1".repeat(82)).is_none());
    }

    #[test]
    fn test_empty_positions_row_major() {
        let mut grid = Grid::empty();
        grid.set(Position::new(0, 0), 1);
        grid.set(Position::new(4, 4), 2);

        let empty = grid.empty_positions();
        assert_eq!(empty.len(), 79);
        assert_eq!(empty[0], Position::new(0, 1));
        // Row-major order is what hint targeting depends on.
        assert!(empty.windows(2).all(|w| (w[0].row, w[0].col) < (w[1].row, w[1].col)));
    }

    #[test]
    fn test_serde_round_trip() {
        let puzzle =
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let grid = Grid::from_string(puzzle).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
