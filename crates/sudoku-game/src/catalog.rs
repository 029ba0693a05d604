//! The read-only board catalog the game loads puzzles from.
//!
//! Boards ship in per-level binary files: a flat sequence of boards, each 81
//! little-endian 32-bit integers in row-major order. Board numbers are
//! 1-based.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sudoku_core::{Grid, Position};

/// Bytes per stored cell
const CELL_SIZE: u64 = 4;
/// Bytes per stored board
const BOARD_SIZE: u64 = 81 * CELL_SIZE;

/// A difficulty tier in the board catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Tiny debugging set
    Debug,
    /// Easier boards
    Noob,
    /// Harder boards
    Leet,
}

impl Level {
    /// Number of boards the catalog holds for this level
    pub fn board_count(&self) -> u32 {
        match self {
            Level::Debug => 9,
            Level::Noob | Level::Leet => 1024,
        }
    }

    /// Name of the file holding this level's boards
    pub fn file_name(&self) -> &'static str {
        match self {
            Level::Debug => "debug.bin",
            Level::Noob => "n00b.bin",
            Level::Leet => "l33t.bin",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "debug"),
            Level::Noob => write!(f, "n00b"),
            Level::Leet => write!(f, "l33t"),
        }
    }
}

/// Why a board could not be loaded.
///
/// All of these are fatal to starting a session: the engine never begins
/// play on a board it could not read in full.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be opened or read
    Io(io::Error),
    /// The file length is not a whole number of boards
    BadLength(u64),
    /// The board number is outside the catalog (1-based)
    BadNumber(u32),
    /// A stored cell value was outside 0-9
    BadCell(i32),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "could not read catalog file: {}", err),
            CatalogError::BadLength(len) => {
                write!(f, "catalog file length {} is not a whole number of boards", len)
            }
            CatalogError::BadNumber(number) => write!(f, "board #{} does not exist", number),
            CatalogError::BadCell(value) => write!(f, "stored cell value {} is out of range", value),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

/// Reads starting boards from an on-disk catalog directory
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    /// Create a catalog rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Pick a random 1-based board number for a level.
    ///
    /// Seeding the RNG with a chosen number reproduces the same sequence of
    /// boards across runs.
    pub fn random_number<R: Rng>(level: Level, rng: &mut R) -> u32 {
        rng.gen_range(1..=level.board_count())
    }

    /// Load board `number` (1-based) for `level`
    pub fn load(&self, level: Level, number: u32) -> Result<Grid, CatalogError> {
        if number < 1 || number > level.board_count() {
            return Err(CatalogError::BadNumber(number));
        }

        let mut file = File::open(self.dir.join(level.file_name()))?;

        let len = file.metadata()?.len();
        if len % BOARD_SIZE != 0 {
            return Err(CatalogError::BadLength(len));
        }
        // The file may legitimately hold fewer boards than the level's
        // nominal count; reject numbers past its actual end.
        if u64::from(number) * BOARD_SIZE > len {
            return Err(CatalogError::BadNumber(number));
        }

        file.seek(SeekFrom::Start(u64::from(number - 1) * BOARD_SIZE))?;
        let mut buf = [0u8; BOARD_SIZE as usize];
        file.read_exact(&mut buf)?;

        let mut grid = Grid::empty();
        for (chunk, pos) in buf.chunks_exact(CELL_SIZE as usize).zip(Position::all()) {
            let raw = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if !(0..=9).contains(&raw) {
                return Err(CatalogError::BadCell(raw));
            }
            grid.set(pos, raw as u8);
        }

        Ok(grid)
    }
}
