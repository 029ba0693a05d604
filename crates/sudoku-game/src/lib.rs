//! Game-side Sudoku engine.
//!
//! Builds the interactive pieces on top of `sudoku-core`: the undo/redo
//! [`History`], the solution-backed check and hint features, the [`Session`]
//! state machine that sequences them, and the [`Catalog`] that supplies
//! starting boards.
//!
//! A session manages exactly one active puzzle and runs every operation to
//! completion on the calling thread; the presentation layer is expected to
//! serialize its requests.

pub mod catalog;
pub mod hint;
pub mod history;
pub mod session;

pub use catalog::{Catalog, CatalogError, Level};
pub use hint::HintOutcome;
pub use history::{History, Move};
pub use session::{BoardState, Session, SessionError, SessionUpdate};
