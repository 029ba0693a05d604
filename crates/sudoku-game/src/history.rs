use serde::{Deserialize, Serialize};
use sudoku_core::{Grid, Position};

/// A single recorded edit: the cell and the value it replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub pos: Position,
    pub previous: u8,
}

/// Undo/redo stacks for cell edits.
///
/// Each stack entry records the value a cell held *before* the corresponding
/// apply, so popping a move and writing `previous` back restores the board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    undo_stack: Vec<Move>,
    redo_stack: Vec<Move>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value being replaced at `pos`, then apply the edit.
    ///
    /// Redo does not branch: any edit that is not itself an undo or redo
    /// invalidates the redo path, so the redo stack is cleared.
    pub fn record_and_apply(&mut self, grid: &mut Grid, pos: Position, value: u8) {
        self.undo_stack.push(Move {
            pos,
            previous: grid.get(pos),
        });
        self.redo_stack.clear();
        grid.set(pos, value);
    }

    /// Undo the most recent edit, returning its position for refocusing.
    ///
    /// No-op returning `None` when there is nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> Option<Position> {
        let mv = self.undo_stack.pop()?;
        self.redo_stack.push(Move {
            pos: mv.pos,
            previous: grid.get(mv.pos),
        });
        grid.set(mv.pos, mv.previous);
        Some(mv.pos)
    }

    /// Redo the most recently undone edit, returning its position.
    ///
    /// No-op returning `None` when there is nothing to redo.
    pub fn redo(&mut self, grid: &mut Grid) -> Option<Position> {
        let mv = self.redo_stack.pop()?;
        self.undo_stack.push(Move {
            pos: mv.pos,
            previous: grid.get(mv.pos),
        });
        grid.set(mv.pos, mv.previous);
        Some(mv.pos)
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Whether there is anything to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is anything to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable moves
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable moves
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
