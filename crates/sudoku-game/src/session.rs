use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use sudoku_core::{rules, Grid, Position, Solver};

use crate::hint::{self, HintOutcome};
use crate::history::History;

/// Why the board currently looks the way it does.
///
/// Derived after every mutation and used to drive user-facing messaging and
/// the gating of further actions. `Won` is terminal for direct edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    Ok,
    InvalidPlacement,
    InvalidBoard,
    Won,
    Checked,
    CheckFailed,
    Hinted,
    HintFixed,
}

impl BoardState {
    /// The banner line to show for this state, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            BoardState::Ok => None,
            BoardState::InvalidPlacement => {
                Some("Oops! That number can't go there. Use 'u' to undo moves.")
            }
            BoardState::InvalidBoard => {
                Some("Oops! There's still a problem somewhere. Use 'u' to undo moves.")
            }
            BoardState::Won => Some("Congratulations! You solved the puzzle!"),
            BoardState::Checked => Some("So far, so good..."),
            BoardState::CheckFailed => {
                Some("Oops! You've made a mistake somewhere. Use 'u' to undo moves or 'h' to fix.")
            }
            BoardState::Hinted => Some("Hope that helps!"),
            BoardState::HintFixed => Some("Any mistakes are now fixed!"),
        }
    }
}

/// Failure to start a session
#[derive(Debug)]
pub enum SessionError {
    /// The starting grid has no completion satisfying the Sudoku rules.
    ///
    /// The catalog is curated to exclude this, so hitting it means the
    /// puzzle data is corrupt.
    Unsolvable,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Unsolvable => write!(f, "starting board has no solution"),
        }
    }
}

impl std::error::Error for SessionError {}

/// What an accepted operation changed, for the presentation layer.
///
/// Rejected operations (locked cells, edits after a win, empty stacks)
/// return no update at all; the caller has nothing to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// The state of the board after the operation
    pub state: BoardState,
    /// Cells whose values changed, for redraw
    pub changed: Vec<Position>,
    /// Where the cursor should move, if anywhere
    pub focus: Option<Position>,
}

/// One active puzzle: the three grids, the move history and the state machine.
///
/// A session is created from a starting grid (solving it once up front for
/// the hint and check features) and dropped when the player loads or
/// restarts a puzzle. All operations run synchronously on the caller's
/// thread; the session has no interior concurrency.
pub struct Session {
    current: Grid,
    starting: Grid,
    solution: Grid,
    history: History,
    state: BoardState,
    started: Instant,
    finished: Option<Instant>,
    hints_used: usize,
}

impl Session {
    /// Start a session from a puzzle grid.
    ///
    /// Runs the backtracking solver once to precompute the solution used by
    /// check and hint. This is a potentially slow blocking call.
    pub fn new(starting: Grid) -> Result<Self, SessionError> {
        let solver = Solver::new();
        let solution = solver.solve(&starting).ok_or(SessionError::Unsolvable)?;

        Ok(Self {
            current: starting.clone(),
            starting,
            solution,
            history: History::new(),
            state: BoardState::Ok,
            started: Instant::now(),
            finished: None,
            hints_used: 0,
        })
    }

    /// The current board
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// The current board state
    pub fn state(&self) -> BoardState {
        self.state
    }

    /// True if the cell's value came from the starting board.
    ///
    /// Locked cells reject every direct edit. A successful check re-takes
    /// the starting snapshot, so checked cells become locked too.
    pub fn is_locked(&self, pos: Position) -> bool {
        !self.starting.is_empty(pos)
    }

    /// Number of hints that filled a cell this session
    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    /// Time spent on the puzzle; stops counting once the puzzle is won
    pub fn elapsed(&self) -> Duration {
        match self.finished {
            Some(end) => end.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Format the elapsed time as MM:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Classify the board after an edit at `pos`, without win detection
    fn classify_edit(&self, pos: Position) -> BoardState {
        if !rules::is_valid_placement(&self.current, pos) {
            BoardState::InvalidPlacement
        } else if !rules::is_valid_board(&self.current) {
            BoardState::InvalidBoard
        } else {
            BoardState::Ok
        }
    }

    fn stop_clock(&mut self) {
        if self.finished.is_none() {
            self.finished = Some(Instant::now());
        }
    }

    /// Enter a digit 1-9 at `pos`.
    ///
    /// Rejected (returning `None`) when the puzzle is already won, the cell
    /// is locked, or the digit is out of range.
    pub fn enter_digit(&mut self, pos: Position, digit: u8) -> Option<SessionUpdate> {
        if self.state == BoardState::Won || self.is_locked(pos) || !(1..=9).contains(&digit) {
            return None;
        }

        self.history.record_and_apply(&mut self.current, pos, digit);

        self.state = match self.classify_edit(pos) {
            BoardState::Ok if rules::is_won(&self.current) => {
                self.stop_clock();
                BoardState::Won
            }
            state => state,
        };

        Some(SessionUpdate {
            state: self.state,
            changed: vec![pos],
            focus: None,
        })
    }

    /// Erase the value at `pos`.
    ///
    /// Rejected when the puzzle is already won or the cell is locked.
    /// Removing a value can never make a placement invalid, so the result is
    /// either `InvalidBoard` (some other conflict remains) or `Ok`.
    pub fn erase(&mut self, pos: Position) -> Option<SessionUpdate> {
        if self.state == BoardState::Won || self.is_locked(pos) {
            return None;
        }

        self.history.record_and_apply(&mut self.current, pos, 0);

        self.state = if !rules::is_valid_board(&self.current) {
            BoardState::InvalidBoard
        } else {
            BoardState::Ok
        };

        Some(SessionUpdate {
            state: self.state,
            changed: vec![pos],
            focus: None,
        })
    }

    /// Undo the most recent edit, moving focus to the restored cell.
    ///
    /// While a failed check is being repaired one undo at a time, the
    /// `CheckFailed` message stays up until the board agrees with the
    /// solution again.
    pub fn undo(&mut self) -> Option<SessionUpdate> {
        if self.state == BoardState::Won {
            return None;
        }

        let pos = self.history.undo(&mut self.current)?;

        self.state = if !rules::is_valid_board(&self.current) {
            BoardState::InvalidBoard
        } else if self.state == BoardState::CheckFailed
            && !hint::check(&self.current, &self.solution)
        {
            BoardState::CheckFailed
        } else {
            BoardState::Ok
        };

        Some(SessionUpdate {
            state: self.state,
            changed: vec![pos],
            focus: Some(pos),
        })
    }

    /// Redo the most recently undone edit, moving focus to the cell.
    ///
    /// Permitted even after a win. Redo never runs win detection, so
    /// redoing onto a complete board reports `Ok` rather than `Won`.
    pub fn redo(&mut self) -> Option<SessionUpdate> {
        let pos = self.history.redo(&mut self.current)?;

        self.state = self.classify_edit(pos);

        Some(SessionUpdate {
            state: self.state,
            changed: vec![pos],
            focus: Some(pos),
        })
    }

    /// Check the filled cells against the solution.
    ///
    /// On success the history is cleared and the current board becomes the
    /// new starting snapshot: the checked cells lock, and there is nothing
    /// left to undo past.
    pub fn check(&mut self) -> Option<SessionUpdate> {
        if self.state == BoardState::Won {
            return None;
        }

        self.state = if hint::check(&self.current, &self.solution) {
            self.history.clear();
            self.starting = self.current.clone();
            BoardState::Checked
        } else {
            BoardState::CheckFailed
        };

        Some(SessionUpdate {
            state: self.state,
            changed: Vec::new(),
            focus: None,
        })
    }

    /// Request a hint.
    ///
    /// With a correct board, fills one random empty cell from the solution
    /// (possibly finishing the puzzle). With mistakes on the board, rolls
    /// them back through the history instead.
    pub fn hint<R: Rng>(&mut self, rng: &mut R) -> Option<SessionUpdate> {
        if self.state == BoardState::Won {
            return None;
        }

        match hint::hint(&mut self.current, &self.solution, &mut self.history, rng) {
            HintOutcome::Filled(pos) => {
                self.hints_used += 1;
                self.state = if rules::is_won(&self.current) {
                    self.stop_clock();
                    BoardState::Won
                } else {
                    BoardState::Hinted
                };
                Some(SessionUpdate {
                    state: self.state,
                    changed: vec![pos],
                    focus: Some(pos),
                })
            }
            HintOutcome::FixedViaUndo(undone) => {
                self.state = BoardState::HintFixed;
                let focus = undone.last().copied();
                Some(SessionUpdate {
                    state: self.state,
                    changed: undone,
                    focus,
                })
            }
            // Complete and correct means the board is won; the Won guard
            // above makes this unreachable in normal play.
            HintOutcome::AlreadyComplete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn session() -> Session {
        Session::new(Grid::from_string(PUZZLE).unwrap()).unwrap()
    }

    /// The solved grid with the cells at the given positions blanked
    fn nearly_solved(blanks: &[Position]) -> Grid {
        let mut grid = Grid::from_string(SOLUTION).unwrap();
        for &pos in blanks {
            grid.set(pos, 0);
        }
        grid
    }

    #[test]
    fn test_unsolvable_board_is_rejected() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        grid.set(Position::new(0, 2), 5);
        assert!(matches!(
            Session::new(grid),
            Err(SessionError::Unsolvable)
        ));
    }

    #[test]
    fn test_locked_cells_reject_edits() {
        let mut session = session();
        let locked = Position::new(0, 0);
        assert!(session.is_locked(locked));

        assert_eq!(session.enter_digit(locked, 1), None);
        assert_eq!(session.erase(locked), None);
        assert_eq!(session.state(), BoardState::Ok);
        assert_eq!(session.grid().get(locked), 5);
    }

    #[test]
    fn test_enter_digit_and_classification() {
        let mut session = session();
        let pos = Position::new(0, 2);

        // Row 0 already holds a 5 at (0,0).
        let update = session.enter_digit(pos, 5).unwrap();
        assert_eq!(update.state, BoardState::InvalidPlacement);
        assert_eq!(update.changed, vec![pos]);

        // Undoing the bad entry restores the previous value and state.
        let update = session.undo().unwrap();
        assert_eq!(update.state, BoardState::Ok);
        assert_eq!(update.focus, Some(pos));
        assert!(session.grid().is_empty(pos));
    }

    #[test]
    fn test_erase_classification() {
        let mut session = session();
        let a = Position::new(0, 2);
        let b = Position::new(0, 3);

        // Two 2s in row 0: the board is invalid wherever we look.
        session.enter_digit(a, 2).unwrap();
        let update = session.enter_digit(b, 2).unwrap();
        assert_eq!(update.state, BoardState::InvalidPlacement);

        // Erasing one of them clears the conflict.
        let update = session.erase(b).unwrap();
        assert_eq!(update.state, BoardState::Ok);

        // Erasing an already-empty unlocked cell is recorded but harmless.
        let update = session.erase(b).unwrap();
        assert_eq!(update.state, BoardState::Ok);
    }

    #[test]
    fn test_erase_with_remaining_conflict_is_invalid_board() {
        let mut session = session();
        let a = Position::new(0, 2);
        let b = Position::new(2, 3);
        let c = Position::new(2, 4);

        session.enter_digit(a, 2).unwrap();
        // Conflict between b and c, away from a.
        session.enter_digit(b, 3).unwrap();
        session.enter_digit(c, 3).unwrap();

        let update = session.erase(a).unwrap();
        assert_eq!(update.state, BoardState::InvalidBoard);
    }

    #[test]
    fn test_winning_move() {
        let last = Position::new(4, 4);
        let mut session = Session::new(nearly_solved(&[last])).unwrap();
        let solution = Grid::from_string(SOLUTION).unwrap();

        let update = session.enter_digit(last, solution.get(last)).unwrap();
        assert_eq!(update.state, BoardState::Won);

        // Terminal: no further edits, undos, checks or hints.
        assert_eq!(session.enter_digit(Position::new(4, 5), 1), None);
        assert_eq!(session.erase(last), None);
        assert_eq!(session.undo(), None);
        assert_eq!(session.check(), None);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.hint(&mut rng), None);

        // The clock froze with the win.
        let frozen = session.elapsed();
        assert_eq!(session.elapsed(), frozen);
    }

    #[test]
    fn test_redo_is_permitted_after_win() {
        let a = Position::new(0, 2);
        let b = Position::new(7, 7);
        let mut session = Session::new(nearly_solved(&[a, b])).unwrap();
        let solution = Grid::from_string(SOLUTION).unwrap();

        // Enter a correct value, then undo it so the redo stack is live.
        session.enter_digit(a, solution.get(a)).unwrap();
        session.undo().unwrap();

        // Hints fill the two remaining cells; the second one wins.
        let mut rng = StdRng::seed_from_u64(3);
        session.hint(&mut rng).unwrap();
        let update = session.hint(&mut rng).unwrap();
        assert_eq!(update.state, BoardState::Won);

        // Redo still works, and without win detection it reports Ok even
        // though the board is complete.
        let update = session.redo().unwrap();
        assert_eq!(update.state, BoardState::Ok);
        assert_eq!(update.focus, Some(a));
    }

    #[test]
    fn test_check_success_promotes_starting_board() {
        let mut session = session();
        let pos = Position::new(0, 2);
        let solution = Grid::from_string(SOLUTION).unwrap();

        session.enter_digit(pos, solution.get(pos)).unwrap();
        let update = session.check().unwrap();
        assert_eq!(update.state, BoardState::Checked);

        // The verified cell is now part of the starting snapshot.
        assert!(session.is_locked(pos));
        assert_eq!(session.enter_digit(pos, 9), None);
        // And the history is gone.
        assert_eq!(session.undo(), None);
        assert_eq!(session.redo(), None);
    }

    #[test]
    fn test_check_failure_and_undo_keep_check_failed() {
        let mut session = session();
        // Wrong values that are placement-valid, so only check notices.
        let a = Position::new(0, 2); // solution: 4
        let b = Position::new(0, 5); // solution: 8

        session.enter_digit(a, 2).unwrap();
        session.enter_digit(b, 4).unwrap();

        let update = session.check().unwrap();
        assert_eq!(update.state, BoardState::CheckFailed);

        // One mistake remains after the first undo.
        let update = session.undo().unwrap();
        assert_eq!(update.state, BoardState::CheckFailed);

        // The second undo clears the last mistake.
        let update = session.undo().unwrap();
        assert_eq!(update.state, BoardState::Ok);
    }

    #[test]
    fn test_hint_fills_and_reports_focus() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(11);

        let update = session.hint(&mut rng).unwrap();
        assert_eq!(update.state, BoardState::Hinted);

        let pos = update.focus.unwrap();
        let solution = Grid::from_string(SOLUTION).unwrap();
        assert_eq!(session.grid().get(pos), solution.get(pos));
        assert_eq!(session.hints_used(), 1);
    }

    #[test]
    fn test_hint_after_failed_check_fixes_mistakes() {
        let mut session = session();
        let a = Position::new(0, 2);
        session.enter_digit(a, 2).unwrap(); // solution: 4

        session.check().unwrap();
        assert_eq!(session.state(), BoardState::CheckFailed);

        let mut rng = StdRng::seed_from_u64(5);
        let update = session.hint(&mut rng).unwrap();
        assert_eq!(update.state, BoardState::HintFixed);
        assert_eq!(update.changed, vec![a]);
        assert_eq!(update.focus, Some(a));
        assert!(session.grid().is_empty(a));
        // Fixing mistakes is not a hint fill.
        assert_eq!(session.hints_used(), 0);
    }

    #[test]
    fn test_hint_win_on_last_cell() {
        let last = Position::new(8, 0);
        let mut session = Session::new(nearly_solved(&[last])).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let update = session.hint(&mut rng).unwrap();
        assert_eq!(update.state, BoardState::Won);
        assert_eq!(update.focus, Some(last));
    }

    #[test]
    fn test_board_state_messages() {
        assert_eq!(BoardState::Ok.message(), None);
        for state in [
            BoardState::InvalidPlacement,
            BoardState::InvalidBoard,
            BoardState::Won,
            BoardState::Checked,
            BoardState::CheckFailed,
            BoardState::Hinted,
            BoardState::HintFixed,
        ] {
            assert!(state.message().is_some());
        }
    }

    #[test]
    fn test_elapsed_string_format() {
        let session = session();
        let formatted = session.elapsed_string();
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[..3], "00:");
    }
}
