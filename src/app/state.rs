//! Application state for a game in progress
//!
//! `App` sits between the terminal and the engine: it owns the one
//! `GameState`, resolves the selected letter for cell intents, and runs the
//! computer's deferred turn off `tick`.

use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::game::{
    choose_move, new_game, GameError, GameState, IllegalMove, Letter, Move, MoveOutcome,
    MoveSource, NewGame, Phase, PlayerId, Snapshot,
};
use crate::storage::{ArchiveReceipt, ArchiveSink, StorageError};

/// How long the computer "thinks" before moving
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(1000);

/// A computer turn waiting for its deadline. Tagged with the game it was
/// scheduled for so a restart turns it into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingComputerMove {
    pub due: Instant,
    pub game_id: u64,
}

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Main application state for one seat at the board
pub struct App {
    state: GameState,
    /// Letter written by the next cell intent
    pub selected_letter: Letter,
    /// Highlighted cell (row, col)
    pub cursor: (usize, usize),
    /// Feedback message from the last action
    pub feedback: String,
    /// Configuration warning carried over from setup
    pub warning: Option<String>,
    /// Increments on every restart
    game_id: u64,
    pending: Option<PendingComputerMove>,
    think_delay: Duration,
    rng: StdRng,
    /// Set once the finished game has been archived
    receipt: Option<ArchiveReceipt>,
}

impl App {
    /// Create a new application instance around a freshly started game
    pub fn new(game: NewGame, think_delay: Duration) -> Self {
        Self::with_rng(game, think_delay, StdRng::from_os_rng())
    }

    /// Use a specific RNG (for testing/seeding).
    pub fn with_rng(game: NewGame, think_delay: Duration, rng: StdRng) -> Self {
        Self {
            state: game.state,
            selected_letter: Letter::S,
            cursor: (0, 0),
            feedback: String::new(),
            warning: game.warning.map(|w| w.to_string()),
            game_id: 0,
            pending: None,
            think_delay,
            rng,
            receipt: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Read-only view for the display
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    #[cfg(test)]
    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<PendingComputerMove> {
        self.pending
    }

    /// Whether the computer's deferred move is outstanding
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn receipt(&self) -> Option<ArchiveReceipt> {
        self.receipt
    }

    pub fn select_letter(&mut self, letter: Letter) {
        self.selected_letter = letter;
    }

    pub fn toggle_letter(&mut self) {
        self.selected_letter = self.selected_letter.toggled();
    }

    /// Move the cursor, clamped to the board
    pub fn move_cursor(&mut self, direction: Direction) {
        let last = self.state.grid().size() - 1;
        let (row, col) = &mut self.cursor;
        match direction {
            Direction::Up => *row = row.saturating_sub(1),
            Direction::Down => *row = (*row + 1).min(last),
            Direction::Left => *col = col.saturating_sub(1),
            Direction::Right => *col = (*col + 1).min(last),
        }
    }

    /// Place the selected letter under the cursor
    pub fn place_at_cursor(&mut self, now: Instant) -> Result<MoveOutcome, GameError> {
        let (row, col) = self.cursor;
        self.handle_cell_intent(row, col, now)
    }

    /// A human clicked (`row`, `col`): write the selected letter there.
    ///
    /// Ignored while the computer is thinking. `now` anchors the computer's
    /// reply if the turn passes to it. The cursor follows the intent only
    /// when it lands on the board.
    pub fn handle_cell_intent(
        &mut self,
        row: usize,
        col: usize,
        now: Instant,
    ) -> Result<MoveOutcome, GameError> {
        if let Err(e) = self.state.grid().get(row, col) {
            return self.reject(e);
        }
        self.cursor = (row, col);
        if self.pending.is_some() {
            return self.reject(GameError::IllegalMove(IllegalMove::NotYourTurn));
        }

        let mv = Move::new(row, col, self.selected_letter);
        match self.state.apply_move(mv, MoveSource::Human) {
            Ok(outcome) => {
                self.after_move(outcome, now);
                Ok(outcome)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Advance time: play the computer's move once its deadline has passed.
    /// Returns the computer's move outcome if one was played.
    pub fn tick(&mut self, now: Instant) -> Option<MoveOutcome> {
        let pending = self.pending?;
        if pending.due > now {
            return None;
        }
        self.pending = None;

        if pending.game_id != self.game_id || !self.state.is_computer_turn() {
            debug!(?pending, "dropping stale computer move");
            return None;
        }

        let me = self.state.current_player();
        let mv = choose_move(self.state.grid(), me, &mut self.rng)?;
        match self.state.apply_move(mv, MoveSource::Computer) {
            Ok(outcome) => {
                self.after_move(outcome, now);
                Some(outcome)
            }
            Err(e) => {
                warn!(error = %e, "computer move rejected");
                None
            }
        }
    }

    /// Start over with the same board size and mode.
    pub fn restart(&mut self) {
        let size = self.state.grid().size();
        let mode = self.state.mode();
        let game = new_game(size, mode);
        self.state = game.state;
        self.game_id += 1;
        self.pending = None;
        self.receipt = None;
        self.cursor = (0, 0);
        self.selected_letter = Letter::S;
        self.feedback.clear();
        self.warning = None;
    }

    /// Hand the finished game to `sink`, at most once per game.
    pub fn archive(
        &mut self,
        sink: &mut dyn ArchiveSink,
    ) -> Result<Option<ArchiveReceipt>, StorageError> {
        if let Some(receipt) = self.receipt {
            return Ok(Some(receipt));
        }
        let Some(record) = self.state.record() else {
            return Ok(None);
        };
        let receipt = sink.archive(&record)?;
        self.receipt = Some(receipt);
        self.feedback = format!("Archived as game #{}", receipt.id);
        Ok(Some(receipt))
    }

    /// Title for the end-of-game panel
    pub fn headline(&self) -> Option<String> {
        self.state
            .outcome()
            .map(|outcome| outcome.headline(self.state.mode()))
    }

    /// "Player 1: 3 - Computer: 2"
    pub fn score_line(&self) -> String {
        let snapshot = self.snapshot();
        [PlayerId::PlayerOne, PlayerId::PlayerTwo]
            .map(|player| {
                format!(
                    "{}: {}",
                    snapshot.mode.player_name(player),
                    snapshot.scores.get(player)
                )
            })
            .join(" - ")
    }

    /// Turn indicator text
    pub fn turn_label(&self) -> String {
        if self.is_thinking() {
            return "Computer is thinking...".to_string();
        }
        let snapshot = self.snapshot();
        match snapshot.phase {
            Phase::Finished => "Game over".to_string(),
            Phase::InProgress => format!(
                "Turn: {}",
                snapshot.mode.player_name(snapshot.current_player)
            ),
        }
    }

    fn after_move(&mut self, outcome: MoveOutcome, now: Instant) {
        let name = self.state.mode().player_name(outcome.player);
        self.feedback = if outcome.points > 0 {
            format!("SOS! {} +{}", name, outcome.points)
        } else {
            String::new()
        };

        if let Some(result) = outcome.finished {
            self.pending = None;
            let headline = result.headline(self.state.mode());
            info!(
                %headline,
                player_one = self.state.scores().player_one,
                player_two = self.state.scores().player_two,
                "game finished"
            );
            return;
        }

        if self.state.is_computer_turn() && self.pending.is_none() {
            self.pending = Some(PendingComputerMove {
                due: now + self.think_delay,
                game_id: self.game_id,
            });
        }
    }

    fn reject<T>(&mut self, error: GameError) -> Result<T, GameError> {
        debug!(error = %error, "move rejected");
        if let GameError::IllegalMove(reason) = &error {
            self.feedback = reason.message().to_string();
        }
        Err(error)
    }
}
