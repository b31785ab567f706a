//! Game logic: grid, SOS detection, turn control, computer strategy, sessions

pub mod detector;
pub mod engine;
pub mod grid;
pub mod record;
pub mod session;
pub mod strategy;

pub use detector::count_new_sos;
pub use engine::{GameState, MoveOutcome, MoveSource, Outcome, Phase, Snapshot};
pub use grid::Grid;
pub use record::GameRecord;
pub use session::{new_game, new_game_from_input, NewGame, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use strategy::choose_move;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A letter that can be written into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    S,
    O,
}

impl Letter {
    /// The other letter.
    pub fn toggled(self) -> Self {
        match self {
            Letter::S => Letter::O,
            Letter::O => Letter::S,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::S => 'S',
            Letter::O => 'O',
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    PlayerOne,
    PlayerTwo,
}

impl PlayerId {
    /// The player sitting across the table.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::PlayerOne => PlayerId::PlayerTwo,
            PlayerId::PlayerTwo => PlayerId::PlayerOne,
        }
    }
}

/// Player-vs-player or player-vs-computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Pvp,
    Pvc,
}

impl Mode {
    /// The seat the computer plays in this mode, if any.
    pub fn computer(self) -> Option<PlayerId> {
        match self {
            Mode::Pvp => None,
            Mode::Pvc => Some(PlayerId::PlayerTwo),
        }
    }

    /// Display name for a seat under this mode.
    pub fn player_name(self, player: PlayerId) -> &'static str {
        match (self, player) {
            (_, PlayerId::PlayerOne) => "Player 1",
            (Mode::Pvp, PlayerId::PlayerTwo) => "Player 2",
            (Mode::Pvc, PlayerId::PlayerTwo) => "Computer",
        }
    }

    /// The other mode, for the setup toggle
    pub fn toggled(self) -> Self {
        match self {
            Mode::Pvp => Mode::Pvc,
            Mode::Pvc => Mode::Pvp,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Pvp => "Player vs Player",
            Mode::Pvc => "Player vs Computer",
        }
    }
}

/// An occupied cell: the letter and who wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placed {
    pub letter: Letter,
    pub owner: PlayerId,
}

/// A request to write `letter` at (`row`, `col`) for whoever is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub letter: Letter,
}

impl Move {
    pub fn new(row: usize, col: usize, letter: Letter) -> Self {
        Self { row, col, letter }
    }
}

/// Why a move was refused by the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// The game has already finished
    GameFinished,
    /// The target cell already holds a letter
    CellOccupied { row: usize, col: usize },
    /// The move came from a source that does not own the current turn
    NotYourTurn,
}

impl IllegalMove {
    /// Returns a short user-facing message
    pub fn message(&self) -> &'static str {
        match self {
            IllegalMove::GameFinished => "Game is over",
            IllegalMove::CellOccupied { .. } => "Cell already taken",
            IllegalMove::NotYourTurn => "Not your turn",
        }
    }
}

/// Errors raised by the game core. None of them leave the game in an
/// inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("board size {0} is outside {}..={}", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    InvalidSize(usize),
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },
    #[error("illegal move: {}", .0.message())]
    IllegalMove(IllegalMove),
    #[error("invalid board size {requested:?}, using {used}")]
    InvalidConfiguration { requested: String, used: usize },
}
