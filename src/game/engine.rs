//! Turn controller
//!
//! `GameState` is the authoritative referee for one game: every placement
//! goes through [`GameState::apply_move`], which scores the move, applies the
//! extra-turn rule and closes the game once the grid fills up.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::GameRecord;
use super::{count_new_sos, GameError, Grid, IllegalMove, Mode, Move, PlayerId};

/// Lifecycle of a game. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InProgress,
    Finished,
}

/// Who is submitting a move: the interactive input or the computer seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Human,
    Computer,
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(PlayerId),
    Draw,
}

impl Outcome {
    /// Headline for the end-of-game panel
    pub fn headline(&self, mode: Mode) -> String {
        match self {
            Outcome::Winner(player) => format!("{} Wins!", mode.player_name(*player)),
            Outcome::Draw => "It's a Draw!".to_string(),
        }
    }
}

/// Points per seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player_one: u32,
    pub player_two: u32,
}

impl Scores {
    pub fn get(&self, player: PlayerId) -> u32 {
        match player {
            PlayerId::PlayerOne => self.player_one,
            PlayerId::PlayerTwo => self.player_two,
        }
    }

    fn add(&mut self, player: PlayerId, points: u32) {
        match player {
            PlayerId::PlayerOne => self.player_one += points,
            PlayerId::PlayerTwo => self.player_two += points,
        }
    }

    /// Strict comparison; equal scores draw.
    pub fn outcome(&self) -> Outcome {
        use std::cmp::Ordering;
        match self.player_one.cmp(&self.player_two) {
            Ordering::Greater => Outcome::Winner(PlayerId::PlayerOne),
            Ordering::Less => Outcome::Winner(PlayerId::PlayerTwo),
            Ordering::Equal => Outcome::Draw,
        }
    }
}

/// What a successful move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Seat that made the move
    pub player: PlayerId,
    /// SOS sequences completed by the move
    pub points: u32,
    /// Whether `player` moves again
    pub extra_turn: bool,
    /// Set when this move filled the grid
    pub finished: Option<Outcome>,
}

/// Read-only view handed to the display.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub scores: Scores,
    pub current_player: PlayerId,
    pub phase: Phase,
    pub mode: Mode,
}

/// Authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    scores: Scores,
    current_player: PlayerId,
    mode: Mode,
    phase: Phase,
}

impl GameState {
    /// Fresh game on `grid`. Only session setup calls this.
    pub(super) fn start(grid: Grid, mode: Mode) -> Self {
        Self {
            grid,
            scores: Scores::default(),
            current_player: PlayerId::PlayerOne,
            mode,
            phase: Phase::InProgress,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Whether the computer seat is the one to move.
    pub fn is_computer_turn(&self) -> bool {
        self.phase == Phase::InProgress && self.mode.computer() == Some(self.current_player)
    }

    /// Result, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_finished().then(|| self.scores.outcome())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            scores: self.scores,
            current_player: self.current_player,
            phase: self.phase,
            mode: self.mode,
        }
    }

    /// Archival record; only available once the game is finished.
    pub fn record(&self) -> Option<GameRecord> {
        self.outcome().map(|outcome| GameRecord::capture(self, outcome))
    }

    /// Apply a move for the current player.
    ///
    /// Rejections leave the state exactly as it was.
    pub fn apply_move(&mut self, mv: Move, source: MoveSource) -> Result<MoveOutcome, GameError> {
        self.check_move(mv, source)?;

        let player = self.current_player;
        self.grid.set(mv.row, mv.col, mv.letter, player)?;

        let points = count_new_sos(&self.grid, mv.row, mv.col) as u32;
        let extra_turn = points > 0;
        if extra_turn {
            self.scores.add(player, points);
        } else {
            self.current_player = player.opponent();
        }

        let finished = if self.grid.is_full() {
            self.phase = Phase::Finished;
            Some(self.scores.outcome())
        } else {
            None
        };

        debug!(
            ?player,
            row = mv.row,
            col = mv.col,
            letter = %mv.letter,
            points,
            extra_turn,
            "move applied"
        );

        Ok(MoveOutcome {
            player,
            points,
            extra_turn,
            finished,
        })
    }

    fn check_move(&self, mv: Move, source: MoveSource) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::IllegalMove(IllegalMove::GameFinished));
        }

        let computer_turn = self.is_computer_turn();
        match source {
            MoveSource::Human if computer_turn => {
                return Err(GameError::IllegalMove(IllegalMove::NotYourTurn));
            }
            MoveSource::Computer if !computer_turn => {
                return Err(GameError::IllegalMove(IllegalMove::NotYourTurn));
            }
            _ => {}
        }

        if self.grid.get(mv.row, mv.col)?.is_some() {
            return Err(GameError::IllegalMove(IllegalMove::CellOccupied {
                row: mv.row,
                col: mv.col,
            }));
        }
        Ok(())
    }
}
