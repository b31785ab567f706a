//! Finished-game record handed to the archive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::{GameState, Outcome, Scores};
use super::{Letter, Mode};

/// Title stamped on every record
pub const GAME_TITLE: &str = "SOS";

/// Everything worth keeping about a finished game. Only
/// [`GameState::record`] builds one, and only after the last cell is filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game: String,
    pub timestamp: DateTime<Utc>,
    pub board_size: usize,
    pub mode: Mode,
    pub scores: Scores,
    pub outcome: Outcome,
    /// Headline as shown at the end of the game
    pub winner_text: String,
    pub final_board: Vec<Vec<Option<Letter>>>,
}

impl GameRecord {
    pub(super) fn capture(state: &GameState, outcome: Outcome) -> Self {
        Self {
            game: GAME_TITLE.to_string(),
            timestamp: Utc::now(),
            board_size: state.grid().size(),
            mode: state.mode(),
            scores: state.scores(),
            outcome,
            winner_text: outcome.headline(state.mode()),
            final_board: state.grid().letters(),
        }
    }

    /// Pretty JSON, the payload stored by the archive.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{new_game, Move, MoveSource, PlayerId};

    fn finished_pvc() -> GameState {
        let mut state = new_game(3, Mode::Pvc).state;
        // P1 S, computer O, P1 S completes row 0 and keeps the turn
        let script = [
            (0, 0, Letter::S, MoveSource::Human),
            (0, 1, Letter::O, MoveSource::Computer),
            (0, 2, Letter::S, MoveSource::Human),
            (1, 0, Letter::O, MoveSource::Human),
            (1, 1, Letter::O, MoveSource::Computer),
            (1, 2, Letter::O, MoveSource::Human),
            (2, 0, Letter::O, MoveSource::Computer),
            (2, 1, Letter::O, MoveSource::Human),
            (2, 2, Letter::O, MoveSource::Computer),
        ];
        for (row, col, letter, source) in script {
            state.apply_move(Move::new(row, col, letter), source).unwrap();
        }
        state
    }

    #[test]
    fn test_no_record_before_finish() {
        let state = new_game(3, Mode::Pvp).state;
        assert!(state.record().is_none());
    }

    #[test]
    fn test_record_shape() {
        let state = finished_pvc();
        assert!(state.is_finished());

        let record = state.record().unwrap();
        assert_eq!(record.game, "SOS");
        assert_eq!(record.board_size, 3);
        assert_eq!(record.mode, Mode::Pvc);
        assert_eq!(record.scores.player_one, 1);
        assert_eq!(record.outcome, Outcome::Winner(PlayerId::PlayerOne));
        assert_eq!(record.winner_text, "Player 1 Wins!");
        assert_eq!(record.final_board.len(), 3);
        assert_eq!(
            record.final_board[0],
            vec![Some(Letter::S), Some(Letter::O), Some(Letter::S)]
        );
    }

    #[test]
    fn test_json_layout() {
        let record = finished_pvc().record().unwrap();
        let json = record.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["game"], "SOS");
        assert_eq!(value["board_size"], 3);
        assert_eq!(value["mode"], "pvc");
        assert_eq!(value["scores"]["player_one"], 1);
        assert_eq!(value["final_board"][0][1], "O");
        assert_eq!(value["outcome"]["winner"], "PlayerOne");

        let back = GameRecord::from_json(&json).unwrap();
        assert_eq!(back, record);
    }
}
