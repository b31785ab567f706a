//! Starting new games from (possibly bad) configuration

use tracing::{info, warn};

use super::{GameError, GameState, Grid, Mode};

/// Smallest playable board
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest playable board
pub const MAX_BOARD_SIZE: usize = 15;
/// Fallback when the requested size is unusable
pub const DEFAULT_BOARD_SIZE: usize = 7;

/// A freshly started game, plus a warning if the configuration was adjusted.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub state: GameState,
    /// `InvalidConfiguration` when the requested size was replaced
    pub warning: Option<GameError>,
}

/// Start a game on a `size`×`size` board. Sizes outside 3..=15 fall back to
/// 7 and come back with a warning for the caller to show.
pub fn new_game(size: usize, mode: Mode) -> NewGame {
    start(size.to_string(), Some(size), mode)
}

/// Like [`new_game`] but from raw user text; anything that is not a number
/// also falls back to the default.
pub fn new_game_from_input(input: &str, mode: Mode) -> NewGame {
    let trimmed = input.trim();
    start(trimmed.to_string(), trimmed.parse().ok(), mode)
}

fn start(requested: String, size: Option<usize>, mode: Mode) -> NewGame {
    let (grid, warning) = match size.map(Grid::new) {
        Some(Ok(grid)) => (grid, None),
        _ => {
            warn!(%requested, "invalid board size, using default");
            let warning = GameError::InvalidConfiguration {
                requested,
                used: DEFAULT_BOARD_SIZE,
            };
            (Grid::default(), Some(warning))
        }
    };

    info!(size = grid.size(), ?mode, "new game");
    NewGame {
        state: GameState::start(grid, mode),
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::Scores;
    use crate::game::{Phase, PlayerId};

    #[test]
    fn test_valid_size_kept() {
        let game = new_game(5, Mode::Pvc);
        assert!(game.warning.is_none());
        assert_eq!(game.state.grid().size(), 5);
        assert_eq!(game.state.mode(), Mode::Pvc);
        assert_eq!(game.state.current_player(), PlayerId::PlayerOne);
        assert_eq!(game.state.phase(), Phase::InProgress);
        assert_eq!(game.state.scores(), Scores::default());
    }

    #[test]
    fn test_out_of_range_defaults_with_warning() {
        for size in [0, 2, 16, 100] {
            let game = new_game(size, Mode::Pvp);
            assert_eq!(game.state.grid().size(), DEFAULT_BOARD_SIZE);
            assert_eq!(
                game.warning,
                Some(GameError::InvalidConfiguration {
                    requested: size.to_string(),
                    used: DEFAULT_BOARD_SIZE
                })
            );
        }
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(new_game(MIN_BOARD_SIZE, Mode::Pvp).warning.is_none());
        assert!(new_game(MAX_BOARD_SIZE, Mode::Pvp).warning.is_none());
    }

    #[test]
    fn test_from_input() {
        let game = new_game_from_input(" 9 ", Mode::Pvp);
        assert!(game.warning.is_none());
        assert_eq!(game.state.grid().size(), 9);

        let game = new_game_from_input("abc", Mode::Pvp);
        assert_eq!(game.state.grid().size(), DEFAULT_BOARD_SIZE);
        assert!(matches!(
            game.warning,
            Some(GameError::InvalidConfiguration { ref requested, used: 7 }) if requested == "abc"
        ));

        let game = new_game_from_input("-4", Mode::Pvp);
        assert!(game.warning.is_some());
    }

    #[test]
    fn test_warning_message() {
        let game = new_game(42, Mode::Pvp);
        assert_eq!(
            game.warning.unwrap().to_string(),
            "invalid board size \"42\", using 7"
        );
    }
}
