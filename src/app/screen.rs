//! Application screen state management
//!
//! Two screens:
//! - Setup (board size, mode, start/quit)
//! - Playing, including the end-of-game panel

use std::time::{Duration, Instant};
use tracing::warn;

use crate::game::{new_game_from_input, GameRecord, Mode, MoveOutcome};
use crate::storage::{Archive, ArchiveTally};

use super::state::App;

/// Longest accepted board size input
const MAX_SIZE_INPUT: usize = 2;
/// Archived games listed on the setup screen
const RECENT_GAMES: u32 = 5;

/// Option on the setup screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOption {
    BoardSize,
    Mode,
    Start,
    Quit,
}

impl SetupOption {
    /// Get all setup options in order
    pub fn all() -> &'static [SetupOption] {
        &[
            SetupOption::BoardSize,
            SetupOption::Mode,
            SetupOption::Start,
            SetupOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            SetupOption::BoardSize => "Board Size",
            SetupOption::Mode => "Mode",
            SetupOption::Start => "Start Game",
            SetupOption::Quit => "Quit",
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Game configuration
    Setup {
        selected: usize,
        size_input: String,
        mode: Mode,
    },
    /// A game in progress or just finished
    Playing { app: App },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Warning left by the last configuration that had to be adjusted
    pub setup_warning: Option<String>,
    archive: Option<Archive>,
    think_delay: Duration,
}

impl AppCoordinator {
    /// Create a coordinator at the setup screen, seeded with `size` and `mode`
    pub fn new(size: usize, mode: Mode, think_delay: Duration, archive: Option<Archive>) -> Self {
        Self {
            screen: Screen::Setup {
                selected: 0,
                size_input: size.to_string(),
                mode,
            },
            should_quit: false,
            setup_warning: None,
            archive,
            think_delay,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn has_archive(&self) -> bool {
        self.archive.is_some()
    }

    /// Go back to setup, keeping the board size and mode just played
    pub fn go_to_setup(&mut self) {
        let (size_input, mode) = match &self.screen {
            Screen::Setup { .. } => return,
            Screen::Playing { app } => (app.state().grid().size().to_string(), app.state().mode()),
        };
        self.screen = Screen::Setup {
            selected: 0,
            size_input,
            mode,
        };
    }

    /// Currently highlighted setup option
    pub fn selected_option(&self) -> Option<SetupOption> {
        match &self.screen {
            Screen::Setup { selected, .. } => SetupOption::all().get(*selected).copied(),
            Screen::Playing { .. } => None,
        }
    }

    /// Handle setup navigation (up)
    pub fn setup_up(&mut self) {
        if let Screen::Setup { selected, .. } = &mut self.screen {
            *selected = selected.saturating_sub(1);
        }
    }

    /// Handle setup navigation (down)
    pub fn setup_down(&mut self) {
        if let Screen::Setup { selected, .. } = &mut self.screen {
            if *selected < SetupOption::all().len() - 1 {
                *selected += 1;
            }
        }
    }

    /// Typing into the board size field. Only digits are taken.
    pub fn setup_char(&mut self, c: char) {
        if self.selected_option() != Some(SetupOption::BoardSize) {
            return;
        }
        if let Screen::Setup { size_input, .. } = &mut self.screen {
            if c.is_ascii_digit() && size_input.len() < MAX_SIZE_INPUT {
                size_input.push(c);
            }
        }
    }

    /// Handle setup backspace (for size editing)
    pub fn setup_backspace(&mut self) {
        if self.selected_option() != Some(SetupOption::BoardSize) {
            return;
        }
        if let Screen::Setup { size_input, .. } = &mut self.screen {
            size_input.pop();
        }
    }

    /// Flip between player-vs-player and player-vs-computer
    pub fn toggle_mode(&mut self) {
        if let Screen::Setup { mode, .. } = &mut self.screen {
            *mode = mode.toggled();
        }
    }

    /// Handle setup selection (Enter)
    pub fn setup_select(&mut self) {
        match self.selected_option() {
            Some(SetupOption::BoardSize) | Some(SetupOption::Start) => self.start_game(),
            Some(SetupOption::Mode) => self.toggle_mode(),
            Some(SetupOption::Quit) => self.quit(),
            None => {}
        }
    }

    /// Start a game from the setup fields. An unusable size is replaced by
    /// the default and the warning is kept for both screens.
    pub fn start_game(&mut self) {
        let Screen::Setup { size_input, mode, .. } = &self.screen else {
            return;
        };
        let game = new_game_from_input(size_input, *mode);
        self.setup_warning = game.warning.as_ref().map(|w| w.to_string());
        let app = App::new(game, self.think_delay);
        self.screen = Screen::Playing { app };
    }

    /// Start over with the same configuration once the game is finished
    pub fn play_again(&mut self) {
        if let Screen::Playing { app } = &mut self.screen {
            if app.state().is_finished() {
                app.restart();
            }
        }
    }

    /// Send the finished game to the archive, once
    pub fn archive_game(&mut self) {
        let Screen::Playing { app } = &mut self.screen else {
            return;
        };
        if !app.state().is_finished() {
            return;
        }
        let Some(archive) = self.archive.as_mut() else {
            app.feedback = "Archive unavailable".to_string();
            return;
        };
        if let Err(e) = app.archive(archive) {
            warn!(error = %e, "archive failed");
            app.feedback = format!("Archive failed: {}", e);
        }
    }

    /// Advance the computer's deferred turn
    pub fn tick(&mut self, now: Instant) -> Option<MoveOutcome> {
        match &mut self.screen {
            Screen::Playing { app } => app.tick(now),
            Screen::Setup { .. } => None,
        }
    }

    /// Totals across the archive, if there is one and it can be read
    pub fn tally(&self) -> Option<ArchiveTally> {
        let archive = self.archive.as_ref()?;
        match archive.tally() {
            Ok(tally) => Some(tally),
            Err(e) => {
                warn!(error = %e, "could not read archive totals");
                None
            }
        }
    }

    /// Latest archived games, newest first
    pub fn recent_games(&self) -> Vec<(i64, GameRecord)> {
        let Some(archive) = self.archive.as_ref() else {
            return Vec::new();
        };
        archive.recent(RECENT_GAMES).unwrap_or_else(|e| {
            warn!(error = %e, "could not read recent games");
            Vec::new()
        })
    }
}
