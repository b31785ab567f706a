//! SOS - the pencil-and-paper letter game in a terminal
//!
//! Write S or O. Complete S-O-S. Keep the turn.

mod app;
mod cli;
mod game;
mod storage;
mod tui;

use anyhow::{Context, Result};
use app::{App, AppCoordinator, Direction, Screen, SetupOption};
use clap::Parser;
use cli::Cli;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use game::Letter;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::Archive;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::Tui;

/// How often the loop wakes up to drive the computer's turn
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    let archive = match Archive::open(cli.db.as_deref()) {
        Ok(archive) => Some(archive),
        Err(e) => {
            warn!(error = %e, "archive unavailable, continuing without it");
            None
        }
    };

    let mut coordinator =
        AppCoordinator::new(cli.size, cli.mode.into(), cli.think_delay(), archive);
    info!(size = cli.size, mode = ?cli.mode, "starting");

    let mut terminal = Tui::new().context("opening terminal")?;
    terminal.enter().context("entering raw mode")?;

    while !coordinator.should_quit {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut coordinator, key);
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut coordinator, &terminal, mouse)?;
                }
                _ => {}
            }
        }

        coordinator.tick(Instant::now());
    }

    info!("bye");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

fn handle_key(coordinator: &mut AppCoordinator, key: KeyEvent) {
    if matches!(coordinator.screen, Screen::Setup { .. }) {
        handle_setup_key(coordinator, key.code);
        return;
    }
    match key.code {
        KeyCode::Esc => coordinator.go_to_setup(),
        KeyCode::Char('a') => coordinator.archive_game(),
        KeyCode::Char('n') => coordinator.play_again(),
        code => {
            if let Screen::Playing { app } = &mut coordinator.screen {
                handle_board_key(app, code);
            }
        }
    }
}

fn handle_setup_key(coordinator: &mut AppCoordinator, code: KeyCode) {
    match code {
        KeyCode::Esc => coordinator.quit(),
        KeyCode::Up => coordinator.setup_up(),
        KeyCode::Down => coordinator.setup_down(),
        KeyCode::Left | KeyCode::Right => {
            if coordinator.selected_option() == Some(SetupOption::Mode) {
                coordinator.toggle_mode();
            }
        }
        KeyCode::Enter => coordinator.setup_select(),
        KeyCode::Backspace => coordinator.setup_backspace(),
        KeyCode::Char(c) => coordinator.setup_char(c),
        _ => {}
    }
}

fn handle_board_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.move_cursor(Direction::Up),
        KeyCode::Down => app.move_cursor(Direction::Down),
        KeyCode::Left => app.move_cursor(Direction::Left),
        KeyCode::Right => app.move_cursor(Direction::Right),
        KeyCode::Tab => app.toggle_letter(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.select_letter(Letter::S),
        KeyCode::Char('o') | KeyCode::Char('O') => app.select_letter(Letter::O),
        KeyCode::Enter | KeyCode::Char(' ') => {
            // Rejections are already reported through the feedback line
            let _ = app.place_at_cursor(Instant::now());
        }
        _ => {}
    }
}

fn handle_mouse(coordinator: &mut AppCoordinator, terminal: &Tui, mouse: MouseEvent) -> Result<()> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Ok(());
    }
    let Screen::Playing { app } = &mut coordinator.screen else {
        return Ok(());
    };
    let size = app.state().grid().size();
    if let Some((row, col)) = tui::cell_at(terminal.area()?, size, mouse.column, mouse.row) {
        let _ = app.handle_cell_intent(row, col, Instant::now());
    }
    Ok(())
}
