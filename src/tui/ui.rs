//! UI rendering using ratatui
//!
//! Screens:
//! - Setup: board size, mode, archive totals and recent games
//! - Playing: header, board, side panel; the side panel turns into the
//!   game-over summary once the game ends

use crate::app::{App, AppCoordinator, Screen, SetupOption};
use crate::game::{GameRecord, Mode, Phase, PlayerId};
use crate::storage::ArchiveTally;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Terminal columns per board cell
const CELL_WIDTH: u16 = 3;
/// Width of the panel beside the board
const SIDE_PANEL_WIDTH: u16 = 34;

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Setup {
            selected,
            size_input,
            mode,
        } => {
            let setup = SetupView {
                selected: *selected,
                size_input,
                mode: *mode,
                warning: coordinator.setup_warning.as_deref(),
                tally: coordinator.tally(),
                has_archive: coordinator.has_archive(),
                recent: coordinator.recent_games(),
            };
            render_setup(frame, &setup);
        }
        Screen::Playing { app } => render_game(frame, app),
    }
}

struct SetupView<'a> {
    selected: usize,
    size_input: &'a str,
    mode: Mode,
    warning: Option<&'a str>,
    tally: Option<ArchiveTally>,
    has_archive: bool,
    recent: Vec<(i64, GameRecord)>,
}

/// Render the setup screen
fn render_setup(frame: &mut Frame, setup: &SetupView) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(1), // Warning
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Options
            Constraint::Length(1), // Archive totals
            Constraint::Length(7), // Recent games
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
  ____   ___   ____
 / ___| / _ \ / ___|
 \___ \| | | |\___ \
  ___) | |_| | ___) |
 |____/ \___/ |____/
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    if let Some(warning) = setup.warning {
        let warning = Paragraph::new(warning)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(warning, layout[1]);
    }

    let items: Vec<ListItem> = SetupOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let is_selected = i == setup.selected;
            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if is_selected { "> " } else { "  " };
            let text = match opt {
                SetupOption::BoardSize if is_selected => {
                    format!("{}{}: [{}]_", prefix, opt.label(), setup.size_input)
                }
                SetupOption::BoardSize => format!("{}{}: {}", prefix, opt.label(), setup.size_input),
                SetupOption::Mode => format!("{}{}: {}", prefix, opt.label(), setup.mode.label()),
                SetupOption::Start | SetupOption::Quit => format!("{}{}", prefix, opt.label()),
            };
            ListItem::new(text).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(Block::default()), layout[3]);

    let totals = Paragraph::new(format_tally(setup.tally, setup.has_archive))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(totals, layout[4]);

    if !setup.recent.is_empty() {
        let items: Vec<ListItem> = setup
            .recent
            .iter()
            .map(|(id, record)| ListItem::new(format_recent(*id, record)))
            .collect();
        let recent = List::new(items)
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Recent Games"),
            );
        frame.render_widget(recent, layout[5]);
    }

    let footer = Paragraph::new("↑↓ Navigate  0-9 Size  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[6]);
}

/// Split the game screen into header, board area and side panel
fn game_layout(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[1]);
    (rows[0], columns[0], columns[1])
}

/// Where the bordered board of `size` cells sits on a screen of `area`
pub fn board_rect(area: Rect, size: usize) -> Rect {
    let (_, board_area, _) = game_layout(area);
    let size = size as u16;
    let width = (size * CELL_WIDTH + 2).min(board_area.width);
    let height = (size + 2).min(board_area.height);
    Rect {
        x: board_area.x + (board_area.width - width) / 2,
        y: board_area.y + (board_area.height - height) / 2,
        width,
        height,
    }
}

/// Map a terminal position to the board cell under it, if any
pub fn cell_at(area: Rect, size: usize, column: u16, row: u16) -> Option<(usize, usize)> {
    let board = board_rect(area, size);
    let x = column.checked_sub(board.x + 1)?;
    let y = row.checked_sub(board.y + 1)?;
    let (r, c) = (y as usize, (x / CELL_WIDTH) as usize);
    if r < size && c < size && x < board.width.saturating_sub(2) && y < board.height.saturating_sub(2) {
        Some((r, c))
    } else {
        None
    }
}

/// Render the game screen
fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (header, _, side) = game_layout(area);

    render_header(frame, header, app);
    render_board(frame, board_rect(area, app.state().grid().size()), app);

    if app.state().is_finished() {
        render_game_over(frame, side, app);
    } else {
        render_side_panel(frame, side, app);
    }
}

/// Render the header: title, scores, turn indicator
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(6),  // Title
            Constraint::Min(20),    // Scores
            Constraint::Length(26), // Turn
        ])
        .split(inner);

    let logo = Paragraph::new("SOS")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let scores = Paragraph::new(app.score_line())
        .style(Style::default().fg(Color::White).bold())
        .alignment(Alignment::Center);
    frame.render_widget(scores, header_layout[1]);

    let turn_color = if app.is_thinking() {
        Color::Yellow
    } else {
        owner_color(app.snapshot().current_player)
    };
    let turn = Paragraph::new(app.turn_label())
        .style(Style::default().fg(turn_color))
        .alignment(Alignment::Right);
    frame.render_widget(turn, header_layout[2]);
}

/// Render the grid, one span per cell
fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.snapshot();
    let grid = snapshot.grid;
    let size = grid.size();
    let show_cursor = snapshot.phase == Phase::InProgress;

    let lines: Vec<Line> = (0..size)
        .map(|row| {
            let spans: Vec<Span> = (0..size)
                .map(|col| {
                    let placed = grid.get(row, col).ok().flatten();
                    let (text, mut style) = match placed {
                        Some(p) => (
                            format!(" {} ", p.letter),
                            Style::default().fg(owner_color(p.owner)).bold(),
                        ),
                        None => (" · ".to_string(), Style::default().fg(Color::DarkGray)),
                    };
                    if show_cursor && app.cursor == (row, col) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let board = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(board, area);
}

/// Selected letter, feedback and key help
fn render_side_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Mode
            Constraint::Length(1), // Selected letter
            Constraint::Length(1), // Cursor cell
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Warning
            Constraint::Min(0),    // Help
        ])
        .split(inner);

    let snapshot = app.snapshot();
    let mode = Paragraph::new(snapshot.mode.label()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(mode, layout[0]);

    let letter = Paragraph::new(format!("Letter: {}", app.selected_letter))
        .style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(letter, layout[1]);

    let (row, col) = app.cursor;
    let (cell_text, cell_color) = if snapshot.grid.is_empty_at(row, col) {
        (format!("Cell {},{}", row + 1, col + 1), Color::DarkGray)
    } else {
        (format!("Cell {},{} taken", row + 1, col + 1), Color::Red)
    };
    frame.render_widget(
        Paragraph::new(cell_text).style(Style::default().fg(cell_color)),
        layout[2],
    );

    let (feedback_text, feedback_color) = format_feedback(&app.feedback);
    frame.render_widget(
        Paragraph::new(feedback_text).style(Style::default().fg(feedback_color)),
        layout[3],
    );

    if let Some(warning) = &app.warning {
        frame.render_widget(
            Paragraph::new(warning.as_str()).style(Style::default().fg(Color::Yellow)),
            layout[4],
        );
    }

    let help = Paragraph::new("Arrows/click  Move\ns / o        Letter\nEnter        Place\nEsc          Setup")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, layout[5]);
}

/// Render the end-of-game summary
fn render_game_over(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Headline
            Constraint::Length(1), // Final score
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Archive receipt / feedback
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Instructions
        ])
        .split(inner);

    let headline = app.headline().unwrap_or_default();
    let title = Paragraph::new(headline)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let score = Paragraph::new(app.score_line())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(score, layout[1]);

    let (receipt_text, receipt_color) = match app.receipt() {
        Some(receipt) => (format!("Archived as game #{}", receipt.id), Color::Green),
        None => format_feedback(&app.feedback),
    };
    frame.render_widget(
        Paragraph::new(receipt_text)
            .style(Style::default().fg(receipt_color))
            .alignment(Alignment::Center),
        layout[3],
    );

    let archive_hint = if app.receipt().is_some() {
        ""
    } else {
        "a  Archive\n"
    };
    let instructions = Paragraph::new(format!("{}n  Play again\nEsc  Setup", archive_hint))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, layout[5]);
}

fn owner_color(player: PlayerId) -> Color {
    match player {
        PlayerId::PlayerOne => Color::Cyan,
        PlayerId::PlayerTwo => Color::Magenta,
    }
}

/// Archive totals line for the setup screen
fn format_tally(tally: Option<ArchiveTally>, has_archive: bool) -> String {
    match tally {
        Some(t) => format!(
            "Archived: {} games  P1 {}  P2 {}  Draws {}",
            t.games, t.player_one_wins, t.player_two_wins, t.draws
        ),
        None if has_archive => "Archive unreadable".to_string(),
        None => "Archive unavailable".to_string(),
    }
}

/// One line of the recent games list
fn format_recent(id: i64, record: &GameRecord) -> String {
    format!(
        "#{:<4} {:<18} {}-{}  {}x{} {}",
        id,
        record.winner_text,
        record.scores.player_one,
        record.scores.player_two,
        record.board_size,
        record.board_size,
        record.timestamp.format("%Y-%m-%d %H:%M"),
    )
}

/// Format feedback with appropriate color
fn format_feedback(feedback: &str) -> (String, Color) {
    if feedback.is_empty() {
        return (String::new(), Color::White);
    }

    let color = if feedback.starts_with("SOS!") || feedback.starts_with("Archived") {
        Color::Green
    } else if feedback.starts_with("Cell already taken") || feedback.starts_with("Archive failed") {
        Color::Red
    } else if feedback.starts_with("Not your turn")
        || feedback.starts_with("Game is over")
        || feedback.starts_with("Archive unavailable")
    {
        Color::Yellow
    } else {
        Color::White
    };

    (feedback.to_string(), color)
}
