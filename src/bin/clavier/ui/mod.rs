//! TUI rendering: status bar, keyboard view, help line.

mod keyboard;
mod status;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

use keyboard::render_keyboard;
use status::render_status;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Length(7), // Keyboard
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], app);

    let keyboard_block = Block::default().title(" Keyboard ").borders(Borders::ALL);
    let keyboard_inner = keyboard_block.inner(chunks[1]);
    frame.render_widget(keyboard_block, chunks[1]);
    render_keyboard(frame, keyboard_inner, app);

    let help = Paragraph::new(
        " [A..J K..\\ Space] play  [Z/X] octave  [M] metronome  [Up/Down] tempo  \
         [,/.] click vol  [B] meter  [N] accent  [Q] quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
