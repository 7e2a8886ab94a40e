//! Transport-style status bar: octave range, tempo, meter, click settings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let sep = Span::styled("  |  ", Style::default().fg(Color::DarkGray));

    let metronome = if app.metronome_on {
        Span::styled(
            "click on",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("click off", Style::default().fg(Color::DarkGray))
    };

    let accent = if app.accent {
        Span::raw("accent on")
    } else {
        Span::styled("accent off", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::styled(
            format!("Octave {}-{}", app.base_octave, app.base_octave + 2),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::raw(format!("{} BPM", app.bpm)),
        sep.clone(),
        Span::raw(format!("{}/4", app.beats_per_bar)),
        sep.clone(),
        accent,
        sep.clone(),
        Span::raw(format!("click vol {}%", app.click_volume_pct)),
        sep,
        metronome,
    ]);

    let status = Paragraph::new(line)
        .block(Block::default().title(" clavier ").borders(Borders::ALL));
    frame.render_widget(status, area);
}
