//! The keyboard view: two octaves plus the top C, sounding keys lit.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use clavier::pitch::Note;

use crate::app::App;

const WHITE_ORDER: [Note; 7] = [
    Note::C,
    Note::D,
    Note::E,
    Note::F,
    Note::G,
    Note::A,
    Note::B,
];

/// Whites that have a black key on their right edge (C-C#, D-D#, F-F#,
/// G-G#, A-A#).
fn black_after(note: Note) -> Option<Note> {
    match note {
        Note::C => Some(Note::Cs),
        Note::D => Some(Note::Ds),
        Note::F => Some(Note::Fs),
        Note::G => Some(Note::Gs),
        Note::A => Some(Note::As),
        _ => None,
    }
}

fn white_style(active: bool) -> Style {
    if active {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::White).fg(Color::Black)
    }
}

fn black_style(active: bool) -> Style {
    if active {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Black).fg(Color::White)
    }
}

pub fn render_keyboard(frame: &mut Frame, area: Rect, app: &App) {
    let held = app.held_pitches();
    let is_active = |note: Note, band: i32| held.contains(&(note, app.base_octave + band));

    // The visible keys: two full octave bands plus the top C.
    let whites: Vec<(Note, i32)> = (0..2)
        .flat_map(|band| WHITE_ORDER.iter().map(move |&n| (n, band)))
        .chain(std::iter::once((Note::C, 2)))
        .collect();

    // Black key rows. Each white key is 4 columns; a black key sits on the
    // right edge of its white, so each cell is 2 blanks then a 2-wide key.
    let mut black_labels: Vec<Span> = Vec::new();
    let mut black_blocks: Vec<Span> = Vec::new();
    for &(note, band) in &whites[..whites.len() - 1] {
        match black_after(note) {
            Some(black) => {
                let style = black_style(is_active(black, band));
                black_labels.push(Span::raw("  "));
                black_labels.push(Span::styled(black.name().to_string(), style));
                black_blocks.push(Span::raw("  "));
                black_blocks.push(Span::styled("  ", style));
            }
            None => {
                black_labels.push(Span::raw("    "));
                black_blocks.push(Span::raw("    "));
            }
        }
    }

    // White key rows: two block lines and a label line.
    let mut white_blocks: Vec<Span> = Vec::new();
    let mut white_labels: Vec<Span> = Vec::new();
    for &(note, band) in &whites {
        let style = white_style(is_active(note, band));
        white_blocks.push(Span::styled("   ", style));
        white_blocks.push(Span::raw(" "));
        let label = format!("{}{}", note.name(), app.base_octave + band);
        white_labels.push(Span::styled(format!("{label:<3}"), style));
        white_labels.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(black_labels),
        Line::from(black_blocks),
        Line::from(white_blocks.clone()),
        Line::from(white_blocks),
        Line::from(white_labels),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}
