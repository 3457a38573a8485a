//! Status line and progress gauge

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use lumitone::Progress;

/// Fixed facts about the run, shown in the title bar
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub input: String,
    pub fps: f64,
    pub lowest_note: u8,
    pub highest_note: u8,
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// `60` -> `C4`
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

pub fn render_status(frame: &mut Frame, area: Rect, info: &RunInfo, progress: &Progress) {
    let block = Block::default()
        .title(format!(" lumitone: {} ", info.input))
        .borders(Borders::ALL);

    let note = match progress.note {
        Some(note) => format!("{} ({note})", note_name(note)),
        None => "-".to_string(),
    };
    let seconds = progress.frame as f64 / info.fps;

    let line = Line::from(vec![
        Span::styled(format!(" Note: {note:<10}"), Style::default().fg(Color::Green)),
        Span::styled(
            format!("Events: {:<8}", progress.events),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{seconds:.1}s  "), Style::default().fg(Color::White)),
        Span::styled(
            format!(
                "{:.2}fps  {}-{}",
                info.fps,
                note_name(info.lowest_note),
                note_name(info.highest_note)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

pub fn render_gauge(frame: &mut Frame, area: Rect, progress: &Progress) {
    let block = Block::default().title(" Frames ").borders(Borders::ALL);
    let gauge = match progress.total {
        Some(total) if total > 0 => {
            let ratio = (progress.frame as f64 / total as f64).clamp(0.0, 1.0);
            Gauge::default()
                .ratio(ratio)
                .label(format!("{}/{}", progress.frame, total))
        }
        // unknown length, e.g. a pipe
        _ => Gauge::default().ratio(0.0).label(format!("{}", progress.frame)),
    };

    frame.render_widget(
        gauge.block(block).gauge_style(Style::default().fg(Color::Magenta)),
        area,
    );
}
