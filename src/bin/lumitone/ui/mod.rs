//! Progress screen shown while a conversion runs on the worker thread

mod status;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use lumitone::{Progress, StopSignal};

pub use status::RunInfo;

use status::{render_gauge, render_status};

pub struct UiApp {
    /// Snapshots pushed by the conversion loop
    progress_rx: Consumer<Progress>,
    stop: StopSignal,
    info: RunInfo,
    current: Progress,
}

impl UiApp {
    pub fn new(progress_rx: Consumer<Progress>, stop: StopSignal, info: RunInfo) -> Self {
        Self {
            progress_rx,
            stop,
            info,
            current: Progress::default(),
        }
    }

    /// Draw until the worker sends its final snapshot or exits without one
    pub fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        worker_done: impl Fn() -> bool,
    ) -> EyreResult<()> {
        while !self.current.finished && !worker_done() {
            self.poll_progress();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps, keys stay responsive
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_progress(&mut self) {
        // keep only the latest
        while let Ok(progress) = self.progress_rx.pop() {
            self.current = progress;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                // the worker flushes and sends a final snapshot, which ends the loop
                self.stop.stop();
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // status
                Constraint::Length(3), // gauge
                Constraint::Min(0),
                Constraint::Length(1), // help
            ])
            .split(frame.area());

        render_status(frame, chunks[0], &self.info, &self.current);
        render_gauge(frame, chunks[1], &self.current);

        let help = if self.stop.is_stopped() {
            " stopping..."
        } else {
            " [Q] Stop and save"
        };
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }
}
