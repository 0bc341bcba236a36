//! Full-screen terminal renderer for the seismograph CLI.
//!
//! Frames are drawn with a ratatui [`Canvas`] inside a bordered block, with the
//! magnitude readout on the line below. The canvas uses the frame's logical
//! geometry as its bounds, so traces scale to whatever size the terminal has.
//! Repaints are throttled so a fast sensor does not flood the terminal.

use super::RenderSurface;
use crate::core::Channel;
use crate::data::TraceFrame;
use crate::error::AppResult;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::warn;

/// Draws frames on any ratatui backend (stdout via crossterm by default).
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    frame: Option<TraceFrame>,
    status: String,
    min_repaint: Duration,
    last_repaint: Option<Instant>,
    repaints: u64,
    write_failed: bool,
}

impl<B: Backend> std::fmt::Debug for TerminalRenderer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("status", &self.status)
            .field("min_repaint", &self.min_repaint)
            .field("repaints", &self.repaints)
            .finish()
    }
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    /// Take over stdout: switch to the alternate screen, clear it, and hide
    /// the cursor. Pair with [`restore`](Self::restore).
    pub fn stdout() -> AppResult<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), Hide)?;
        Self::with_backend(CrosstermBackend::new(stdout))
    }

    /// Give the terminal back to the shell.
    pub fn restore(&mut self) -> AppResult<()> {
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        Ok(())
    }
}

impl<B: Backend> TerminalRenderer<B> {
    /// Renderer on an arbitrary backend.
    pub fn with_backend(backend: B) -> AppResult<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            frame: None,
            status: String::new(),
            min_repaint: Duration::from_millis(50),
            last_repaint: None,
            repaints: 0,
            write_failed: false,
        })
    }

    /// Minimum time between two repaints.
    pub fn with_min_repaint(mut self, min_repaint: Duration) -> Self {
        self.min_repaint = min_repaint;
        self
    }

    /// Last status text received.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Number of repaints actually written to the backend.
    pub fn repaints(&self) -> u64 {
        self.repaints
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn repaint(&mut self, force: bool) {
        if self.write_failed {
            return;
        }
        let now = Instant::now();
        if !force {
            if let Some(last) = self.last_repaint {
                if now.duration_since(last) < self.min_repaint {
                    return;
                }
            }
        }
        self.last_repaint = Some(now);

        let frame = self.frame.as_ref();
        let status = self.status.as_str();
        match self.terminal.draw(|f| draw_seismograph(f, frame, status)) {
            Ok(_) => self.repaints += 1,
            Err(e) => {
                warn!(error = %e, "Terminal output failed; further repaints disabled");
                self.write_failed = true;
            }
        }
    }
}

fn channel_color(channel: Channel) -> Color {
    match channel {
        Channel::Magnitude => Color::Yellow,
        Channel::AxisX => Color::Red,
        Channel::AxisY => Color::Green,
        Channel::AxisZ => Color::Cyan,
    }
}

fn draw_seismograph(f: &mut Frame, trace_frame: Option<&TraceFrame>, status: &str) {
    let [plot_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

    let (width, height) = trace_frame
        .map(|t| (t.geometry.width, t.geometry.height))
        .unwrap_or((1.0, 1.0));

    // Canvas y grows upward, frame y grows downward.
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" rust_seismo "))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            let Some(t) = trace_frame else {
                return;
            };
            let baseline = height - t.baseline_y;
            ctx.draw(&Line::new(0.0, baseline, width, baseline, Color::DarkGray));
            for trace in &t.traces {
                let color = channel_color(trace.channel);
                for pair in trace.points.windows(2) {
                    ctx.draw(&Line::new(
                        pair[0].x,
                        height - pair[0].y,
                        pair[1].x,
                        height - pair[1].y,
                        color,
                    ));
                }
            }
        });

    f.render_widget(canvas, plot_area);
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::White)),
        status_area,
    );
}

impl<B: Backend + Send> RenderSurface for TerminalRenderer<B> {
    fn draw(&mut self, frame: &TraceFrame) {
        self.frame = Some(frame.clone());
        self.repaint(false);
    }

    fn show_status(&mut self, text: &str) {
        self.status.clear();
        self.status.push_str(text);
    }

    fn flush(&mut self) {
        self.repaint(true);
    }
}
