//! Ratatui-based terminal UI.
//!
//! The TUI hosts the rendered [`Scene`]: it draws the marks with Plotters, walks
//! a pointer across them with the arrow keys, and forwards enter/leave events to
//! the scene so the chart's own hover handlers drive the tooltip.
//!
//! [`Scene`]: crate::render::Scene

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use tracing::warn;

use crate::app::pipeline::{self, ChartRun};
use crate::domain::{ChartConfig, GdpDataset};
use crate::error::AppError;
use crate::render::{MarkGeometry, PointerEvent};

mod plotters_chart;

use plotters_chart::GdpPlottersChart;

/// Where `s` writes the current chart.
const SNAPSHOT_PATH: &str = "gdp-chart.svg";

/// Start the TUI.
pub fn run(config: ChartConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(2, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(2, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(2, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: ChartConfig,
    dataset: Option<GdpDataset>,
    run: Option<ChartRun>,
    /// Mark currently under the pointer.
    cursor: Option<usize>,
    status: String,
}

impl App {
    fn new(config: ChartConfig) -> Self {
        let mut app = Self {
            config,
            dataset: None,
            run: None,
            cursor: None,
            status: String::new(),
        };
        app.reload();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(2, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(2, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(2, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => {
                let next = match self.cursor {
                    Some(i) => i.saturating_sub(1),
                    None => self.mark_count().saturating_sub(1),
                };
                self.point_at(next);
            }
            KeyCode::Right => {
                let next = match self.cursor {
                    Some(i) => (i + 1).min(self.mark_count().saturating_sub(1)),
                    None => 0,
                };
                self.point_at(next);
            }
            KeyCode::Home => self.point_at(0),
            KeyCode::End => self.point_at(self.mark_count().saturating_sub(1)),
            KeyCode::Esc => {
                self.leave();
                self.status = "Pointer left the chart.".to_string();
            }
            KeyCode::Char('v') => {
                self.config.layout.variant = self.config.layout.variant.toggle();
                let cursor = self.cursor;
                self.rerender();
                if let Some(i) = cursor {
                    self.point_at(i);
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('s') => self.save_snapshot(),
            _ => {}
        }
        false
    }

    fn mark_count(&self) -> usize {
        self.run.as_ref().map(|r| r.chart.marks.len()).unwrap_or(0)
    }

    /// Move the pointer onto mark `index`, leaving the previous one first.
    fn point_at(&mut self, index: usize) {
        if index >= self.mark_count() {
            return;
        }
        if self.cursor == Some(index) {
            return;
        }
        self.leave();

        let Some(run) = self.run.as_mut() else {
            return;
        };
        let mark = run.chart.marks[index];
        let (x, y) = mark_center(run, index);
        run.scene.dispatch(mark, &PointerEvent::enter(x, y));
        self.cursor = Some(index);
    }

    /// Send a leave event to the mark under the pointer, if any.
    fn leave(&mut self) {
        let Some(index) = self.cursor.take() else {
            return;
        };
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if let Some(&mark) = run.chart.marks.get(index) {
            let (x, y) = mark_center(run, index);
            run.scene.dispatch(mark, &PointerEvent::leave(x, y));
        }
    }

    /// Text of the tooltip element while it is shown.
    fn tooltip_text(&self) -> Option<&str> {
        let run = self.run.as_ref()?;
        if !run.scene.is_visible(run.chart.tooltip) {
            return None;
        }
        run.scene.text(run.chart.tooltip)
    }

    /// Fetch the dataset again and redraw from scratch.
    fn reload(&mut self) {
        self.cursor = None;
        self.run = None;
        match pipeline::load_dataset(&self.config.source) {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.rerender();
            }
            Err(err) => {
                self.dataset = None;
                self.status = format!("Load failed: {err}");
            }
        }
    }

    /// Re-run transform + render on the loaded dataset with the current layout.
    fn rerender(&mut self) {
        self.cursor = None;
        let Some(dataset) = &self.dataset else {
            self.status = "No dataset loaded (r to retry).".to_string();
            return;
        };
        match pipeline::run_chart_with_dataset(&self.config.layout, dataset.clone()) {
            Ok(run) => {
                self.status = format!(
                    "{} records | {}",
                    run.records.len(),
                    run.layout.variant.display_name()
                );
                self.run = Some(run);
            }
            Err(err) => {
                warn!(error = %err, "render failed");
                self.run = None;
                self.status = format!("Render failed: {err}");
            }
        }
    }

    fn save_snapshot(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing to save.".to_string();
            return;
        };
        let path = PathBuf::from(SNAPSHOT_PATH);
        self.status = match crate::io::export::write_svg(&path, &run.scene, &run.chart) {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(4)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("gdp", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.config.layout.title)),
        ]));

        let detail = match &self.run {
            Some(run) => {
                let stats = crate::report::series_stats(&run.records);
                let range = match (stats.first_date, stats.last_date) {
                    (Some(a), Some(b)) => format!("{a} .. {b}"),
                    _ => "-".to_string(),
                };
                format!(
                    "n={} | dates: {range} | variant: {}",
                    stats.n_records,
                    run.layout.variant.display_name()
                )
            }
            None => "no chart".to_string(),
        };
        lines.push(Line::from(Span::styled(detail, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.config.layout.title.as_str())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data (r to reload, q to quit).")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let marks = mark_geometries(run);
        let widget = GdpPlottersChart {
            marks: &marks,
            hovered: self.cursor,
            layout: &run.layout,
            x_scale: &run.chart.x_scale,
            y_scale: &run.chart.y_scale,
        };
        frame.render_widget(widget, inner);

        if let Some(note) = &run.layout.footnote {
            let y = inner.y + inner.height.saturating_sub(1);
            let rect = Rect { x: inner.x + 1, y, width: inner.width.saturating_sub(2), height: 1 };
            frame.render_widget(
                Paragraph::new(note.as_str()).style(Style::default().fg(Color::DarkGray)),
                rect,
            );
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ move  Home/End jump  Esc leave  v variant  r reload  s save  q quit";

        let tooltip = match self.tooltip_text() {
            Some(text) => Line::from(Span::styled(
                text.replace('\n', "  "),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(&self.status, Style::default().fg(Color::Yellow))),
        };

        let lines = vec![
            tooltip,
            Line::from(Span::styled(help, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn mark_geometries(run: &ChartRun) -> Vec<MarkGeometry> {
    run.chart
        .marks
        .iter()
        .map(|&m| {
            MarkGeometry::from_scene(&run.scene, m).unwrap_or(MarkGeometry {
                x: f64::NAN,
                y: f64::NAN,
                width: f64::NAN,
                height: f64::NAN,
            })
        })
        .collect()
}

/// Pointer position over a mark, in surface pixels.
fn mark_center(run: &ChartRun, index: usize) -> (f64, f64) {
    run.chart
        .marks
        .get(index)
        .and_then(|&m| MarkGeometry::from_scene(&run.scene, m))
        .map(|g| g.center())
        .unwrap_or((f64::NAN, f64::NAN))
}
