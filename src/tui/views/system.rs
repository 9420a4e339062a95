use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use crate::tui::widgets::series_chart::SeriesChart;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

pub struct SystemView;

impl SystemView {
    pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        Self::render_memory_gauge(frame, chunks[0], view, theme);
        Self::render_summary(frame, chunks[1], view, theme);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        SeriesChart::render(frame, charts[0], "Memory (MiB)", view.memory.as_ref(), theme);
        SeriesChart::render(frame, charts[1], "Workers", view.workers.as_ref(), theme);
    }

    fn render_memory_gauge(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let Some(system) = &view.system else {
            let placeholder = Paragraph::new("No system metrics yet")
                .block(Block::default().borders(Borders::ALL).title("Memory"))
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let percent = system.memory_percent.min(100);
        let color = if percent > 90 {
            theme.memory_critical()
        } else if percent > 70 {
            theme.memory_high()
        } else {
            theme.memory_normal()
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Memory"))
            .gauge_style(Style::default().fg(color).bg(theme.gauge_background()))
            .label(format!("{} ({}%)", system.memory_text, system.memory_percent))
            .percent(percent as u16);

        frame.render_widget(gauge, area);
    }

    fn render_summary(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let text = match &view.system {
            Some(system) => format!(
                "Workers:   {}\nGC cycles: {}\nUptime:    {}",
                system.workers, system.gc_cycles, system.uptime
            ),
            None => "Workers:   -\nGC cycles: -\nUptime:    -".to_string(),
        };

        let summary = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Runtime"))
            .style(Style::default().fg(theme.text()));

        frame.render_widget(summary, area);
    }
}
