use crate::metrics::projection::{CacheRatio, KpiPanel};
use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use crate::tui::widgets::series_chart::SeriesChart;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

pub struct OverviewView;

impl OverviewView {
    pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        Self::render_kpis(frame, chunks[0], chunks[1], view.kpi.as_ref(), theme);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[2]);

        SeriesChart::render(
            frame,
            lower[0],
            "Throughput",
            view.throughput.as_ref(),
            theme,
        );
        Self::render_cache_gauge(frame, lower[1], view.cache_ratio, theme);
    }

    fn render_kpis(
        frame: &mut Frame,
        top: Rect,
        bottom: Rect,
        kpi: Option<&KpiPanel>,
        theme: &Theme,
    ) {
        let kpi = kpi.cloned().unwrap_or_else(|| KpiPanel {
            facts_per_second: "-".to_string(),
            tokens_per_second: "-".to_string(),
            rules_per_second: "-".to_string(),
            average_latency: "-".to_string(),
            total_nodes: "-".to_string(),
            active_nodes: "-".to_string(),
            total_facts: "-".to_string(),
            error_rate: "-".to_string(),
        });

        let first_row = [
            ("Facts/sec", kpi.facts_per_second),
            ("Tokens/sec", kpi.tokens_per_second),
            ("Rules/sec", kpi.rules_per_second),
            ("Avg Latency", kpi.average_latency),
        ];
        let second_row = [
            ("Total Nodes", kpi.total_nodes),
            ("Active Nodes", kpi.active_nodes),
            ("Total Facts", kpi.total_facts),
            ("Error Rate", kpi.error_rate),
        ];

        for (area, row) in [(top, first_row), (bottom, second_row)] {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(25); 4])
                .split(area);

            for (cell, (title, text)) in cells.iter().zip(row) {
                let widget = Paragraph::new(text)
                    .style(
                        Style::default()
                            .fg(theme.primary())
                            .add_modifier(Modifier::BOLD),
                    )
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(theme.border()))
                            .title(title),
                    );
                frame.render_widget(widget, *cell);
            }
        }
    }

    fn render_cache_gauge(frame: &mut Frame, area: Rect, ratio: Option<CacheRatio>, theme: &Theme) {
        let block = Block::default().borders(Borders::ALL).title("Cache Hit Ratio");

        let Some(ratio) = ratio else {
            let placeholder = Paragraph::new("Waiting for metrics...")
                .block(block)
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(
                Style::default()
                    .fg(theme.score(ratio.hit))
                    .bg(theme.gauge_background()),
            )
            .label(format!("hit {:.1}% / miss {:.1}%", ratio.hit, ratio.miss))
            .ratio((ratio.hit / 100.0).clamp(0.0, 1.0));

        frame.render_widget(gauge, area);
    }
}
