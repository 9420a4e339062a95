use crate::metrics::projection::PerformancePanel;
use crate::metrics::score::ComponentScores;
use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
};

pub struct PerformanceView;

impl PerformanceView {
    pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        Self::render_scores(frame, chunks[0], view.scores.as_ref(), theme);
        Self::render_details(frame, chunks[1], view.performance.as_ref(), theme);
    }

    fn render_scores(frame: &mut Frame, area: Rect, scores: Option<&ComponentScores>, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Component Scores");

        let Some(scores) = scores else {
            let placeholder = Paragraph::new("Waiting for metrics...")
                .block(block)
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3); 4])
            .split(inner);

        for ((label, value), row) in ComponentScores::LABELS
            .iter()
            .zip(scores.as_array())
            .zip(rows.iter())
        {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(*label))
                .gauge_style(
                    Style::default()
                        .fg(theme.score(value))
                        .bg(theme.gauge_background()),
                )
                .label(format!("{:.1}", value))
                .ratio((value / 100.0).clamp(0.0, 1.0));
            frame.render_widget(gauge, *row);
        }
    }

    fn render_details(
        frame: &mut Frame,
        area: Rect,
        panel: Option<&PerformancePanel>,
        theme: &Theme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Component Details");

        let Some(p) = panel else {
            let placeholder = Paragraph::new("No performance data reported")
                .block(block)
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let entries = [
            ("Indexed storage", "Cache hit ratio", &p.index_hit_ratio),
            ("", "Indexes", &p.total_indexes),
            ("", "Avg lookup", &p.avg_lookup),
            ("Hash join", "Cache hits", &p.join_cache_hits),
            ("", "Cache misses", &p.join_cache_misses),
            ("", "Avg join", &p.avg_join),
            ("Evaluation cache", "Size", &p.eval_cache_size),
            ("", "Hit ratio", &p.eval_hit_ratio),
            ("", "Evictions", &p.eval_evictions),
            ("Token propagation", "Queue size", &p.queue_size),
            ("", "Parallel efficiency", &p.parallel_efficiency),
            ("", "Worker utilization", &p.worker_utilization),
        ];

        let rows: Vec<Row> = entries
            .iter()
            .map(|(component, metric, value)| {
                Row::new(vec![
                    Cell::from(*component).style(
                        Style::default()
                            .fg(theme.primary())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::from(*metric),
                    Cell::from(value.as_str()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(20),
                Constraint::Min(8),
            ],
        )
        .block(block)
        .style(Style::default().fg(theme.text()));

        frame.render_widget(table, area);
    }
}
