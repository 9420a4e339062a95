use crate::metrics::projection::TimeSeries;
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

/// Line chart over a time series; x is the sample index, labels are the
/// oldest and newest capture times.
pub struct SeriesChart;

impl SeriesChart {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        series: Option<&TimeSeries>,
        theme: &Theme,
    ) {
        let Some(series) = series.filter(|s| !s.is_empty()) else {
            let placeholder = Paragraph::new("Waiting for metrics...")
                .block(Block::default().borders(Borders::ALL).title(title))
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let points: Vec<Vec<(f64, f64)>> = series
            .series
            .iter()
            .map(|s| {
                s.points
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .collect();

        let colors = theme.chart_lines();
        let datasets: Vec<Dataset> = series
            .series
            .iter()
            .zip(points.iter())
            .enumerate()
            .map(|(i, (named, data))| {
                Dataset::default()
                    .name(named.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(colors[i % colors.len()]))
                    .data(data)
            })
            .collect();

        let max_x = (series.len().saturating_sub(1)).max(1) as f64;
        let max_y = (series.max() * 1.1).max(1.0);

        let first = series.labels.first().cloned().unwrap_or_default();
        let last = series.labels.last().cloned().unwrap_or_default();

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(title))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds([0.0, max_x])
                    .labels(vec![Span::raw(first), Span::raw(last)]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds([0.0, max_y])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", max_y / 2.0)),
                        Span::raw(format!("{:.0}", max_y)),
                    ]),
            );

        frame.render_widget(chart, area);
    }
}
