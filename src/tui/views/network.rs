use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub struct NetworkView;

impl NetworkView {
    pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, scroll: usize, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        Self::render_status(frame, chunks[0], view, theme);
        Self::render_nodes(frame, chunks[1], view, scroll, theme);
    }

    fn render_status(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let text = match &view.network_status {
            Some(status) => format!(
                "Status:  {}\nUptime:  {}\nVersion: {}",
                status.status, status.uptime, status.version
            ),
            None => "Loading network status...".to_string(),
        };

        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Network Status"))
            .style(Style::default().fg(theme.text()));
        frame.render_widget(widget, area);
    }

    fn render_nodes(frame: &mut Frame, area: Rect, view: &ViewModel, scroll: usize, theme: &Theme) {
        let title = "Nodes (e: export)";
        let Some(nodes) = &view.network_nodes else {
            let placeholder = Paragraph::new("Loading nodes...")
                .block(Block::default().borders(Borders::ALL).title(title))
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let header = Row::new(vec!["ID", "Type", "Status", "Facts"]).style(
            Style::default()
                .fg(theme.primary())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = nodes
            .iter()
            .skip(scroll.min(nodes.len().saturating_sub(1)))
            .map(|node| {
                let status_color = if node.status == "active" {
                    theme.success()
                } else {
                    theme.text_dim()
                };
                Row::new(vec![
                    Cell::from(node.id.as_str()),
                    Cell::from(node.node_type.as_str()),
                    Cell::from(node.status.as_str()).style(Style::default().fg(status_color)),
                    Cell::from(node.facts.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(15),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} [{}]", title, nodes.len())),
        );

        frame.render_widget(table, area);
    }
}
