use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub struct AlertsView;

impl AlertsView {
    pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        Self::render_active(frame, chunks[0], view, theme);
        Self::render_rules(frame, chunks[1], view, theme);
    }

    fn render_active(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let block = Block::default().borders(Borders::ALL).title("Active Alerts");

        let alerts = view
            .alerts
            .as_ref()
            .map(|overview| overview.active_alerts.as_slice())
            .unwrap_or_default();

        if alerts.is_empty() {
            let placeholder = Paragraph::new("No active alerts")
                .block(block)
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        }

        let rows: Vec<Row> = alerts
            .iter()
            .map(|alert| {
                Row::new(vec![
                    Cell::from(alert.severity.as_ref().to_uppercase())
                        .style(Style::default().fg(theme.severity(alert.severity))),
                    Cell::from(alert.rule_name.as_str()),
                    Cell::from(alert.message.as_str()),
                    Cell::from(alert.timestamp.format("%H:%M:%S").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Percentage(25),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["Severity", "Rule", "Message", "Time"]).style(
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_rules(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let text = match view.alerts.as_ref().map(|o| o.rules_count) {
            Some(0) | None => "No alert rules configured (n: new rule)".to_string(),
            Some(count) => format!("{} rule(s) configured (n: new rule)", count),
        };

        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Rules"))
            .style(Style::default().fg(theme.text()));
        frame.render_widget(widget, area);
    }
}
