use crate::api::FormField;
use crate::app::App;
use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use strum::IntoEnumIterator;

pub struct RuleForm;

impl RuleForm {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" New Alert Rule ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let mut constraints: Vec<Constraint> =
            FormField::iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(1));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (field, row) in FormField::iter().zip(rows.iter()) {
            Self::render_field(frame, *row, app, field, theme);
        }

        if let Some(footer) = rows.last() {
            let hint = Paragraph::new("Tab: next field | Enter: create | Esc: cancel")
                .style(Style::default().fg(theme.text_dim()))
                .alignment(Alignment::Center);
            frame.render_widget(hint, *footer);
        }
    }

    fn render_field(frame: &mut Frame, area: Rect, app: &App, field: FormField, theme: &Theme) {
        let focused = app.form_field == field;
        let error = app.field_error(field);

        let border = if error.is_some() {
            theme.error()
        } else if focused {
            theme.border_focused()
        } else {
            theme.border()
        };

        let title = match error {
            Some(message) => format!("{} - {}", field, message),
            None => field.to_string(),
        };

        let mut value = app.rule_form.field(field).to_string();
        if focused && field != FormField::Severity {
            value.push('_');
        }

        let widget = Paragraph::new(value)
            .style(Style::default().fg(theme.text()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(title),
            );
        frame.render_widget(widget, area);
    }
}
