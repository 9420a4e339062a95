use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Y/N question.
    Confirm,
    /// Informational; any of Enter/Esc closes it.
    Notice,
}

pub struct ConfirmationDialog;

impl ConfirmationDialog {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        kind: DialogKind,
        title: &str,
        message: &str,
        theme: &Theme,
    ) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let (accent, prompt) = match kind {
            DialogKind::Confirm => (theme.warning(), "Press [Y] to confirm, [N] to cancel"),
            DialogKind::Notice => (theme.success(), "Press [Enter] to close"),
        };

        let outer_block = Block::default()
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.background()));

        let inner_area = outer_block.inner(popup_area);
        frame.render_widget(outer_block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(inner_area);

        let message_widget = Paragraph::new(message)
            .style(Style::default().fg(theme.text()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message_widget, chunks[0]);

        let prompt = Paragraph::new(prompt)
            .style(Style::default().fg(theme.text_dim()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.border())),
            );
        frame.render_widget(prompt, chunks[1]);
    }
}
