use crate::sink::Notification;
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Stacks notifications in the top-right corner, newest at the top.
pub struct ToastStack;

impl ToastStack {
    pub fn render<'a>(
        frame: &mut Frame,
        area: Rect,
        toasts: impl DoubleEndedIterator<Item = &'a Notification>,
        theme: &Theme,
    ) {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut y = area.y + 1;

        for toast in toasts.rev() {
            if y + TOAST_HEIGHT > area.y + area.height {
                break;
            }
            let rect = Rect::new(x, y, width, TOAST_HEIGHT);
            let color = theme.notification(toast.level);

            let widget = Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(theme.text()))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(Span::styled(
                            format!(" {} ", toast.title),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        )),
                );

            frame.render_widget(Clear, rect);
            frame.render_widget(widget, rect);
            y += TOAST_HEIGHT;
        }
    }
}
