use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = centered_rect(80, 90, area);

        frame.render_widget(Clear, popup_area);

        let outer_block = Block::default()
            .title(" Help - Press ? or Esc to close ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));

        frame.render_widget(outer_block, popup_area);

        let inner_area = popup_area.inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 1,
        });

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Min(0),
            ])
            .split(inner_area);

        Self::render_section(
            frame,
            sections[0],
            "Global",
            &[
                ("q / Ctrl+C", "Quit (closes the push channel)"),
                ("?", "Toggle this help screen"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[1],
            "Navigation",
            &[
                ("1-5", "Overview / Performance / Network / Alerts / System"),
                ("h / ←", "Previous section"),
                ("l / →", "Next section"),
                ("j / k", "Scroll node list"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[2],
            "Actions",
            &[
                ("r", "Refresh the visible section now"),
                ("e", "Export network nodes as JSON"),
                ("n", "Create an alert rule"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[3],
            "Rule Form",
            &[
                ("Tab / ↓", "Next field"),
                ("Shift+Tab / ↑", "Previous field"),
                ("any key", "Cycle severity (on the severity field)"),
                ("Enter / Esc", "Submit / cancel"),
            ],
            theme,
        );

        let about_text = format!(
            "rete-dash v{}\nLive telemetry for a RETE rule engine. Network and alerts \
             refresh every poll interval while visible; metrics are pushed.",
            env!("CARGO_PKG_VERSION")
        );

        let about = Paragraph::new(about_text)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(" About ")
                    .border_style(Style::default().fg(theme.border())),
            )
            .style(Style::default().fg(theme.text_dim()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(about, sections[4]);
    }

    fn render_section(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        keybindings: &[(&str, &str)],
        theme: &Theme,
    ) {
        let rows: Vec<Row> = keybindings
            .iter()
            .map(|(key, desc)| {
                Row::new(vec![
                    Cell::from(*key).style(Style::default().fg(theme.highlight()).bold()),
                    Cell::from(*desc).style(Style::default().fg(theme.text())),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(15), Constraint::Percentage(85)])
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" {} ", title))
                    .border_style(Style::default().fg(theme.border())),
            )
            .column_spacing(2);

        frame.render_widget(table, area);
    }
}
