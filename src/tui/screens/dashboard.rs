use crate::app::{App, AppMode, Section};
use crate::theme::Theme;
use crate::tui::view_model::ViewModel;
use crate::tui::views::{
    alerts::AlertsView, network::NetworkView, overview::OverviewView,
    performance::PerformanceView, system::SystemView,
};
use crate::tui::widgets::{
    confirmation_dialog::{ConfirmationDialog, DialogKind},
    help_overlay::HelpOverlay,
    rule_form::RuleForm,
    toast::ToastStack,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs},
};

pub struct DashboardScreen;

impl DashboardScreen {
    pub fn render(frame: &mut Frame, app: &App) {
        let view = app.view.read();
        let theme = &app.theme;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        Self::render_header(frame, chunks[0], &view, theme);
        Self::render_tabs(frame, chunks[1], app, theme);
        Self::render_content(frame, chunks[2], app, &view, theme);
        Self::render_footer(frame, chunks[3], app, theme);

        match &app.mode {
            AppMode::Help => HelpOverlay::render(frame, frame.area(), theme),
            AppMode::ConfirmExport => ConfirmationDialog::render(
                frame,
                frame.area(),
                DialogKind::Confirm,
                "Export Network",
                "Export the current network nodes as JSON?",
                theme,
            ),
            AppMode::ExportSuccess(path) => ConfirmationDialog::render(
                frame,
                frame.area(),
                DialogKind::Notice,
                "Export Complete",
                path,
                theme,
            ),
            AppMode::RuleForm => RuleForm::render(frame, frame.area(), app, theme),
            AppMode::Normal => {}
        }

        ToastStack::render(frame, frame.area(), view.toasts(), theme);
    }

    fn render_header(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
        let last_update = view
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let line = Line::from(vec![
            Span::styled(
                "RETE Engine ",
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ "),
            Span::styled("● ", Style::default().fg(theme.connection(&view.status))),
            Span::styled(
                view.status.label().to_string(),
                Style::default().fg(theme.connection(&view.status)),
            ),
            Span::raw(" │ Last update: "),
            Span::styled(last_update, Style::default().fg(theme.text())),
        ]);

        let header = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border()))
                .title("Dashboard"),
        );

        frame.render_widget(header, area);
    }

    fn render_tabs(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
        let titles: Vec<Line> = Section::all()
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let title = format!("{}:{}", i + 1, section.title());
                if *section == app.current_section {
                    Line::from(format!("[{}]", title)).style(
                        Style::default()
                            .fg(theme.highlight())
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::from(title).style(Style::default().fg(theme.text_dim()))
                }
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Views"))
            .divider(" ");

        frame.render_widget(tabs, area);
    }

    fn render_content(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel, theme: &Theme) {
        match app.current_section {
            Section::Overview => OverviewView::render(frame, area, view, theme),
            Section::Performance => PerformanceView::render(frame, area, view, theme),
            Section::Network => NetworkView::render(frame, area, view, app.scroll_offset, theme),
            Section::Alerts => AlertsView::render(frame, area, view, theme),
            Section::System => SystemView::render(frame, area, view, theme),
        }
    }

    fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
        let footer_text = match app.current_section {
            Section::Network => "1-5: Section | j/k: Scroll | r: Refresh | e: Export | ?: Help | q: Quit",
            Section::Alerts => "1-5: Section | r: Refresh | n: New rule | ?: Help | q: Quit",
            _ => "1-5: Section | h/l: Prev/Next | r: Refresh | x: Dismiss toasts | ?: Help | q: Quit",
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(theme.text_dim()))
            .block(Block::default().borders(Borders::ALL).title("Controls"));

        frame.render_widget(footer, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ConnectionStatus;
    use crate::metrics::projection::KpiPanel;
    use crate::sink::Notification;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::{Duration, Instant};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| DashboardScreen::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_header_shows_status_and_kpis() {
        let app = App::new(ViewModel::shared(Duration::from_secs(5)));
        {
            let mut view = app.view.write();
            view.status = ConnectionStatus::Connected;
            view.kpi = Some(KpiPanel {
                facts_per_second: "1.5K".to_string(),
                ..Default::default()
            });
        }

        let text = screen_text(&app);
        assert!(text.contains("Connected"));
        assert!(text.contains("Last update: never"));
        assert!(text.contains("1.5K"));
        assert!(text.contains("[1:Overview]"));
    }

    #[test]
    fn test_alerts_placeholders_and_toasts() {
        let mut app = App::new(ViewModel::shared(Duration::from_secs(5)));
        app.select_section(3);
        app.view
            .write()
            .push_toast(Notification::error("Failed to load alerts", "HTTP 500"), Instant::now());

        let text = screen_text(&app);
        assert!(text.contains("No active alerts"));
        assert!(text.contains("No alert rules configured"));
        assert!(text.contains("Failed to load alerts"));
    }

    #[test]
    fn test_rule_form_overlay_renders_fields() {
        let mut app = App::new(ViewModel::shared(Duration::from_secs(5)));
        app.open_rule_form();
        let text = screen_text(&app);
        assert!(text.contains("New Alert Rule"));
        assert!(text.contains("Threshold"));
        assert!(text.contains("medium"));
    }
}
