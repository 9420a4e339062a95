use crate::channel::ConnectionStatus;
use crate::sink::NotificationLevel;
use crate::telemetry::Severity;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub fn new() -> Self {
        Self
    }

    pub fn primary(&self) -> Color {
        Color::Cyan
    }

    pub fn text(&self) -> Color {
        Color::Reset
    }

    pub fn text_dim(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn background(&self) -> Color {
        Color::Reset
    }

    pub fn success(&self) -> Color {
        Color::Green
    }

    pub fn warning(&self) -> Color {
        Color::Yellow
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn info(&self) -> Color {
        Color::Cyan
    }

    pub fn border(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn border_focused(&self) -> Color {
        Color::Cyan
    }

    pub fn highlight(&self) -> Color {
        Color::Yellow
    }

    pub fn gauge_background(&self) -> Color {
        Color::Reset
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Critical => Color::Red,
            Severity::High => Color::LightRed,
            Severity::Medium => Color::Yellow,
            Severity::Low => Color::Blue,
        }
    }

    pub fn connection(&self, status: &ConnectionStatus) -> Color {
        match status {
            ConnectionStatus::Connected => self.success(),
            ConnectionStatus::Connecting => self.warning(),
            ConnectionStatus::Idle => self.text_dim(),
            ConnectionStatus::Disconnected | ConnectionStatus::Error(_) => self.error(),
        }
    }

    pub fn notification(&self, level: NotificationLevel) -> Color {
        match level {
            NotificationLevel::Info => self.info(),
            NotificationLevel::Success => self.success(),
            NotificationLevel::Error => self.error(),
            NotificationLevel::Alert(severity) => self.severity(severity),
        }
    }

    /// Green at 80 and above, yellow from 50, red below.
    pub fn score(&self, value: f64) -> Color {
        if value >= 80.0 {
            self.success()
        } else if value >= 50.0 {
            self.warning()
        } else {
            self.error()
        }
    }

    pub fn memory_critical(&self) -> Color {
        Color::Red
    }

    pub fn memory_high(&self) -> Color {
        Color::Yellow
    }

    pub fn memory_normal(&self) -> Color {
        Color::Green
    }

    pub fn chart_lines(&self) -> [Color; 3] {
        [Color::Cyan, Color::Magenta, Color::Green]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
