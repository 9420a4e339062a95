//! Presentation surfaces fed by the metrics controller.

pub mod log;

use crate::api::{AlertsOverview, NetworkNode, NetworkStatus};
use crate::channel::ConnectionStatus;
use crate::metrics::projection::Projection;
use crate::telemetry::{AlertEvent, Severity};
use chrono::{DateTime, Local};
use std::path::Path;

pub use log::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
    Alert(Severity),
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }

    pub fn alert(alert: &AlertEvent) -> Self {
        Self::new(
            NotificationLevel::Alert(alert.severity),
            format!("Alert: {}", alert.rule_name),
            alert.message.clone(),
        )
    }
}

/// Polled, presentation-only data for the non-metric sections.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionUpdate {
    Network {
        status: Option<NetworkStatus>,
        nodes: Option<Vec<NetworkNode>>,
    },
    Alerts(AlertsOverview),
}

/// Capability interface the controller drives. Implementations apply updates
/// without animation and never fetch data or touch controller state.
pub trait DashboardSink: Send {
    fn quiet_update(&mut self, projection: &Projection);

    fn on_snapshot_appended(&mut self, _captured_at: DateTime<Local>) {}

    fn on_status_change(&mut self, _status: &ConnectionStatus) {}

    fn on_alert(&mut self, _alert: &AlertEvent) {}

    fn on_section_update(&mut self, _update: &SectionUpdate) {}

    fn on_export(&mut self, _path: &Path) {}

    fn notify(&mut self, _notification: &Notification) {}
}
