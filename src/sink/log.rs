use crate::channel::ConnectionStatus;
use crate::metrics::projection::Projection;
use crate::sink::{DashboardSink, Notification, NotificationLevel, SectionUpdate};
use crate::telemetry::AlertEvent;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

/// Headless sink: records what a screen would show through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink {
    updates: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl DashboardSink for LogSink {
    fn quiet_update(&mut self, projection: &Projection) {
        self.updates += 1;
        match projection {
            Projection::Kpi(kpi) => info!(
                facts = %kpi.facts_per_second,
                tokens = %kpi.tokens_per_second,
                rules = %kpi.rules_per_second,
                latency = %kpi.average_latency,
                errors = %kpi.error_rate,
                "engine"
            ),
            Projection::System(system) => info!(
                memory = %system.memory_text,
                memory_percent = system.memory_percent,
                workers = %system.workers,
                uptime = %system.uptime,
                "system"
            ),
            Projection::Scores(scores) => debug!(?scores, "component scores"),
            other => debug!(kind = %other.kind(), "projection updated"),
        }
    }

    fn on_snapshot_appended(&mut self, captured_at: DateTime<Local>) {
        debug!(at = %captured_at.format("%H:%M:%S"), "snapshot appended");
    }

    fn on_status_change(&mut self, status: &ConnectionStatus) {
        match status {
            ConnectionStatus::Error(err) => warn!(error = %err, "connection error"),
            other => info!(status = other.label(), "connection status"),
        }
    }

    fn on_alert(&mut self, alert: &AlertEvent) {
        warn!(
            rule = %alert.rule_name,
            severity = %alert.severity,
            message = %alert.message,
            "alert"
        );
    }

    fn on_section_update(&mut self, update: &SectionUpdate) {
        match update {
            SectionUpdate::Network { status, nodes } => info!(
                status = status.as_ref().map(|s| s.status.as_str()).unwrap_or("-"),
                nodes = nodes.as_ref().map_or(0, Vec::len),
                "network"
            ),
            SectionUpdate::Alerts(overview) => info!(
                active = overview.active_alerts.len(),
                rules = overview.rules_count,
                "alerts"
            ),
        }
    }

    fn notify(&mut self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => {
                warn!(title = %notification.title, "{}", notification.message)
            }
            _ => info!(title = %notification.title, "{}", notification.message),
        }
    }
}
