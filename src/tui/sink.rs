use crate::channel::ConnectionStatus;
use crate::metrics::projection::Projection;
use crate::sink::{DashboardSink, Notification, SectionUpdate};
use crate::tui::view_model::SharedViewModel;
use chrono::{DateTime, Local};
use std::path::Path;
use std::time::Instant;

/// Writes controller output into the view model the render loop draws from.
pub struct TuiSink {
    view: SharedViewModel,
}

impl TuiSink {
    pub fn new(view: SharedViewModel) -> Self {
        Self { view }
    }
}

impl DashboardSink for TuiSink {
    fn quiet_update(&mut self, projection: &Projection) {
        self.view.write().apply(projection);
    }

    fn on_snapshot_appended(&mut self, captured_at: DateTime<Local>) {
        self.view.write().last_update = Some(captured_at);
    }

    fn on_status_change(&mut self, status: &ConnectionStatus) {
        self.view.write().status = status.clone();
    }

    fn on_section_update(&mut self, update: &SectionUpdate) {
        self.view.write().apply_section(update);
    }

    fn on_export(&mut self, path: &Path) {
        self.view.write().exported = Some(path.display().to_string());
    }

    fn notify(&mut self, notification: &Notification) {
        self.view
            .write()
            .push_toast(notification.clone(), Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::projection::KpiPanel;
    use crate::tui::view_model::ViewModel;
    use std::time::Duration;

    #[test]
    fn test_sink_writes_into_view_model() {
        let view = ViewModel::shared(Duration::from_secs(5));
        let mut sink = TuiSink::new(view.clone());

        sink.on_status_change(&ConnectionStatus::Connected);
        sink.quiet_update(&Projection::Kpi(KpiPanel {
            facts_per_second: "1.5K".to_string(),
            ..Default::default()
        }));
        sink.notify(&Notification::success("Saved", "ok"));

        let vm = view.read();
        assert_eq!(vm.status, ConnectionStatus::Connected);
        assert_eq!(vm.kpi.as_ref().unwrap().facts_per_second, "1.5K");
        assert_eq!(vm.toasts().count(), 1);
    }
}
