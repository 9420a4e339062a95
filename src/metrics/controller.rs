use crate::app::Section;
use crate::channel::{ChannelEvent, ChannelState, ConnectionStatus, ReconnectingChannel};
use crate::config::ScoringConfig;
use crate::metrics::history::HistoryBuffer;
use crate::metrics::poller::{PollOutcome, PollerHandle};
use crate::metrics::projection::{
    instant_projections, panel_projections, series_projections, Projection,
};
use crate::metrics::score::ScoreCalculator;
use crate::sink::{DashboardSink, Notification, SectionUpdate};
use crate::telemetry::{AlertEvent, InitialData, MetricSections, MetricSnapshot, PushMessage};
use chrono::Local;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Single owner of the history buffer and the push channel. Every inbound event
/// is handled to completion before the next one, then projected out to the sinks.
pub struct MetricsController {
    history: HistoryBuffer<MetricSnapshot>,
    current: MetricSections,
    scorer: ScoreCalculator,
    cache_fallback: f64,
    sinks: Vec<Box<dyn DashboardSink>>,
    poller: Option<PollerHandle>,
    channel: Option<ReconnectingChannel>,
    status: ConnectionStatus,
}

impl MetricsController {
    pub fn new(capacity: usize, scoring: ScoringConfig) -> Self {
        Self {
            history: HistoryBuffer::new(capacity),
            current: MetricSections::default(),
            scorer: ScoreCalculator::from_config(&scoring),
            cache_fallback: scoring.cache_hit_fallback,
            sinks: Vec::new(),
            poller: None,
            channel: None,
            status: ConnectionStatus::Idle,
        }
    }

    pub fn register(&mut self, sink: Box<dyn DashboardSink>) {
        self.sinks.push(sink);
    }

    /// Lets pushed alerts trigger an alerts refresh.
    pub fn attach_poller(&mut self, poller: PollerHandle) {
        self.poller = Some(poller);
    }

    /// Hands the push channel over; it is closed when `run` returns.
    pub fn attach_channel(&mut self, channel: ReconnectingChannel) {
        self.channel = Some(channel);
    }

    pub fn channel_state(&self) -> Option<ChannelState> {
        self.channel.as_ref().map(ReconnectingChannel::state)
    }

    pub fn history(&self) -> &HistoryBuffer<MetricSnapshot> {
        &self.history
    }

    pub fn current(&self) -> &MetricSections {
        &self.current
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn projections(&self) -> Vec<Projection> {
        let mut out = series_projections(self.history.as_sequence());
        out.extend(instant_projections(
            self.history.latest(),
            &self.scorer,
            self.cache_fallback,
        ));
        out.extend(self.panel_projections());
        out
    }

    fn panel_projections(&self) -> Vec<Projection> {
        panel_projections(
            self.current.engine.as_ref(),
            self.current.system.as_ref(),
            self.current.performance.as_ref(),
        )
    }

    pub async fn run(
        mut self,
        mut channel: mpsc::UnboundedReceiver<ChannelEvent>,
        mut polls: mpsc::UnboundedReceiver<PollOutcome>,
        cancel: CancellationToken,
    ) -> Self {
        let mut channel_open = true;
        let mut polls_open = true;

        while channel_open || polls_open {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = channel.recv(), if channel_open => match event {
                    Some(event) => self.on_channel_event(event),
                    None => channel_open = false,
                },
                outcome = polls.recv(), if polls_open => match outcome {
                    Some(outcome) => self.on_poll_result(outcome),
                    None => polls_open = false,
                },
            }
        }

        if let Some(channel) = self.channel.as_mut() {
            channel.close().await;
        }
        info!(buffered = self.history.len(), "metrics controller stopped");
        self
    }

    pub fn on_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Status(status) => {
                self.status = status.clone();
                for sink in &mut self.sinks {
                    sink.on_status_change(&status);
                }
            }
            ChannelEvent::Message(message) => self.on_push(message),
            ChannelEvent::ReconnectScheduled { attempt, delay } => {
                debug!(attempt, ?delay, "reconnect pending");
            }
        }
    }

    pub fn on_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::InitialData(data) => self.on_initial_data(data),
            PushMessage::MetricsUpdate(sections) => self.on_metrics_update(sections),
            PushMessage::Alert(alert) => self.on_alert(alert),
            PushMessage::Unknown(kind) => debug!(%kind, "ignoring unknown push message"),
        }
    }

    fn on_initial_data(&mut self, data: InitialData) {
        self.merge_current(data.sections());
        if !data.history.is_empty() {
            debug!(entries = data.history.len(), "resyncing history");
            self.history.replace(data.history);
        }
        self.fan_out();
    }

    fn on_metrics_update(&mut self, sections: MetricSections) {
        self.merge_current(sections.clone());
        let snapshot = MetricSnapshot::from_sections(Local::now(), sections);
        let captured_at = snapshot.captured_at;
        self.history.append(snapshot);

        self.fan_out();
        for sink in &mut self.sinks {
            sink.on_snapshot_appended(captured_at);
        }
    }

    fn on_alert(&mut self, alert: AlertEvent) {
        info!(rule = %alert.rule_name, severity = %alert.severity, "alert received");
        let notification = Notification::alert(&alert);
        for sink in &mut self.sinks {
            sink.on_alert(&alert);
            sink.notify(&notification);
        }
        if let Some(poller) = &self.poller {
            poller.refresh(Section::Alerts);
        }
    }

    /// Poll data is presentation-only; the history buffer is never touched here.
    pub fn on_poll_result(&mut self, outcome: PollOutcome) {
        match outcome {
            PollOutcome::Metrics(sections) => {
                self.merge_current(sections);
                let panels = self.panel_projections();
                self.push_projections(&panels);
            }
            PollOutcome::Network { status, nodes } => {
                self.section_update(SectionUpdate::Network { status, nodes });
            }
            PollOutcome::Alerts(overview) => {
                self.section_update(SectionUpdate::Alerts(overview));
            }
            PollOutcome::RuleCreated(name) => self.notify(Notification::success(
                "Alert rule created",
                format!("Rule \"{}\" is now active", name),
            )),
            PollOutcome::Exported(path) => {
                for sink in &mut self.sinks {
                    sink.on_export(&path);
                }
                self.notify(Notification::success(
                    "Network exported",
                    path.display().to_string(),
                ));
            }
            PollOutcome::Failed { target, error } => {
                warn!(%target, %error, "refresh failed");
                self.notify(Notification::error(target.failure_title(), error));
            }
        }
    }

    fn merge_current(&mut self, sections: MetricSections) {
        if sections.system.is_some() {
            self.current.system = sections.system;
        }
        if sections.engine.is_some() {
            self.current.engine = sections.engine;
        }
        if sections.performance.is_some() {
            self.current.performance = sections.performance;
        }
    }

    fn fan_out(&mut self) {
        let projections = self.projections();
        self.push_projections(&projections);
    }

    fn push_projections(&mut self, projections: &[Projection]) {
        for sink in &mut self.sinks {
            for projection in projections {
                sink.quiet_update(projection);
            }
        }
    }

    fn section_update(&mut self, update: SectionUpdate) {
        for sink in &mut self.sinks {
            sink.on_section_update(&update);
        }
    }

    fn notify(&mut self, notification: Notification) {
        for sink in &mut self.sinks {
            sink.notify(&notification);
        }
    }
}
