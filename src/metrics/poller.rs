//! Pull path: one startup load, then periodic refresh of the visible polled
//! section, plus explicit requests from the UI.

use crate::api::{AlertRuleRequest, AlertsOverview, DashboardApi, NetworkNode, NetworkStatus};
use crate::app::Section;
use crate::export::export_network;
use crate::telemetry::MetricSections;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PollRequest {
    /// Refresh one section regardless of visibility.
    Refresh(Section),
    RefreshAll,
    CreateRule(AlertRuleRequest),
    ExportNetwork(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PollTarget {
    #[strum(to_string = "metrics")]
    Metrics,
    #[strum(to_string = "network status")]
    NetworkStatus,
    #[strum(to_string = "network nodes")]
    NetworkNodes,
    #[strum(to_string = "alerts")]
    Alerts,
    #[strum(to_string = "alert rule")]
    AlertRule,
    #[strum(to_string = "network export")]
    Export,
}

impl PollTarget {
    pub fn failure_title(self) -> String {
        match self {
            PollTarget::AlertRule => "Failed to create alert rule".to_string(),
            PollTarget::Export => "Failed to export network data".to_string(),
            other => format!("Failed to load {}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Metrics(MetricSections),
    Network {
        status: Option<NetworkStatus>,
        nodes: Option<Vec<NetworkNode>>,
    },
    Alerts(AlertsOverview),
    RuleCreated(String),
    Exported(PathBuf),
    Failed { target: PollTarget, error: String },
}

/// UI-side handle: reports the visible section and queues explicit requests.
#[derive(Clone)]
pub struct PollerHandle {
    visible: Arc<watch::Sender<Section>>,
    requests: mpsc::UnboundedSender<PollRequest>,
}

impl PollerHandle {
    pub fn show(&self, section: Section) {
        self.visible.send_if_modified(|current| {
            if *current == section {
                false
            } else {
                *current = section;
                true
            }
        });
    }

    pub fn visible(&self) -> Section {
        *self.visible.borrow()
    }

    pub fn request(&self, request: PollRequest) {
        if self.requests.send(request).is_err() {
            debug!("poller stopped, request dropped");
        }
    }

    pub fn refresh(&self, section: Section) {
        self.request(PollRequest::Refresh(section));
    }

    pub fn create_rule(&self, rule: AlertRuleRequest) {
        self.request(PollRequest::CreateRule(rule));
    }

    pub fn export_network(&self, dir: PathBuf) {
        self.request(PollRequest::ExportNetwork(dir));
    }
}

pub struct PollingScheduler {
    api: Arc<dyn DashboardApi>,
    interval: Duration,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    visible: watch::Receiver<Section>,
    requests: mpsc::UnboundedReceiver<PollRequest>,
}

impl PollingScheduler {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        interval: Duration,
        outcomes: mpsc::UnboundedSender<PollOutcome>,
    ) -> (Self, PollerHandle) {
        let (visible_tx, visible) = watch::channel(Section::Overview);
        let (requests_tx, requests) = mpsc::unbounded_channel();

        let scheduler = Self {
            api,
            interval,
            outcomes,
            visible,
            requests,
        };
        let handle = PollerHandle {
            visible: Arc::new(visible_tx),
            requests: requests_tx,
        };
        (scheduler, handle)
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = self.refresh_all() => {}
        }

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let work = tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let section = *self.visible.borrow();
                    if !section.is_polled() {
                        continue;
                    }
                    debug!(%section, "scheduled refresh");
                    PollRequest::Refresh(section)
                }
                changed = self.visible.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let section = *self.visible.borrow_and_update();
                    if !section.is_polled() {
                        continue;
                    }
                    debug!(%section, "section shown, refreshing now");
                    PollRequest::Refresh(section)
                }
                request = self.requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.handle(work) => {}
            }
        }
        info!("polling scheduler stopped");
    }

    async fn handle(&self, request: PollRequest) {
        match request {
            PollRequest::Refresh(Section::Network) => self.refresh_network().await,
            PollRequest::Refresh(Section::Alerts) => self.refresh_alerts().await,
            PollRequest::Refresh(_) => self.refresh_metrics().await,
            PollRequest::RefreshAll => self.refresh_all().await,
            PollRequest::CreateRule(rule) => self.create_rule(rule).await,
            PollRequest::ExportNetwork(dir) => self.export(dir).await,
        }
    }

    /// Startup load. The three calls run concurrently and fail independently.
    async fn refresh_all(&self) {
        let (metrics, status, alerts) = tokio::join!(
            self.api.metrics(),
            self.api.network_status(),
            self.api.alerts()
        );

        match metrics {
            Ok(sections) => self.emit(PollOutcome::Metrics(sections)),
            Err(e) => self.fail(PollTarget::Metrics, e),
        }
        match status {
            Ok(status) => self.emit(PollOutcome::Network {
                status: Some(status),
                nodes: None,
            }),
            Err(e) => self.fail(PollTarget::NetworkStatus, e),
        }
        match alerts {
            Ok(overview) => self.emit(PollOutcome::Alerts(overview)),
            Err(e) => self.fail(PollTarget::Alerts, e),
        }
    }

    async fn refresh_metrics(&self) {
        match self.api.metrics().await {
            Ok(sections) => self.emit(PollOutcome::Metrics(sections)),
            Err(e) => self.fail(PollTarget::Metrics, e),
        }
    }

    /// Whatever half succeeded is still shown; failures collapse into one outcome.
    async fn refresh_network(&self) {
        let (status, nodes) = tokio::join!(self.api.network_status(), self.api.network_nodes());

        let mut errors = Vec::new();
        let mut target = None;
        let status = match status {
            Ok(status) => Some(status),
            Err(e) => {
                target = Some(PollTarget::NetworkStatus);
                errors.push(e.to_string());
                None
            }
        };
        let nodes = match nodes {
            Ok(nodes) => Some(nodes),
            Err(e) => {
                target.get_or_insert(PollTarget::NetworkNodes);
                errors.push(e.to_string());
                None
            }
        };

        if status.is_some() || nodes.is_some() {
            self.emit(PollOutcome::Network { status, nodes });
        }
        if let Some(target) = target {
            self.fail(target, errors.join("; "));
        }
    }

    async fn refresh_alerts(&self) {
        match self.api.alerts().await {
            Ok(overview) => self.emit(PollOutcome::Alerts(overview)),
            Err(e) => self.fail(PollTarget::Alerts, e),
        }
    }

    async fn create_rule(&self, rule: AlertRuleRequest) {
        match self.api.create_alert_rule(&rule).await {
            Ok(()) => {
                info!(rule = %rule.name, "alert rule created");
                self.emit(PollOutcome::RuleCreated(rule.name));
                self.refresh_alerts().await;
            }
            Err(e) => self.fail(PollTarget::AlertRule, e),
        }
    }

    async fn export(&self, dir: PathBuf) {
        let nodes = match self.api.network_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => return self.fail(PollTarget::Export, e),
        };

        match export_network(&nodes, &dir, Utc::now().date_naive()) {
            Ok(path) => {
                info!(path = %path.display(), nodes = nodes.len(), "network exported");
                self.emit(PollOutcome::Exported(path));
            }
            Err(e) => self.fail(PollTarget::Export, e),
        }
    }

    fn fail(&self, target: PollTarget, error: impl std::fmt::Display) {
        warn!(%target, error = %error, "poll failed");
        self.emit(PollOutcome::Failed {
            target,
            error: error.to_string(),
        });
    }

    fn emit(&self, outcome: PollOutcome) {
        let _ = self.outcomes.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls {
        metrics: AtomicUsize,
        status: AtomicUsize,
        nodes: AtomicUsize,
        alerts: AtomicUsize,
        rules: AtomicUsize,
    }

    #[derive(Default)]
    struct FakeApi {
        calls: Calls,
        fail_status: AtomicBool,
        fail_nodes: AtomicBool,
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn metrics(&self) -> Result<MetricSections> {
            self.calls.metrics.fetch_add(1, Ordering::SeqCst);
            Ok(MetricSections::default())
        }

        async fn network_status(&self) -> Result<NetworkStatus> {
            self.calls.status.fetch_add(1, Ordering::SeqCst);
            if self.fail_status.load(Ordering::SeqCst) {
                return Err(AppError::HttpStatus {
                    endpoint: "/api/network/status".to_string(),
                    status: 503,
                });
            }
            Ok(NetworkStatus {
                status: "running".to_string(),
                ..Default::default()
            })
        }

        async fn network_nodes(&self) -> Result<Vec<NetworkNode>> {
            self.calls.nodes.fetch_add(1, Ordering::SeqCst);
            if self.fail_nodes.load(Ordering::SeqCst) {
                return Err(AppError::HttpStatus {
                    endpoint: "/api/network/nodes".to_string(),
                    status: 503,
                });
            }
            Ok(Vec::new())
        }

        async fn alerts(&self) -> Result<AlertsOverview> {
            self.calls.alerts.fetch_add(1, Ordering::SeqCst);
            Ok(AlertsOverview::default())
        }

        async fn create_alert_rule(&self, _rule: &AlertRuleRequest) -> Result<()> {
            self.calls.rules.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Harness {
        api: Arc<FakeApi>,
        handle: PollerHandle,
        outcomes: mpsc::UnboundedReceiver<PollOutcome>,
        cancel: CancellationToken,
    }

    async fn start(api: FakeApi) -> Harness {
        let api = Arc::new(api);
        let (tx, mut outcomes) = mpsc::unbounded_channel();
        let (scheduler, handle) =
            PollingScheduler::new(api.clone(), Duration::from_secs(30), tx);
        let cancel = CancellationToken::new();
        tokio::spawn(scheduler.run(cancel.clone()));

        // startup load: metrics, network status, alerts
        for _ in 0..3 {
            outcomes.recv().await.unwrap();
        }
        Harness {
            api,
            handle,
            outcomes,
            cancel,
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_failures_are_reported_individually() {
        let api = Arc::new(FakeApi::default());
        api.fail_status.store(true, Ordering::SeqCst);
        let (tx, mut outcomes) = mpsc::unbounded_channel();
        let (scheduler, _handle) = PollingScheduler::new(api.clone(), Duration::from_secs(30), tx);
        let cancel = CancellationToken::new();
        tokio::spawn(scheduler.run(cancel.clone()));

        assert_eq!(
            outcomes.recv().await.unwrap(),
            PollOutcome::Metrics(MetricSections::default())
        );
        assert!(matches!(
            outcomes.recv().await.unwrap(),
            PollOutcome::Failed {
                target: PollTarget::NetworkStatus,
                ..
            }
        ));
        assert_eq!(
            outcomes.recv().await.unwrap(),
            PollOutcome::Alerts(AlertsOverview::default())
        );
        cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_sections_are_not_polled() {
        let h = start(FakeApi::default()).await;

        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(h.api.calls.status.load(Ordering::SeqCst), 1);
        assert_eq!(h.api.calls.nodes.load(Ordering::SeqCst), 0);
        assert_eq!(h.api.calls.alerts.load(Ordering::SeqCst), 1);
        assert_eq!(h.api.calls.metrics.load(Ordering::SeqCst), 1);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_section_refreshes_immediately_then_every_interval() {
        let h = start(FakeApi::default()).await;

        h.handle.show(Section::Network);
        settle().await;
        assert_eq!(h.api.calls.nodes.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(h.api.calls.nodes.load(Ordering::SeqCst), 4);
        assert_eq!(h.api.calls.alerts.load(Ordering::SeqCst), 1);

        h.handle.show(Section::Alerts);
        settle().await;
        assert_eq!(h.api.calls.alerts.load(Ordering::SeqCst), 2);
        assert_eq!(h.api.calls.nodes.load(Ordering::SeqCst), 4);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_refresh_bypasses_visibility() {
        let mut h = start(FakeApi::default()).await;

        h.handle.refresh(Section::Alerts);
        assert_eq!(
            h.outcomes.recv().await.unwrap(),
            PollOutcome::Alerts(AlertsOverview::default())
        );
        assert_eq!(h.handle.visible(), Section::Overview);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_created_rule_refreshes_alerts() {
        let mut h = start(FakeApi::default()).await;

        h.handle.create_rule(AlertRuleRequest {
            name: "latency".to_string(),
            description: String::new(),
            condition: "average_latency_ms > threshold".to_string(),
            threshold: 100.0,
            severity: crate::telemetry::Severity::High,
            is_enabled: true,
        });

        assert_eq!(
            h.outcomes.recv().await.unwrap(),
            PollOutcome::RuleCreated("latency".to_string())
        );
        assert_eq!(
            h.outcomes.recv().await.unwrap(),
            PollOutcome::Alerts(AlertsOverview::default())
        );
        assert_eq!(h.api.calls.rules.load(Ordering::SeqCst), 1);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_writes_into_directory() {
        let mut h = start(FakeApi::default()).await;
        let dir = tempfile::tempdir().unwrap();

        h.handle.export_network(dir.path().to_path_buf());
        match h.outcomes.recv().await.unwrap() {
            PollOutcome::Exported(path) => {
                assert_eq!(
                    path,
                    dir.path()
                        .join(crate::export::network_export_file_name(Utc::now().date_naive()))
                );
                assert!(path.exists());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_refresh_failure_is_one_outcome() {
        let mut h = start(FakeApi::default()).await;
        h.api.fail_status.store(true, Ordering::SeqCst);
        h.api.fail_nodes.store(true, Ordering::SeqCst);

        h.handle.show(Section::Network);
        settle().await;

        let mut outcomes = Vec::new();
        while let Ok(outcome) = h.outcomes.try_recv() {
            outcomes.push(outcome);
        }
        assert_eq!(outcomes.len(), 1, "got {:?}", outcomes);
        match &outcomes[0] {
            PollOutcome::Failed { target, error } => {
                assert_eq!(*target, PollTarget::NetworkStatus);
                assert!(error.contains("/api/network/status"));
                assert!(error.contains("/api/network/nodes"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_network_refresh_keeps_the_good_half() {
        let mut h = start(FakeApi::default()).await;
        h.api.fail_nodes.store(true, Ordering::SeqCst);

        h.handle.refresh(Section::Network);
        assert!(matches!(
            h.outcomes.recv().await.unwrap(),
            PollOutcome::Network {
                status: Some(_),
                nodes: None
            }
        ));
        assert!(matches!(
            h.outcomes.recv().await.unwrap(),
            PollOutcome::Failed {
                target: PollTarget::NetworkNodes,
                ..
            }
        ));
        h.cancel.cancel();
    }
}
