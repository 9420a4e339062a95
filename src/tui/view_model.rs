use crate::api::{AlertsOverview, NetworkNode, NetworkStatus};
use crate::channel::ConnectionStatus;
use crate::metrics::projection::{
    CacheRatio, KpiPanel, PerformancePanel, Projection, SystemPanel, TimeSeries,
};
use crate::metrics::score::ComponentScores;
use crate::sink::{Notification, SectionUpdate};
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type SharedViewModel = Arc<RwLock<ViewModel>>;

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Everything the render loop draws. Written only by the terminal sink.
#[derive(Debug)]
pub struct ViewModel {
    pub status: ConnectionStatus,
    pub last_update: Option<DateTime<Local>>,
    pub throughput: Option<TimeSeries>,
    pub memory: Option<TimeSeries>,
    pub workers: Option<TimeSeries>,
    pub scores: Option<ComponentScores>,
    pub cache_ratio: Option<CacheRatio>,
    pub kpi: Option<KpiPanel>,
    pub system: Option<SystemPanel>,
    pub performance: Option<PerformancePanel>,
    pub network_status: Option<NetworkStatus>,
    pub network_nodes: Option<Vec<NetworkNode>>,
    pub alerts: Option<AlertsOverview>,
    /// Path of a finished export not yet acknowledged by the user.
    pub exported: Option<String>,
    toasts: VecDeque<Toast>,
    toast_ttl: Duration,
}

impl ViewModel {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            status: ConnectionStatus::Idle,
            last_update: None,
            throughput: None,
            memory: None,
            workers: None,
            scores: None,
            cache_ratio: None,
            kpi: None,
            system: None,
            performance: None,
            network_status: None,
            network_nodes: None,
            alerts: None,
            exported: None,
            toasts: VecDeque::new(),
            toast_ttl,
        }
    }

    pub fn shared(toast_ttl: Duration) -> SharedViewModel {
        Arc::new(RwLock::new(Self::new(toast_ttl)))
    }

    pub fn apply(&mut self, projection: &Projection) {
        match projection {
            Projection::Throughput(series) => self.throughput = Some(series.clone()),
            Projection::Memory(series) => self.memory = Some(series.clone()),
            Projection::Workers(series) => self.workers = Some(series.clone()),
            Projection::Scores(scores) => self.scores = Some(*scores),
            Projection::CacheRatio(ratio) => self.cache_ratio = Some(*ratio),
            Projection::Kpi(kpi) => self.kpi = Some(kpi.clone()),
            Projection::System(system) => self.system = Some(system.clone()),
            Projection::Performance(panel) => self.performance = Some(panel.clone()),
        }
    }

    /// A partial network refresh keeps whichever half did not arrive.
    pub fn apply_section(&mut self, update: &SectionUpdate) {
        match update {
            SectionUpdate::Network { status, nodes } => {
                if let Some(status) = status {
                    self.network_status = Some(status.clone());
                }
                if let Some(nodes) = nodes {
                    self.network_nodes = Some(nodes.clone());
                }
            }
            SectionUpdate::Alerts(overview) => self.alerts = Some(overview.clone()),
        }
    }

    pub fn push_toast(&mut self, notification: Notification, now: Instant) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            notification,
            shown_at: now,
        });
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        let ttl = self.toast_ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
    }

    pub fn dismiss_toasts(&mut self) {
        self.toasts.clear();
    }

    /// Oldest first.
    pub fn toasts(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.toasts.iter().map(|t| &t.notification)
    }
}
