//! Read-only views derived from the history buffer and the current sections.
//! Sinks only ever receive these, never raw snapshots.

use crate::metrics::format::{
    format_bytes, format_count, format_duration, format_millis, format_number, format_percent,
};
use crate::metrics::score::{ComponentScores, ScoreCalculator};
use crate::telemetry::{EngineStats, MetricSnapshot, PerformanceStats, SystemStats};
use serde::Serialize;
use strum::{AsRefStr, Display};

const TIME_LABEL_FORMAT: &str = "%H:%M:%S";
const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<f64>,
}

impl NamedSeries {
    fn new(name: &str, points: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }

    pub fn max(&self) -> f64 {
        self.points.iter().copied().fold(0.0, f64::max)
    }
}

/// A chart dataset: one label per snapshot plus one or more aligned series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub series: Vec<NamedSeries>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.series.iter().map(NamedSeries::max).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiPanel {
    pub facts_per_second: String,
    pub tokens_per_second: String,
    pub rules_per_second: String,
    pub average_latency: String,
    pub total_nodes: String,
    pub active_nodes: String,
    pub total_facts: String,
    pub error_rate: String,
}

impl KpiPanel {
    pub fn from_stats(stats: &EngineStats) -> Self {
        Self {
            facts_per_second: format_number(stats.facts_per_second),
            tokens_per_second: format_number(stats.tokens_per_second),
            rules_per_second: format_number(stats.rules_per_second),
            average_latency: format_millis(stats.average_latency_ms),
            total_nodes: stats.total_nodes.to_string(),
            active_nodes: stats.active_nodes.to_string(),
            total_facts: format_count(stats.total_facts),
            error_rate: format_percent(stats.error_rate_percent),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemPanel {
    pub memory_percent: u64,
    pub memory_text: String,
    pub workers: String,
    pub gc_cycles: String,
    pub uptime: String,
}

impl SystemPanel {
    pub fn from_stats(stats: &SystemStats) -> Self {
        // Avoid dividing by zero before the engine reports its reserved memory.
        let total = stats.memory_total_bytes.max(1);
        let percent = (stats.memory_used_bytes as f64 / total as f64 * 100.0).round();

        Self {
            memory_percent: percent.max(0.0) as u64,
            memory_text: format!(
                "{} / {}",
                format_bytes(stats.memory_used_bytes),
                format_bytes(stats.memory_total_bytes)
            ),
            workers: stats.worker_count.to_string(),
            gc_cycles: stats.gc_count.to_string(),
            uptime: format_duration(stats.uptime_seconds),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformancePanel {
    pub index_hit_ratio: String,
    pub total_indexes: String,
    pub avg_lookup: String,
    pub join_cache_hits: String,
    pub join_cache_misses: String,
    pub avg_join: String,
    pub eval_cache_size: String,
    pub eval_hit_ratio: String,
    pub eval_evictions: String,
    pub queue_size: String,
    pub parallel_efficiency: String,
    pub worker_utilization: String,
}

impl PerformancePanel {
    /// Components the engine did not report render as `-`.
    pub fn from_stats(stats: &PerformanceStats) -> Self {
        let dash = || "-".to_string();
        let mut panel = Self {
            index_hit_ratio: dash(),
            total_indexes: dash(),
            avg_lookup: dash(),
            join_cache_hits: dash(),
            join_cache_misses: dash(),
            avg_join: dash(),
            eval_cache_size: dash(),
            eval_hit_ratio: dash(),
            eval_evictions: dash(),
            queue_size: dash(),
            parallel_efficiency: dash(),
            worker_utilization: dash(),
        };

        if let Some(index) = &stats.indexed_storage {
            panel.index_hit_ratio = format_percent(index.cache_hit_ratio);
            panel.total_indexes = index.total_indexes.to_string();
            panel.avg_lookup = format_millis(index.avg_lookup_ms);
        }
        if let Some(join) = &stats.hash_join {
            panel.join_cache_hits = format_count(join.cache_hits);
            panel.join_cache_misses = format_count(join.cache_misses);
            panel.avg_join = format_millis(join.avg_join_ms);
        }
        if let Some(cache) = &stats.evaluation_cache {
            panel.eval_cache_size = format_count(cache.current_size);
            panel.eval_hit_ratio = cache.hit_ratio.map_or_else(dash, format_percent);
            panel.eval_evictions = format_count(cache.evictions);
        }
        if let Some(tokens) = &stats.token_propagation {
            panel.queue_size = format_count(tokens.queue_size);
            panel.parallel_efficiency = format_percent(tokens.parallel_efficiency);
            panel.worker_utilization = format_percent(tokens.avg_worker_utilization);
        }
        panel
    }
}

/// Hit/miss split for the cache gauge; the two always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheRatio {
    pub hit: f64,
    pub miss: f64,
}

impl CacheRatio {
    pub fn new(hit: f64) -> Self {
        let hit = if hit.is_nan() { 0.0 } else { hit.clamp(0.0, 100.0) };
        Self {
            hit,
            miss: 100.0 - hit,
        }
    }

    /// Uses the reported hit ratio, or `fallback` when evaluation-cache stats
    /// (or their ratio) are absent.
    pub fn from_stats(stats: Option<&PerformanceStats>, fallback: f64) -> Self {
        let reported = stats
            .and_then(|p| p.evaluation_cache.as_ref())
            .and_then(|c| c.hit_ratio);
        Self::new(reported.unwrap_or(fallback))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ProjectionKind {
    Throughput,
    Memory,
    Workers,
    Scores,
    CacheRatio,
    Kpi,
    System,
    Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Projection {
    Throughput(TimeSeries),
    /// Used memory in MiB.
    Memory(TimeSeries),
    Workers(TimeSeries),
    Scores(ComponentScores),
    CacheRatio(CacheRatio),
    Kpi(KpiPanel),
    System(SystemPanel),
    Performance(PerformancePanel),
}

impl Projection {
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Projection::Throughput(_) => ProjectionKind::Throughput,
            Projection::Memory(_) => ProjectionKind::Memory,
            Projection::Workers(_) => ProjectionKind::Workers,
            Projection::Scores(_) => ProjectionKind::Scores,
            Projection::CacheRatio(_) => ProjectionKind::CacheRatio,
            Projection::Kpi(_) => ProjectionKind::Kpi,
            Projection::System(_) => ProjectionKind::System,
            Projection::Performance(_) => ProjectionKind::Performance,
        }
    }
}

/// Throughput, memory and worker series over the buffered snapshots. Empty when
/// nothing has been buffered yet.
pub fn series_projections<'a, I>(history: I) -> Vec<Projection>
where
    I: Iterator<Item = &'a MetricSnapshot> + Clone,
{
    let labels: Vec<String> = history
        .clone()
        .map(|s| s.captured_at.format(TIME_LABEL_FORMAT).to_string())
        .collect();
    if labels.is_empty() {
        return Vec::new();
    }

    let engine = |f: fn(&EngineStats) -> f64| -> Vec<f64> {
        history
            .clone()
            .map(|s| s.engine.as_ref().map_or(0.0, f))
            .collect()
    };
    let system = |f: fn(&SystemStats) -> f64| -> Vec<f64> {
        history
            .clone()
            .map(|s| s.system.as_ref().map_or(0.0, f))
            .collect()
    };

    let throughput = TimeSeries {
        labels: labels.clone(),
        series: vec![
            NamedSeries::new("Facts/sec", engine(|e| e.facts_per_second)),
            NamedSeries::new("Tokens/sec", engine(|e| e.tokens_per_second)),
            NamedSeries::new("Rules/sec", engine(|e| e.rules_per_second)),
        ],
    };
    let memory = TimeSeries {
        labels: labels.clone(),
        series: vec![NamedSeries::new(
            "Memory (MiB)",
            system(|s| s.memory_used_bytes as f64 / MIB),
        )],
    };
    let workers = TimeSeries {
        labels,
        series: vec![NamedSeries::new("Workers", system(|s| s.worker_count as f64))],
    };

    vec![
        Projection::Throughput(throughput),
        Projection::Memory(memory),
        Projection::Workers(workers),
    ]
}

/// Score radar and cache gauge for the newest snapshot.
pub fn instant_projections(
    latest: Option<&MetricSnapshot>,
    scorer: &ScoreCalculator,
    cache_fallback: f64,
) -> Vec<Projection> {
    let Some(latest) = latest else {
        return Vec::new();
    };
    let performance = latest.performance.clone().unwrap_or_default();
    vec![
        Projection::Scores(scorer.score(&performance)),
        Projection::CacheRatio(CacheRatio::from_stats(
            latest.performance.as_ref(),
            cache_fallback,
        )),
    ]
}

/// Current-value panels for whichever sections are known.
pub fn panel_projections(
    engine: Option<&EngineStats>,
    system: Option<&SystemStats>,
    performance: Option<&PerformanceStats>,
) -> Vec<Projection> {
    let mut out = Vec::with_capacity(3);
    if let Some(engine) = engine {
        out.push(Projection::Kpi(KpiPanel::from_stats(engine)));
    }
    if let Some(system) = system {
        out.push(Projection::System(SystemPanel::from_stats(system)));
    }
    if let Some(performance) = performance {
        out.push(Projection::Performance(PerformancePanel::from_stats(
            performance,
        )));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::history::HistoryBuffer;
    use crate::telemetry::{EvaluationCacheStats, MetricSections};
    use chrono::{Local, TimeZone};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn snapshot(second: u32, facts: f64, memory: u64) -> MetricSnapshot {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 10, 0, second).unwrap();
        MetricSnapshot::from_sections(
            at,
            MetricSections {
                system: Some(SystemStats {
                    memory_used_bytes: memory,
                    worker_count: 8,
                    ..Default::default()
                }),
                engine: Some(EngineStats {
                    facts_per_second: facts,
                    ..Default::default()
                }),
                performance: None,
            },
        )
    }

    #[test]
    fn test_series_follow_buffer_order() {
        let mut history = HistoryBuffer::new(3);
        for i in 0..4 {
            history.append(snapshot(i, i as f64 * 10.0, 2 * 1024 * 1024));
        }

        let projections = series_projections(history.as_sequence());
        let Projection::Throughput(throughput) = &projections[0] else {
            panic!("expected throughput first");
        };
        assert_eq!(throughput.labels, vec!["10:00:01", "10:00:02", "10:00:03"]);
        assert_eq!(throughput.series[0].points, vec![10.0, 20.0, 30.0]);
        assert_eq!(throughput.max(), 30.0);

        let Projection::Memory(memory) = &projections[1] else {
            panic!("expected memory second");
        };
        assert_eq!(memory.series[0].points, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_history_skips_series() {
        let history: HistoryBuffer = HistoryBuffer::new(5);
        assert!(series_projections(history.as_sequence()).is_empty());
        assert!(instant_projections(None, &ScoreCalculator::default(), 80.0).is_empty());
    }

    #[test]
    fn test_kpi_panel_formatting() {
        let kpi = KpiPanel::from_stats(&EngineStats {
            facts_per_second: 1500.0,
            tokens_per_second: 2_300_000.0,
            rules_per_second: 42.0,
            average_latency_ms: 3.5,
            total_facts: 12_000,
            error_rate_percent: 0.5,
            ..Default::default()
        });
        assert_snapshot!(kpi.facts_per_second, @"1.5K");
        assert_snapshot!(kpi.tokens_per_second, @"2.3M");
        assert_snapshot!(kpi.rules_per_second, @"42");
        assert_snapshot!(kpi.average_latency, @"3.5ms");
        assert_snapshot!(kpi.total_facts, @"12.0K");
        assert_snapshot!(kpi.error_rate, @"0.5%");
    }

    #[test]
    fn test_system_panel_handles_zero_total() {
        let panel = SystemPanel::from_stats(&SystemStats {
            memory_used_bytes: 0,
            memory_total_bytes: 0,
            uptime_seconds: 3_725,
            ..Default::default()
        });
        assert_eq!(panel.memory_percent, 0);
        assert_eq!(panel.memory_text, "0 B / 0 B");
        assert_eq!(panel.uptime, "1h 2m");

        let panel = SystemPanel::from_stats(&SystemStats {
            memory_used_bytes: 512 * 1024 * 1024,
            memory_total_bytes: 2 * 1024 * 1024 * 1024,
            ..Default::default()
        });
        assert_eq!(panel.memory_percent, 25);
        assert_eq!(panel.memory_text, "512 MB / 2 GB");
    }

    #[test]
    fn test_cache_ratio_fallback_only_when_absent() {
        assert_eq!(CacheRatio::from_stats(None, 80.0), CacheRatio::new(80.0));
        assert_eq!(
            CacheRatio::from_stats(Some(&PerformanceStats::default()), 80.0).miss,
            20.0
        );

        let reported = PerformanceStats {
            evaluation_cache: Some(EvaluationCacheStats {
                hit_ratio: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            CacheRatio::from_stats(Some(&reported), 80.0),
            CacheRatio { hit: 0.0, miss: 100.0 }
        );
    }

    #[test]
    fn test_performance_panel_marks_missing_components() {
        let panel = PerformancePanel::from_stats(&PerformanceStats::default());
        assert_eq!(panel.index_hit_ratio, "-");
        assert_eq!(panel.worker_utilization, "-");
        assert!(panel_projections(None, None, None).is_empty());
    }
}
