use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One immutable point-in-time capture of every metric section. Sections the
/// engine did not report are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(rename = "timestamp", default = "Local::now")]
    pub captured_at: DateTime<Local>,
    #[serde(default, alias = "system_metrics")]
    pub system: Option<SystemStats>,
    #[serde(default, alias = "rete", alias = "rete_metrics", alias = "engine_metrics")]
    pub engine: Option<EngineStats>,
    #[serde(default, alias = "performance_metrics")]
    pub performance: Option<PerformanceStats>,
}

impl MetricSnapshot {
    pub fn new(
        captured_at: DateTime<Local>,
        system: Option<SystemStats>,
        engine: Option<EngineStats>,
        performance: Option<PerformanceStats>,
    ) -> Self {
        Self {
            captured_at,
            system,
            engine,
            performance,
        }
    }

    pub fn from_sections(captured_at: DateTime<Local>, sections: MetricSections) -> Self {
        Self::new(
            captured_at,
            sections.system,
            sections.engine,
            sections.performance,
        )
    }
}

/// The metric sections carried by `metrics_update` pushes and `/api/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSections {
    #[serde(default, alias = "system_metrics")]
    pub system: Option<SystemStats>,
    #[serde(default, alias = "rete", alias = "rete_metrics", alias = "engine_metrics")]
    pub engine: Option<EngineStats>,
    #[serde(default, alias = "performance_metrics")]
    pub performance: Option<PerformanceStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStats {
    #[serde(rename = "memory_usage_bytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memory_system_bytes")]
    pub memory_total_bytes: u64,
    #[serde(alias = "goroutine_count")]
    pub worker_count: u64,
    pub gc_count: u64,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineStats {
    pub facts_per_second: f64,
    pub tokens_per_second: f64,
    pub rules_per_second: f64,
    #[serde(alias = "average_latency")]
    pub average_latency_ms: f64,
    pub total_nodes: u64,
    pub active_nodes: u64,
    pub total_facts: u64,
    #[serde(alias = "error_rate")]
    pub error_rate_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceStats {
    #[serde(rename = "indexed_storage_stats")]
    pub indexed_storage: Option<IndexedStorageStats>,
    #[serde(rename = "hash_join_stats")]
    pub hash_join: Option<HashJoinStats>,
    #[serde(rename = "evaluation_cache_stats")]
    pub evaluation_cache: Option<EvaluationCacheStats>,
    #[serde(rename = "token_propagation_stats")]
    pub token_propagation: Option<TokenPropagationStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexedStorageStats {
    pub cache_hit_ratio: f64,
    pub total_indexes: u64,
    #[serde(rename = "avg_lookup_time")]
    pub avg_lookup_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashJoinStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    #[serde(rename = "avg_join_time")]
    pub avg_join_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationCacheStats {
    pub current_size: u64,
    /// `None` when the engine omits the ratio, so the gauge can fall back.
    pub hit_ratio: Option<f64>,
    pub evictions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPropagationStats {
    pub queue_size: u64,
    pub parallel_efficiency: f64,
    pub avg_worker_utilization: f64,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// A pushed alert. Only used to raise a notification; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub rule_name: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default = "Local::now")]
    pub timestamp: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_server_field_names_deserialize() {
        let json = r#"{
            "timestamp": "2026-10-19T10:15:30+00:00",
            "system_metrics": {
                "memory_usage_bytes": 1048576,
                "memory_system_bytes": 4194304,
                "goroutine_count": 12,
                "gc_count": 3,
                "uptime_seconds": 90
            },
            "rete_metrics": {
                "facts_per_second": 1500.0,
                "average_latency_ms": 2.5,
                "error_rate_percent": 0.1,
                "total_nodes": 40
            },
            "performance_metrics": {
                "hash_join_stats": { "cache_hits": 9, "cache_misses": 0 },
                "evaluation_cache_stats": null
            }
        }"#;

        let snapshot: MetricSnapshot = serde_json::from_str(json).unwrap();
        let system = snapshot.system.unwrap();
        assert_eq!(system.worker_count, 12);
        assert_eq!(system.memory_total_bytes, 4194304);

        let engine = snapshot.engine.unwrap();
        assert_eq!(engine.facts_per_second, 1500.0);
        assert_eq!(engine.average_latency_ms, 2.5);
        assert_eq!(engine.total_nodes, 40);
        assert_eq!(engine.active_nodes, 0);

        let perf = snapshot.performance.unwrap();
        assert_eq!(perf.hash_join.unwrap().cache_hits, 9);
        assert!(perf.evaluation_cache.is_none());
        assert!(perf.indexed_storage.is_none());
    }

    #[test]
    fn test_push_section_names_deserialize() {
        let sections: MetricSections = serde_json::from_str(
            r#"{ "engine": { "facts_per_second": 10, "average_latency": 4.0 }, "system": {} }"#,
        )
        .unwrap();

        assert_eq!(sections.engine.unwrap().average_latency_ms, 4.0);
        assert_eq!(sections.system, Some(SystemStats::default()));
        assert!(sections.performance.is_none());
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!(Severity::from_str("CRITICAL").unwrap(), Severity::Critical);
        assert_eq!(Severity::Low.to_string(), "low");
        assert!(Severity::from_str("urgent").is_err());

        let alert: AlertEvent = serde_json::from_str(
            r#"{ "rule_name": "latency", "message": "too slow", "severity": "high" }"#,
        )
        .unwrap();
        assert_eq!(alert.severity, Severity::High);
    }
}
