use crate::config::ScoringConfig;
use crate::telemetry::{
    EvaluationCacheStats, HashJoinStats, IndexedStorageStats, PerformanceStats,
    TokenPropagationStats,
};
use serde::Serialize;

pub const MAX_SCORE: f64 = 100.0;

/// Normalized 0-100 scores for the four engine components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComponentScores {
    pub indexed_storage: f64,
    pub hash_join: f64,
    pub evaluation_cache: f64,
    pub token_propagation: f64,
}

impl ComponentScores {
    pub const LABELS: [&'static str; 4] = ["IndexedStorage", "HashJoin", "EvalCache", "TokenProp"];

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.indexed_storage,
            self.hash_join,
            self.evaluation_cache,
            self.token_propagation,
        ]
    }
}

/// Stateless mapping from performance stats to component scores. A missing
/// component scores 0 ("no signal").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCalculator {
    join_guard: f64,
}

impl ScoreCalculator {
    pub fn new(join_guard: f64) -> Self {
        Self { join_guard }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.join_guard)
    }

    pub fn score(&self, stats: &PerformanceStats) -> ComponentScores {
        ComponentScores {
            indexed_storage: self.indexed_storage(stats.indexed_storage.as_ref()),
            hash_join: self.hash_join(stats.hash_join.as_ref()),
            evaluation_cache: self.evaluation_cache(stats.evaluation_cache.as_ref()),
            token_propagation: self.token_propagation(stats.token_propagation.as_ref()),
        }
    }

    pub fn indexed_storage(&self, stats: Option<&IndexedStorageStats>) -> f64 {
        stats.map_or(0.0, |s| bounded(s.cache_hit_ratio))
    }

    /// `hits / (hits + misses + guard) * 100`; the guard keeps a cold cache at 0.
    pub fn hash_join(&self, stats: Option<&HashJoinStats>) -> f64 {
        stats.map_or(0.0, |s| {
            let hits = s.cache_hits as f64;
            let total = hits + s.cache_misses as f64 + self.join_guard;
            if total <= 0.0 {
                return 0.0;
            }
            bounded(hits / total * 100.0)
        })
    }

    pub fn evaluation_cache(&self, stats: Option<&EvaluationCacheStats>) -> f64 {
        stats.map_or(0.0, |s| bounded(s.hit_ratio.unwrap_or(0.0)))
    }

    pub fn token_propagation(&self, stats: Option<&TokenPropagationStats>) -> f64 {
        stats.map_or(0.0, |s| bounded(s.parallel_efficiency))
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

fn bounded(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_SCORE)
}
