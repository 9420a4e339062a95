pub mod message;
pub mod types;

pub use message::{InitialData, PushMessage};
pub use types::{
    AlertEvent, EngineStats, EvaluationCacheStats, HashJoinStats, IndexedStorageStats,
    MetricSections, MetricSnapshot, PerformanceStats, Severity, SystemStats,
    TokenPropagationStats,
};
