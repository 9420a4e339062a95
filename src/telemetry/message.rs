use crate::error::{AppError, Result};
use crate::telemetry::types::{
    AlertEvent, EngineStats, MetricSections, MetricSnapshot, PerformanceStats, SystemStats,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Payload of an `initial_data` push: current sections plus an optional history
/// backlog used to resync the buffer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InitialData {
    #[serde(default, alias = "system_metrics")]
    pub system: Option<SystemStats>,
    #[serde(default, alias = "rete", alias = "rete_metrics", alias = "engine_metrics")]
    pub engine: Option<EngineStats>,
    #[serde(default, alias = "performance_metrics")]
    pub performance: Option<PerformanceStats>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<MetricSnapshot>,
}

impl InitialData {
    pub fn sections(&self) -> MetricSections {
        MetricSections {
            system: self.system.clone(),
            engine: self.engine.clone(),
            performance: self.performance.clone(),
        }
    }
}

// The server encodes an empty backlog as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<MetricSnapshot>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MetricSnapshot>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    InitialData(InitialData),
    MetricsUpdate(MetricSections),
    Alert(AlertEvent),
    /// A kind this client does not understand yet.
    Unknown(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl PushMessage {
    pub fn kind(&self) -> &str {
        match self {
            PushMessage::InitialData(_) => "initial_data",
            PushMessage::MetricsUpdate(_) => "metrics_update",
            PushMessage::Alert(_) => "alert",
            PushMessage::Unknown(kind) => kind,
        }
    }

    /// Decodes a `{ "type": ..., "data": ... }` envelope. Unknown kinds decode
    /// successfully; only malformed JSON or malformed known payloads fail.
    pub fn decode(text: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| AppError::Parse(format!("malformed push envelope: {}", e)))?;

        let Envelope { kind, data } = envelope;
        let payload_err =
            |e: serde_json::Error| AppError::Parse(format!("malformed {} payload: {}", kind, e));

        let message = match kind.as_str() {
            "initial_data" => {
                PushMessage::InitialData(serde_json::from_value(data).map_err(payload_err)?)
            }
            "metrics_update" => {
                PushMessage::MetricsUpdate(serde_json::from_value(data).map_err(payload_err)?)
            }
            "alert" => PushMessage::Alert(serde_json::from_value(data).map_err(payload_err)?),
            _ => PushMessage::Unknown(kind.clone()),
        };
        Ok(message)
    }
}
