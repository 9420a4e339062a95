use crate::api::types::{AlertRuleRequest, AlertsOverview, NetworkNode, NetworkStatus};
use crate::error::{AppError, Result};
use crate::telemetry::MetricSections;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const METRICS_PATH: &str = "/api/metrics";
pub const NETWORK_STATUS_PATH: &str = "/api/network/status";
pub const NETWORK_NODES_PATH: &str = "/api/network/nodes";
pub const ALERTS_PATH: &str = "/api/alerts";
pub const ALERT_RULES_PATH: &str = "/api/alerts/rules";

/// The REST surface of the monitoring server used by the dashboard.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn metrics(&self) -> Result<MetricSections>;

    async fn network_status(&self) -> Result<NetworkStatus>;

    async fn network_nodes(&self) -> Result<Vec<NetworkNode>>;

    async fn alerts(&self) -> Result<AlertsOverview>;

    async fn create_alert_rule(&self, rule: &AlertRuleRequest) -> Result<()>;
}

pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::request(path, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::request(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Parse(format!("invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn metrics(&self) -> Result<MetricSections> {
        self.get_json(METRICS_PATH).await
    }

    async fn network_status(&self) -> Result<NetworkStatus> {
        self.get_json(NETWORK_STATUS_PATH).await
    }

    async fn network_nodes(&self) -> Result<Vec<NetworkNode>> {
        let nodes: Option<Vec<NetworkNode>> = self.get_json(NETWORK_NODES_PATH).await?;
        Ok(nodes.unwrap_or_default())
    }

    async fn alerts(&self) -> Result<AlertsOverview> {
        self.get_json(ALERTS_PATH).await
    }

    async fn create_alert_rule(&self, rule: &AlertRuleRequest) -> Result<()> {
        let url = self.endpoint(ALERT_RULES_PATH)?;
        debug!(%url, rule = %rule.name, "POST");

        let response = self
            .client
            .post(url)
            .json(rule)
            .send()
            .await
            .map_err(|e| AppError::request(ALERT_RULES_PATH, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                endpoint: ALERT_RULES_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        // The server echoes the stored rule; the body is informational only.
        let _: Option<Value> = response.json().await.ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base() {
        let client = ApiClient::new(
            Url::parse("http://engine.local:8080/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(ALERT_RULES_PATH).unwrap().as_str(),
            "http://engine.local:8080/api/alerts/rules"
        );
        assert_eq!(
            client.endpoint(NETWORK_NODES_PATH).unwrap().as_str(),
            "http://engine.local:8080/api/network/nodes"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_request_fault() {
        let client = ApiClient::new(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let err = client.alerts().await.unwrap_err();
        assert!(matches!(err, AppError::Request { .. }), "got {:?}", err);
    }
}
