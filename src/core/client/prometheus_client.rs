use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::metrics_client_trait::{ClusterCostQuery, ClusterCostTotals, MetricsClient};

const QUERY_CPU_COST: &str = "sum(avg_over_time(node_cpu_hourly_cost[{window}]) * on (node) avg_over_time(kube_node_status_capacity_cpu_cores[{window}])) * 730";
const QUERY_MEM_COST: &str = "sum(avg_over_time(node_ram_hourly_cost[{window}]) * on (node) avg_over_time(kube_node_status_capacity_memory_bytes[{window}]) / 1024 / 1024 / 1024) * 730";
const QUERY_STORAGE_COST: &str = "sum(avg_over_time(pv_hourly_cost[{window}]) * on (persistentvolume) avg_over_time(kube_persistentvolume_capacity_bytes[{window}]) / 1024 / 1024 / 1024) * 730";

/// Reads cluster costs from a Prometheus server scraping the cost exporter.
pub struct PrometheusClusterCostClient {
    client: Client,
    base_url: String,
}

impl PrometheusClusterCostClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self::new(client, base_url))
    }

    pub fn build_query_url(&self, template: &str, window: &str, at: DateTime<Utc>) -> String {
        let promql = template.replace("{window}", window);
        format!(
            "{}/api/v1/query?query={}&time={}",
            self.base_url,
            urlencoding::encode(&promql),
            at.timestamp()
        )
    }

    async fn instant_query(&self, url: &str) -> Result<Vec<(f64, String)>> {
        debug!("Prometheus query: {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call Prometheus (url={}): {}", url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Prometheus returned {}: {} (url={})", status, text, url));
        }

        let body: PromResponse = resp.json().await?;
        parse_vector_response(body)
    }
}

#[async_trait]
impl MetricsClient for PrometheusClusterCostClient {
    async fn cluster_costs(&self, query: &ClusterCostQuery) -> Result<ClusterCostTotals> {
        let cpu_url = self.build_query_url(QUERY_CPU_COST, &query.window, query.end);
        let mem_url = self.build_query_url(QUERY_MEM_COST, &query.window, query.end);
        let storage_url = self.build_query_url(QUERY_STORAGE_COST, &query.window, query.end);

        Ok(ClusterCostTotals {
            cpu_cost: self.instant_query(&cpu_url).await?,
            mem_cost: self.instant_query(&mem_url).await?,
            storage_cost: self.instant_query(&storage_url).await?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PromResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<PromData>,
}

#[derive(Debug, Deserialize)]
struct PromData {
    #[serde(rename = "resultType")]
    result_type: String,
    result: Vec<PromSample>,
}

#[derive(Debug, Deserialize)]
struct PromSample {
    value: (f64, String),
}

fn parse_vector_response(body: PromResponse) -> Result<Vec<(f64, String)>> {
    if body.status != "success" {
        return Err(anyhow!(
            "Prometheus query failed: {}",
            body.error.unwrap_or_else(|| body.status.clone())
        ));
    }

    let data = body
        .data
        .ok_or_else(|| anyhow!("Prometheus response has no data"))?;

    if data.result_type != "vector" {
        return Err(anyhow!("unexpected result type {}", data.result_type));
    }

    Ok(data.result.into_iter().map(|s| s.value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn query_url_is_encoded_and_pinned_to_end() {
        let client = PrometheusClusterCostClient::new(Client::new(), "http://prom:9090/");
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let url = client.build_query_url("sum(x[{window}])", "24h", at);

        assert_eq!(
            url,
            "http://prom:9090/api/v1/query?query=sum%28x%5B24h%5D%29&time=1700000000"
        );
    }

    #[test]
    fn vector_response_yields_samples() {
        let body: PromResponse = serde_json::from_value(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [{ "metric": {}, "value": [1700000000.0, "1234.5"] }]
            }
        }))
        .unwrap();

        let samples = parse_vector_response(body).unwrap();
        assert_eq!(samples, vec![(1_700_000_000.0, "1234.5".to_string())]);
    }

    #[test]
    fn error_status_is_reported() {
        let body: PromResponse = serde_json::from_value(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "parse error"
        }))
        .unwrap();

        let err = parse_vector_response(body).unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }
}
