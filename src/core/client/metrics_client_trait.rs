use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Time range of a cluster cost query.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCostQuery {
    /// Raw window as given by the caller, e.g. "24h"
    pub window: String,
    /// Raw offset as given by the caller, may be empty
    pub offset: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Monthly-rate cluster costs, each as `(timestamp, value)` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterCostTotals {
    pub cpu_cost: Vec<(f64, String)>,
    pub mem_cost: Vec<(f64, String)>,
    pub storage_cost: Vec<(f64, String)>,
}

/// Metrics backend able to report what the whole cluster cost.
#[async_trait]
pub trait MetricsClient: Send + Sync {
    async fn cluster_costs(&self, query: &ClusterCostQuery) -> anyhow::Result<ClusterCostTotals>;
}
