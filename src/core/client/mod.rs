//! Metrics-query capability and its Prometheus implementation.

pub mod metrics_client_trait;
pub mod prometheus_client;
