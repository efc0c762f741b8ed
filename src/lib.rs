//! Cost aggregation engine for Kubernetes workloads.
//!
//! Turns per-workload usage records into priced, grouped and
//! rate-normalized cost summaries.

pub mod core;
pub mod domain;
pub mod errors;

pub use crate::domain::cost::model::aggregation::{
    Aggregation, AggregationOptions, GroupField, RateUnit,
};
pub use crate::domain::cost::model::cost_record::{
    CostRecord, NodePricing, PersistentVolume, PvcData, Vector,
};
pub use crate::domain::cost::model::sharing_policy::SharingPolicy;
pub use crate::domain::cost::service::aggregation_service::{aggregate, aggregate_by_name};
pub use crate::domain::cost::service::idle_coefficient_service::compute_idle_coefficient;
pub use crate::errors::CostModelError;
