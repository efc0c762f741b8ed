use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::cost::model::cost_record::{CostRecord, Vector};
use crate::domain::cost::model::sharing_policy::SharingPolicy;
use crate::errors::CostModelError;

pub const HOURS_PER_DAY: f64 = 24.0;
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Output cost granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    /// Cumulative cost over the whole window
    #[default]
    #[serde(rename = "")]
    Cumulative,
    Hourly,
    Daily,
    Monthly,
}

impl RateUnit {
    pub fn as_code(&self) -> &'static str {
        match self {
            RateUnit::Cumulative => "",
            RateUnit::Hourly => "hourly",
            RateUnit::Daily => "daily",
            RateUnit::Monthly => "monthly",
        }
    }

    /// Samples are stored at a daily-equivalent rate; this converts them to
    /// the requested granularity.
    pub fn coefficient(&self) -> f64 {
        match self {
            RateUnit::Cumulative | RateUnit::Hourly => 1.0,
            RateUnit::Daily => HOURS_PER_DAY,
            RateUnit::Monthly => HOURS_PER_MONTH,
        }
    }

    pub fn is_rate(&self) -> bool {
        !matches!(self, RateUnit::Cumulative)
    }
}

impl FromStr for RateUnit {
    type Err = CostModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(RateUnit::Cumulative),
            "hourly" => Ok(RateUnit::Hourly),
            "daily" => Ok(RateUnit::Daily),
            "monthly" => Ok(RateUnit::Monthly),
            other => Err(CostModelError::InvalidRate(other.to_string())),
        }
    }
}

/// Field by which cost records are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Cluster,
    Namespace,
    Service,
    Deployment,
    Label,
}

impl GroupField {
    pub fn as_code(&self) -> &'static str {
        match self {
            GroupField::Cluster => "cluster",
            GroupField::Namespace => "namespace",
            GroupField::Service => "service",
            GroupField::Deployment => "deployment",
            GroupField::Label => "label",
        }
    }

    /// Resolves the group key of a record, or `None` if the record has no
    /// value for this field.
    ///
    /// For `Label`, the first subfield (in caller order) present in the
    /// record's labels wins.
    pub fn key_for(&self, record: &CostRecord, subfields: &[String]) -> Option<String> {
        match self {
            GroupField::Cluster => Some(record.cluster_id.clone()),
            GroupField::Namespace => Some(record.namespace.clone()),
            GroupField::Service => record.services.first().cloned(),
            GroupField::Deployment => record.deployments.first().cloned(),
            GroupField::Label => subfields
                .iter()
                .find_map(|sf| record.labels.get(sf).cloned()),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for GroupField {
    type Err = CostModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cluster" => Ok(GroupField::Cluster),
            "namespace" => Ok(GroupField::Namespace),
            "service" => Ok(GroupField::Service),
            "deployment" => Ok(GroupField::Deployment),
            "label" => Ok(GroupField::Label),
            _ => Err(CostModelError::UnknownGroupField(s.to_string())),
        }
    }
}

/// Optional parameters of an aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AggregationOptions {
    /// Number of samples expected in the window; used for rate division
    pub expected_sample_count: i64,
    /// Fraction by which CPU, RAM and GPU cost is discounted
    #[validate(range(min = 0.0, max = 1.0))]
    pub discount: f64,
    /// Divides every priced sample; must be non-zero
    pub idle_coefficient: f64,
    pub include_time_series: bool,
    pub rate: RateUnit,
    pub sharing_policy: Option<SharingPolicy>,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            expected_sample_count: 0,
            discount: 0.0,
            idle_coefficient: 1.0,
            include_time_series: false,
            rate: RateUnit::Cumulative,
            sharing_policy: None,
        }
    }
}

/// Cost summary of one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    #[serde(rename = "aggregation")]
    pub aggregator: String,
    pub subfields: Vec<String>,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    // --- Running allocation totals ---
    #[serde(skip)]
    pub cpu_allocation: Vec<Vector>,
    #[serde(skip)]
    pub ram_allocation: Vec<Vector>,
    #[serde(skip)]
    pub gpu_allocation: Vec<Vector>,

    // --- Time series (kept only on request) ---
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpu_cost_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpu_request_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ram_cost_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ram_request_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pv_cost_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gpu_cost_vector: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_cost_vector: Vec<Vector>,

    // --- Scalars ---
    pub cpu_cost: f64,
    pub ram_cost: f64,
    pub gpu_cost: f64,
    pub pv_cost: f64,
    pub network_cost: f64,
    pub shared_cost: f64,
    pub total_cost: f64,
}

impl Aggregation {
    pub fn new(field: GroupField, subfields: &[String], key: &str) -> Self {
        Self {
            aggregator: field.as_code().to_string(),
            subfields: subfields.to_vec(),
            environment: key.to_string(),
            ..Default::default()
        }
    }

    pub fn clear_time_series(&mut self) {
        self.cpu_cost_vector.clear();
        self.cpu_request_vector.clear();
        self.ram_cost_vector.clear();
        self.ram_request_vector.clear();
        self.pv_cost_vector.clear();
        self.gpu_cost_vector.clear();
        self.network_cost_vector.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn rate_unit_parses_and_scales() {
        assert_eq!("".parse::<RateUnit>().unwrap(), RateUnit::Cumulative);
        assert_eq!("Daily".parse::<RateUnit>().unwrap(), RateUnit::Daily);
        assert_eq!(RateUnit::Hourly.coefficient(), 1.0);
        assert_eq!(RateUnit::Daily.coefficient(), 24.0);
        assert_eq!(RateUnit::Monthly.coefficient(), 730.0);
        assert!(matches!(
            "weekly".parse::<RateUnit>(),
            Err(CostModelError::InvalidRate(_))
        ));
    }

    #[test]
    fn unknown_group_field_is_an_error() {
        assert_eq!("namespace".parse::<GroupField>().unwrap(), GroupField::Namespace);
        assert_eq!(
            "pod".parse::<GroupField>(),
            Err(CostModelError::UnknownGroupField("pod".into()))
        );
    }

    #[test]
    fn label_key_uses_first_present_subfield_in_caller_order() {
        let record = CostRecord {
            labels: HashMap::from([
                ("team".to_string(), "x".to_string()),
                ("app".to_string(), "y".to_string()),
            ]),
            ..Default::default()
        };
        let subfields = vec!["app".to_string(), "team".to_string()];

        assert_eq!(GroupField::Label.key_for(&record, &subfields), Some("y".into()));
        assert_eq!(GroupField::Label.key_for(&record, &["missing".to_string()]), None);
    }

    #[test]
    fn service_and_deployment_keys_need_a_name() {
        let mut record = CostRecord::default();
        assert_eq!(GroupField::Service.key_for(&record, &[]), None);
        assert_eq!(GroupField::Deployment.key_for(&record, &[]), None);

        record.services = vec!["frontend".into(), "backend".into()];
        assert_eq!(GroupField::Service.key_for(&record, &[]), Some("frontend".into()));
    }

    #[test]
    fn options_reject_out_of_range_discount() {
        let opts = AggregationOptions {
            discount: 1.5,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
        assert!(AggregationOptions::default().validate().is_ok());
    }

    #[test]
    fn serialization_omits_empty_series_and_keeps_scalars() {
        let agg = Aggregation {
            total_cost: 3.0,
            ..Aggregation::new(GroupField::Namespace, &[], "web")
        };
        let value = serde_json::to_value(&agg).unwrap();

        assert_eq!(value["aggregation"], "namespace");
        assert_eq!(value["environment"], "web");
        assert_eq!(value["totalCost"], 3.0);
        assert_eq!(value["sharedCost"], 0.0);
        assert!(value.get("cluster").is_none());
        assert!(value.get("cpuCostVector").is_none());
        assert!(value.get("cpuAllocation").is_none());
    }
}
