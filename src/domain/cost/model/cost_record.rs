use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single (timestamp, value) sample.
///
/// `timestamp` is in seconds; `0.0` means "no timestamp".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub timestamp: f64,
    pub value: f64,
}

impl Vector {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Per-unit prices reported for the node a workload runs on.
///
/// Prices are kept as the raw strings the provider reported; they are parsed
/// at pricing time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePricing {
    /// USD per vCPU-hour
    pub vcpu_cost: String,
    /// USD per GiB-hour
    pub ram_cost: String,
    /// USD per GPU-hour
    pub gpu_cost: String,
    /// USD per GiB-hour of storage
    pub storage_cost: String,
    /// e.g. "ondemand", "spot", "preemptible"
    pub usage_type: String,
}

impl NodePricing {
    pub fn is_spot(&self) -> bool {
        let usage = self.usage_type.to_ascii_lowercase();
        usage.contains("spot") || usage.contains("preemptible")
    }
}

/// A resolved persistent volume backing a claim.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistentVolume {
    pub name: String,
    /// USD per GiB-hour
    pub cost: String,
}

/// One persistent-volume attachment of a workload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PvcData {
    pub claim: String,
    pub namespace: String,
    pub volume_name: String,
    pub volume: Option<PersistentVolume>,
    /// Bytes requested over time
    pub values: Vec<Vector>,
}

/// Usage and request series of one workload, plus everything needed to group
/// and price it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CostRecord {
    // --- Identity ---
    pub name: String,
    pub pod_name: String,
    pub node_name: String,

    // --- Grouping metadata ---
    pub namespace: String,
    pub cluster_id: String,
    pub services: Vec<String>,
    pub deployments: Vec<String>,
    pub labels: HashMap<String, String>,

    // --- Pricing ---
    pub node_data: Option<NodePricing>,

    // --- Series ---
    pub cpu_allocation: Vec<Vector>,
    pub cpu_request: Vec<Vector>,
    pub ram_allocation: Vec<Vector>,
    pub ram_request: Vec<Vector>,
    pub gpu_request: Vec<Vector>,
    pub pvc_data: Vec<PvcData>,
    /// Already priced upstream
    pub network_data: Vec<Vector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_detection_covers_preemptible_nodes() {
        let mut node = NodePricing::default();
        assert!(!node.is_spot());

        node.usage_type = "Spot".into();
        assert!(node.is_spot());

        node.usage_type = "preemptible".into();
        assert!(node.is_spot());

        node.usage_type = "ondemand".into();
        assert!(!node.is_spot());
    }

    #[test]
    fn record_deserializes_from_camel_case() {
        let record: CostRecord = serde_json::from_value(serde_json::json!({
            "name": "api-0",
            "namespace": "web",
            "clusterId": "c1",
            "cpuAllocation": [{ "timestamp": 10.0, "value": 2.0 }],
            "nodeData": { "vcpuCost": "0.05", "ramCost": "0.01", "gpuCost": "", "storageCost": "", "usageType": "" }
        }))
        .unwrap();

        assert_eq!(record.cluster_id, "c1");
        assert_eq!(record.cpu_allocation, vec![Vector::new(10.0, 2.0)]);
        assert_eq!(record.node_data.unwrap().vcpu_cost, "0.05");
        assert!(record.pvc_data.is_empty());
    }
}
