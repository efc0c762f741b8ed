use serde::{Deserialize, Serialize};

/// Operator-supplied per-unit prices that override node-reported prices.
///
/// Stored at `data/info/pricing.rci` unless configured otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomPricing {
    // --- On-demand ---
    /// USD per vCPU-hour
    pub cpu: String,
    /// USD per GiB-hour
    pub ram: String,
    /// USD per GPU-hour
    pub gpu: String,
    /// USD per GiB-hour, also used for spot nodes
    pub storage: String,

    // --- Spot ---
    pub spot_cpu: String,
    pub spot_ram: String,
    pub spot_gpu: String,

    pub custom_prices_enabled: bool,
}
