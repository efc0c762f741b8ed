use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::client::prometheus_client::PrometheusClusterCostClient;
use crate::core::pricing::custom_pricing_repository::CustomPricingRepository;
use crate::domain::cost::model::sharing_policy::SharingPolicy;
use crate::errors::CostModelError;

pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";
pub const DEFAULT_PRICING_PATH: &str = "data/info/pricing.rci";
pub const DEFAULT_PROMETHEUS_TIMEOUT_SECS: u64 = 30;

/// Engine settings read from the environment (`RUSTCOST_*`).
#[derive(Debug, Clone, PartialEq)]
pub struct CostModelConfig {
    pub prometheus_url: String,
    pub prometheus_timeout: Duration,
    pub pricing_path: PathBuf,
    pub share_resources: bool,
    pub shared_namespaces: Vec<String>,
    pub shared_label_names: Vec<String>,
    pub shared_label_values: Vec<String>,
    pub discount: f64,
    pub log_dir: Option<PathBuf>,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            prometheus_url: DEFAULT_PROMETHEUS_URL.to_string(),
            prometheus_timeout: Duration::from_secs(DEFAULT_PROMETHEUS_TIMEOUT_SECS),
            pricing_path: PathBuf::from(DEFAULT_PRICING_PATH),
            share_resources: false,
            shared_namespaces: Vec::new(),
            shared_label_names: Vec::new(),
            shared_label_values: Vec::new(),
            discount: 0.0,
            log_dir: None,
        }
    }
}

impl CostModelConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, CostModelError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, CostModelError> {
        let mut cfg = Self::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(v) = get("RUSTCOST_PROMETHEUS_URL") {
            cfg.prometheus_url = v.to_string();
        }
        if let Some(v) = get("RUSTCOST_PROMETHEUS_TIMEOUT_SECS") {
            let secs: u64 = v.parse().map_err(|_| invalid("RUSTCOST_PROMETHEUS_TIMEOUT_SECS", v))?;
            cfg.prometheus_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("RUSTCOST_PRICING_PATH") {
            cfg.pricing_path = PathBuf::from(v);
        }
        if let Some(v) = get("RUSTCOST_SHARE_RESOURCES") {
            cfg.share_resources = parse_bool(v).ok_or_else(|| invalid("RUSTCOST_SHARE_RESOURCES", v))?;
        }
        if let Some(v) = get("RUSTCOST_SHARED_NAMESPACES") {
            cfg.shared_namespaces = split_list(v);
        }
        if let Some(v) = get("RUSTCOST_SHARED_LABEL_NAMES") {
            cfg.shared_label_names = split_list(v);
        }
        if let Some(v) = get("RUSTCOST_SHARED_LABEL_VALUES") {
            cfg.shared_label_values = split_list(v);
        }
        if let Some(v) = get("RUSTCOST_DISCOUNT") {
            let discount: f64 = v.parse().map_err(|_| invalid("RUSTCOST_DISCOUNT", v))?;
            if !(0.0..=1.0).contains(&discount) {
                return Err(invalid("RUSTCOST_DISCOUNT", v));
            }
            cfg.discount = discount;
        }
        if let Some(v) = get("RUSTCOST_LOG_DIR") {
            cfg.log_dir = Some(PathBuf::from(v));
        }

        Ok(cfg)
    }

    pub fn sharing_policy(&self) -> SharingPolicy {
        SharingPolicy::new(
            self.share_resources,
            &self.shared_namespaces,
            &self.shared_label_names,
            &self.shared_label_values,
        )
    }

    pub fn pricing_repository(&self) -> CustomPricingRepository {
        CustomPricingRepository::new(self.pricing_path.clone())
    }

    pub fn prometheus_client(&self) -> Result<PrometheusClusterCostClient, CostModelError> {
        PrometheusClusterCostClient::with_timeout(self.prometheus_url.clone(), self.prometheus_timeout)
            .map_err(|e| CostModelError::Config(e.to_string()))
    }
}

fn invalid(key: &str, value: &str) -> CostModelError {
    CostModelError::Config(format!("{}={:?} is not valid", key, value))
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
