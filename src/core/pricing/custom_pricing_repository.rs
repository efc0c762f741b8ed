use std::path::PathBuf;

use tracing::debug;

use super::custom_pricing_entity::CustomPricing;
use super::custom_pricing_fs_adapter::CustomPricingFsAdapter;
use super::pricing_provider_trait::PricingProvider;

/// File-backed pricing provider.
pub struct CustomPricingRepository {
    adapter: CustomPricingFsAdapter,
}

impl CustomPricingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            adapter: CustomPricingFsAdapter::new(path),
        }
    }

    pub fn update(&self, pricing: &CustomPricing) -> anyhow::Result<()> {
        self.adapter.write(pricing)
    }
}

impl PricingProvider for CustomPricingRepository {
    fn load_config(&self) -> anyhow::Result<CustomPricing> {
        self.adapter.read()
    }

    fn custom_prices_enabled(&self) -> bool {
        match self.adapter.read() {
            Ok(p) => p.custom_prices_enabled,
            Err(err) => {
                debug!(
                    "Custom pricing unavailable at {}: {}",
                    self.adapter.path().display(),
                    err
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pricing() -> CustomPricing {
        CustomPricing {
            cpu: "0.031611".into(),
            ram: "0.004237".into(),
            gpu: "0.95".into(),
            storage: "0.00005479".into(),
            spot_cpu: "0.006655".into(),
            spot_ram: "0.000892".into(),
            spot_gpu: "0.3".into(),
            custom_prices_enabled: true,
        }
    }

    #[test]
    fn missing_file_disables_custom_pricing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CustomPricingRepository::new(dir.path().join("pricing.rci"));

        assert!(repo.load_config().is_err());
        assert!(!repo.custom_prices_enabled());
    }

    #[test]
    fn update_then_load_returns_stored_prices() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CustomPricingRepository::new(dir.path().join("info").join("pricing.rci"));

        repo.update(&sample_pricing()).expect("write should succeed");

        assert_eq!(repo.load_config().unwrap(), sample_pricing());
        assert!(repo.custom_prices_enabled());
    }

    #[test]
    fn unknown_keys_and_junk_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.rci");
        std::fs::write(&path, "CPU: 0.5\nnot a pair\nREGION:eu-west-1\ncustom_prices_enabled:TRUE\n").unwrap();

        let repo = CustomPricingRepository::new(&path);
        let pricing = repo.load_config().unwrap();

        assert_eq!(pricing.cpu, "0.5");
        assert!(pricing.ram.is_empty());
        assert!(pricing.custom_prices_enabled);
    }
}
