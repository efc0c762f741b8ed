use super::custom_pricing_entity::CustomPricing;

/// Source of custom pricing for the cost engine.
pub trait PricingProvider {
    fn load_config(&self) -> anyhow::Result<CustomPricing>;

    /// Whether custom prices should replace node-reported prices.
    fn custom_prices_enabled(&self) -> bool;
}

/// In-memory provider, mostly useful when prices come from somewhere other
/// than the pricing file.
#[derive(Debug, Clone, Default)]
pub struct StaticPricingProvider {
    pricing: Option<CustomPricing>,
}

impl StaticPricingProvider {
    pub fn new(pricing: CustomPricing) -> Self {
        Self { pricing: Some(pricing) }
    }

    /// Provider without any custom pricing; node prices always apply.
    pub fn node_prices_only() -> Self {
        Self { pricing: None }
    }
}

impl PricingProvider for StaticPricingProvider {
    fn load_config(&self) -> anyhow::Result<CustomPricing> {
        self.pricing
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no custom pricing configured"))
    }

    fn custom_prices_enabled(&self) -> bool {
        self.pricing
            .as_ref()
            .map(|p| p.custom_prices_enabled)
            .unwrap_or(false)
    }
}
