use tracing::debug;

use crate::domain::cost::model::aggregation::RateUnit;

pub const BYTES_PER_GIB: f64 = 1_073_741_824.0;

pub struct CostUtil;

impl CostUtil {
    #[inline]
    pub fn bytes_to_gib(bytes: f64) -> f64 {
        bytes / BYTES_PER_GIB
    }

    /// Parses a per-unit price string. Malformed or empty prices count as zero.
    pub fn parse_price(raw: &str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                debug!("Non-finite price {:?}, treating as 0", v);
                0.0
            }
            Err(err) => {
                if !raw.trim().is_empty() {
                    debug!("Failed to parse price {:?}: {}, treating as 0", raw, err);
                }
                0.0
            }
        }
    }

    /// Cost of one CPU/GPU sample.
    #[inline]
    pub fn compute_unit_cost(
        units: f64,
        unit_price: f64,
        discount: f64,
        idle_coefficient: f64,
        rate: RateUnit,
    ) -> f64 {
        units * unit_price * (1.0 - discount) / idle_coefficient * rate.coefficient()
    }

    /// Cost of one RAM sample given in bytes.
    #[inline]
    pub fn compute_memory_cost(
        bytes: f64,
        gib_price: f64,
        discount: f64,
        idle_coefficient: f64,
        rate: RateUnit,
    ) -> f64 {
        Self::compute_unit_cost(Self::bytes_to_gib(bytes), gib_price, discount, idle_coefficient, rate)
    }

    /// Cost of one persistent-volume sample given in bytes. Storage is not discounted.
    #[inline]
    pub fn compute_storage_cost(bytes: f64, gib_price: f64, idle_coefficient: f64, rate: RateUnit) -> f64 {
        Self::bytes_to_gib(bytes) * gib_price / idle_coefficient * rate.coefficient()
    }
}
