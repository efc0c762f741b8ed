use tracing::warn;

use crate::core::pricing::pricing_provider_trait::PricingProvider;
use crate::core::util::cost_util::CostUtil;
use crate::core::util::vector_util::{bucket_timestamp, total_vector};
use crate::domain::cost::model::aggregation::RateUnit;
use crate::domain::cost::model::cost_record::{CostRecord, Vector};

/// Priced series of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceVectors {
    pub cpu: Vec<Vector>,
    pub ram: Vec<Vector>,
    pub gpu: Vec<Vector>,
    /// One series per attachment with a resolved volume
    pub pv: Vec<Vec<Vector>>,
    pub network: Vec<Vector>,
}

impl PriceVectors {
    /// CPU + RAM + GPU + PV, without network.
    pub fn compute_total(&self) -> f64 {
        let pv: f64 = self.pv.iter().map(|v| total_vector(v)).sum();
        total_vector(&self.cpu) + total_vector(&self.ram) + total_vector(&self.gpu) + pv
    }

    /// Every dimension including network.
    pub fn total(&self) -> f64 {
        self.compute_total() + total_vector(&self.network)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct UnitPrices {
    cpu: f64,
    ram: f64,
    gpu: f64,
    /// `None` means "use each volume's own price"
    storage: Option<f64>,
}

/// Turns a record's allocation series into cost series.
pub fn price_record<P: PricingProvider + ?Sized>(
    provider: &P,
    record: &CostRecord,
    rate: RateUnit,
    discount: f64,
    idle_coefficient: f64,
) -> PriceVectors {
    let prices = resolve_unit_prices(provider, record);

    let cpu: Vec<Vector> = record
        .cpu_allocation
        .iter()
        .map(|v| priced(v, CostUtil::compute_unit_cost(v.value, prices.cpu, discount, idle_coefficient, rate)))
        .collect();

    let ram: Vec<Vector> = record
        .ram_allocation
        .iter()
        .map(|v| priced(v, CostUtil::compute_memory_cost(v.value, prices.ram, discount, idle_coefficient, rate)))
        .collect();

    let gpu: Vec<Vector> = record
        .gpu_request
        .iter()
        .map(|v| priced(v, CostUtil::compute_unit_cost(v.value, prices.gpu, discount, idle_coefficient, rate)))
        .collect();

    let pv: Vec<Vec<Vector>> = record
        .pvc_data
        .iter()
        .filter_map(|pvc| {
            let volume = pvc.volume.as_ref()?;
            let gib_price = prices
                .storage
                .unwrap_or_else(|| CostUtil::parse_price(&volume.cost));

            Some(
                pvc.values
                    .iter()
                    .map(|v| priced(v, CostUtil::compute_storage_cost(v.value, gib_price, idle_coefficient, rate)))
                    .collect::<Vec<Vector>>(),
            )
        })
        .collect();

    PriceVectors {
        cpu,
        ram,
        gpu,
        pv,
        network: record.network_data.clone(),
    }
}

fn resolve_unit_prices<P: PricingProvider + ?Sized>(provider: &P, record: &CostRecord) -> UnitPrices {
    let node = record.node_data.clone().unwrap_or_default();

    if provider.custom_prices_enabled() {
        match provider.load_config() {
            Ok(custom) => {
                let (cpu, ram, gpu) = if node.is_spot() {
                    (custom.spot_cpu, custom.spot_ram, custom.spot_gpu)
                } else {
                    (custom.cpu, custom.ram, custom.gpu)
                };

                return UnitPrices {
                    cpu: CostUtil::parse_price(&cpu),
                    ram: CostUtil::parse_price(&ram),
                    gpu: CostUtil::parse_price(&gpu),
                    storage: Some(CostUtil::parse_price(&custom.storage)),
                };
            }
            Err(err) => {
                warn!("Failed to load custom pricing, using node prices: {}", err);
            }
        }
    }

    UnitPrices {
        cpu: CostUtil::parse_price(&node.vcpu_cost),
        ram: CostUtil::parse_price(&node.ram_cost),
        gpu: CostUtil::parse_price(&node.gpu_cost),
        storage: None,
    }
}

#[inline]
fn priced(sample: &Vector, value: f64) -> Vector {
    Vector {
        timestamp: bucket_timestamp(sample.timestamp),
        value,
    }
}
