use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::core::client::metrics_client_trait::{ClusterCostQuery, MetricsClient};
use crate::core::pricing::pricing_provider_trait::PricingProvider;
use crate::core::util::duration_util::{duration_hours, parse_duration};
use crate::domain::cost::model::aggregation::{RateUnit, HOURS_PER_MONTH};
use crate::domain::cost::model::cost_record::CostRecord;
use crate::domain::cost::service::pricing_service::price_record;
use crate::errors::{upstream_error, CostModelError};

/// Ratio of container-attributed cost to what the cluster actually cost over
/// `[now - offset - window, now - offset]`.
///
/// Cluster totals are reported by the metrics backend as monthly figures and
/// are pro-rated down to the window. Returns `0.0` when the cluster cost is
/// zero.
pub async fn compute_idle_coefficient<'a, I, M, P>(
    records: I,
    metrics_client: &M,
    provider: &P,
    discount: f64,
    window: &str,
    offset: &str,
) -> Result<f64, CostModelError>
where
    I: IntoIterator<Item = &'a CostRecord>,
    M: MetricsClient + ?Sized,
    P: PricingProvider + ?Sized,
{
    let window_duration = parse_duration(window)?;
    if window_duration <= Duration::zero() {
        return Err(CostModelError::InvalidDuration(window.to_string()));
    }
    let offset_duration = if offset.trim().is_empty() {
        Duration::zero()
    } else {
        parse_duration(offset)?
    };

    let end = Utc::now() - offset_duration;
    let query = ClusterCostQuery {
        window: window.to_string(),
        offset: offset.to_string(),
        start: end - window_duration,
        end,
    };

    let totals = metrics_client
        .cluster_costs(&query)
        .await
        .map_err(upstream_error)?;

    let cpu_cost = first_value(&totals.cpu_cost, "cpu")?;
    let mem_cost = first_value(&totals.mem_cost, "memory")?;
    let storage_cost = first_value(&totals.storage_cost, "storage")?;

    let total_cluster_cost = (cpu_cost + mem_cost) * (1.0 - discount) + storage_cost;
    if total_cluster_cost == 0.0 {
        warn!(
            "Cluster cost over {} (offset {:?}) is zero, idle coefficient reported as 0",
            window, offset
        );
        return Ok(0.0);
    }

    let total_cluster_cost_over_window =
        total_cluster_cost / HOURS_PER_MONTH * duration_hours(window_duration);

    let total_container_cost: f64 = records
        .into_iter()
        .map(|record| price_record(provider, record, RateUnit::Cumulative, discount, 1.0).compute_total())
        .sum();

    let coefficient = total_container_cost / total_cluster_cost_over_window;
    debug!(
        "Idle coefficient {:.4} (containers {:.4} / cluster {:.4} over {})",
        coefficient, total_container_cost, total_cluster_cost_over_window, window
    );

    Ok(coefficient)
}

fn first_value(series: &[(f64, String)], name: &str) -> Result<f64, CostModelError> {
    let (_, raw) = series
        .first()
        .ok_or_else(|| CostModelError::MalformedResponse(format!("no {} cost samples", name)))?;

    raw.trim().parse::<f64>().map_err(|e| {
        CostModelError::MalformedResponse(format!("{} cost {:?}: {}", name, raw, e))
    })
}
