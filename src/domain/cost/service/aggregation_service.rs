use std::collections::HashMap;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::core::pricing::pricing_provider_trait::PricingProvider;
use crate::core::util::vector_util::{add_vectors, total_vector};
use crate::domain::cost::model::aggregation::{Aggregation, AggregationOptions, GroupField, RateUnit};
use crate::domain::cost::model::cost_record::CostRecord;
use crate::domain::cost::service::pricing_service::price_record;
use crate::domain::cost::service::shared_resource_service::is_shared;
use crate::errors::CostModelError;

/// Same as [`aggregate`], with the group field given by name.
///
/// Fails with `UnknownGroupField` instead of routing nothing.
pub fn aggregate_by_name<'a, I, P>(
    records: I,
    field: &str,
    subfields: &[String],
    provider: &P,
    options: &AggregationOptions,
) -> Result<HashMap<String, Aggregation>, CostModelError>
where
    I: IntoIterator<Item = &'a CostRecord>,
    P: PricingProvider + ?Sized,
{
    let group_field: GroupField = field.parse()?;
    Ok(aggregate(records, group_field, subfields, provider, options))
}

/// Groups records by `group_field`, prices them and collapses each group to
/// scalar costs.
///
/// Shared records (when sharing is enabled) are priced into a single pool
/// that is split evenly across all resulting groups. With a rate requested
/// and a positive expected sample count, every scalar is divided by that
/// count.
pub fn aggregate<'a, I, P>(
    records: I,
    group_field: GroupField,
    subfields: &[String],
    provider: &P,
    options: &AggregationOptions,
) -> HashMap<String, Aggregation>
where
    I: IntoIterator<Item = &'a CostRecord>,
    P: PricingProvider + ?Sized,
{
    let discount = effective_discount(options);
    let idle_coefficient = effective_idle_coefficient(options.idle_coefficient);
    let rate = options.rate;
    let sharing = options.sharing_policy.as_ref().filter(|p| p.enabled);

    let mut aggregations: HashMap<String, Aggregation> = HashMap::new();
    let mut shared_resource_cost = 0.0;
    let mut skipped = 0usize;

    for record in records {
        if let Some(policy) = sharing {
            if is_shared(policy, record) {
                let prices = price_record(provider, record, rate, discount, idle_coefficient);
                shared_resource_cost += prices.total();
                continue;
            }
        }

        let Some(key) = group_field.key_for(record, subfields) else {
            skipped += 1;
            continue;
        };

        let agg = aggregations.entry(key).or_insert_with_key(|key| {
            let mut agg = Aggregation::new(group_field, subfields, key);
            if !record.cluster_id.is_empty() {
                agg.cluster = Some(record.cluster_id.clone());
            }
            agg
        });

        merge_record(agg, record, provider, rate, discount, idle_coefficient);
    }

    if skipped > 0 {
        debug!("{} records had no '{}' value and were not grouped", skipped, group_field);
    }

    finalize(&mut aggregations, shared_resource_cost, options);

    info!(
        "Aggregated by '{}' into {} groups (shared pool {:.4})",
        group_field,
        aggregations.len(),
        shared_resource_cost
    );

    aggregations
}

fn merge_record<P: PricingProvider + ?Sized>(
    agg: &mut Aggregation,
    record: &CostRecord,
    provider: &P,
    rate: RateUnit,
    discount: f64,
    idle_coefficient: f64,
) {
    agg.cpu_allocation = add_vectors(&record.cpu_allocation, &agg.cpu_allocation);
    agg.ram_allocation = add_vectors(&record.ram_allocation, &agg.ram_allocation);
    agg.gpu_allocation = add_vectors(&record.gpu_request, &agg.gpu_allocation);

    agg.cpu_request_vector = add_vectors(&record.cpu_request, &agg.cpu_request_vector);
    agg.ram_request_vector = add_vectors(&record.ram_request, &agg.ram_request_vector);

    let prices = price_record(provider, record, rate, discount, idle_coefficient);
    agg.cpu_cost_vector = add_vectors(&prices.cpu, &agg.cpu_cost_vector);
    agg.ram_cost_vector = add_vectors(&prices.ram, &agg.ram_cost_vector);
    agg.gpu_cost_vector = add_vectors(&prices.gpu, &agg.gpu_cost_vector);
    agg.network_cost_vector = add_vectors(&prices.network, &agg.network_cost_vector);
    for pv in &prices.pv {
        agg.pv_cost_vector = add_vectors(&agg.pv_cost_vector, pv);
    }
}

fn finalize(
    aggregations: &mut HashMap<String, Aggregation>,
    shared_resource_cost: f64,
    options: &AggregationOptions,
) {
    let group_count = aggregations.len();
    if group_count == 0 {
        if shared_resource_cost != 0.0 {
            warn!("Shared cost {:.4} has no groups to be split across", shared_resource_cost);
        }
        return;
    }

    let shared_per_group = shared_resource_cost / group_count as f64;
    let sample_count = options.expected_sample_count;

    for agg in aggregations.values_mut() {
        agg.cpu_cost = total_vector(&agg.cpu_cost_vector);
        agg.ram_cost = total_vector(&agg.ram_cost_vector);
        agg.gpu_cost = total_vector(&agg.gpu_cost_vector);
        agg.pv_cost = total_vector(&agg.pv_cost_vector);
        agg.network_cost = total_vector(&agg.network_cost_vector);
        agg.shared_cost = shared_per_group;

        if options.rate.is_rate() {
            debug!(
                "scaling '{}' costs to '{}' rate by {}",
                agg.environment,
                options.rate.as_code(),
                sample_count
            );

            if sample_count > 0 {
                let n = sample_count as f64;
                agg.cpu_cost /= n;
                agg.ram_cost /= n;
                agg.gpu_cost /= n;
                agg.pv_cost /= n;
                agg.network_cost /= n;
                agg.shared_cost /= n;
            }
        }

        agg.total_cost =
            agg.cpu_cost + agg.ram_cost + agg.gpu_cost + agg.pv_cost + agg.network_cost + agg.shared_cost;

        if !options.include_time_series {
            agg.clear_time_series();
        }
    }
}

fn effective_discount(options: &AggregationOptions) -> f64 {
    // range validation lets NaN through
    if !options.discount.is_finite() {
        warn!("Discount {} is not a number, using 0.0", options.discount);
        return 0.0;
    }
    if let Err(err) = options.validate() {
        warn!("Invalid aggregation options, clamping discount {}: {}", options.discount, err);
        return options.discount.clamp(0.0, 1.0);
    }
    options.discount
}

fn effective_idle_coefficient(idle_coefficient: f64) -> f64 {
    if idle_coefficient == 0.0 || !idle_coefficient.is_finite() {
        warn!("Idle coefficient {} is unusable, using 1.0", idle_coefficient);
        return 1.0;
    }
    idle_coefficient
}
