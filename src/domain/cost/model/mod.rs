//! Cost engine data model (records, aggregations, sharing policy)

pub mod aggregation;
pub mod cost_record;
pub mod sharing_policy;
