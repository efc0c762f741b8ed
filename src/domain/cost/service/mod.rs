pub mod aggregation_service;
pub mod idle_coefficient_service;
pub mod pricing_service;
pub mod shared_resource_service;
