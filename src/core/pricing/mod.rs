//! Pricing-provider capability and its file-backed implementation.

pub mod custom_pricing_entity;
pub mod custom_pricing_fs_adapter;
pub mod custom_pricing_repository;
pub mod pricing_provider_trait;
