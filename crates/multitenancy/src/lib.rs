//! Tenant management: the `Tenant` entity, its repository contract, and the
//! request/validator/handler triads (create, query, activate, deactivate,
//! upgrade subscription).

pub mod dto;
pub mod lifecycle;
pub mod queries;
pub mod repository;
pub mod tenant;
pub mod upgrade_subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use dto::TenantDto;
pub use lifecycle::{
    ActivateTenantHandler, ActivateTenantRequest, CreateTenantHandler, CreateTenantRequest,
    DeactivateTenantHandler, DeactivateTenantRequest,
};
pub use queries::{GetTenantHandler, GetTenantRequest, ListTenantsHandler, ListTenantsRequest};
pub use repository::TenantRepository;
pub use tenant::{Tenant, TenantRecord, ValidityPolicy, format_validity};
pub use upgrade_subscription::{UpgradeSubscriptionHandler, UpgradeSubscriptionRequest};

/// Message carried by `NotFound` when a tenant key does not resolve.
pub const TENANT_NOT_FOUND: &str = "Tenant Not Found.";
