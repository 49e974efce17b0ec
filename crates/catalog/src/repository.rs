use async_trait::async_trait;

use marketdesk_core::{RepositoryResult, TenantKey};

use crate::{Brand, BrandId, Product, ProductId};

/// Persistence contract for brands.
///
/// Every read is scoped to a tenant: a brand owned by another tenant is
/// indistinguishable from a missing one. `add` stages; `save_changes` commits.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn get(&self, tenant: &TenantKey, id: BrandId) -> RepositoryResult<Option<Brand>>;

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Brand>>;

    async fn add(&self, brand: Brand) -> RepositoryResult<()>;

    async fn save_changes(&self) -> RepositoryResult<()>;
}

/// Persistence contract for products. Same tenancy and staging rules as
/// `BrandRepository`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get(&self, tenant: &TenantKey, id: ProductId) -> RepositoryResult<Option<Product>>;

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Product>>;

    async fn add(&self, product: Product) -> RepositoryResult<()>;

    async fn save_changes(&self) -> RepositoryResult<()>;
}
