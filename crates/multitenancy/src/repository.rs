use async_trait::async_trait;

use marketdesk_core::{RepositoryResult, TenantKey};

use crate::Tenant;

/// Persistence contract for tenants (implementation lives in infra).
///
/// `add` and `update` only stage a change. Staged changes become visible to
/// other readers once `save_changes` commits them; a repository dropped with
/// staged changes discards them.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn get_by_key(&self, key: &TenantKey) -> RepositoryResult<Option<Tenant>>;

    /// All tenants, ordered by key.
    async fn list(&self) -> RepositoryResult<Vec<Tenant>>;

    async fn add(&self, tenant: Tenant) -> RepositoryResult<()>;

    async fn update(&self, tenant: Tenant) -> RepositoryResult<()>;

    async fn save_changes(&self) -> RepositoryResult<()>;
}
