//! Startup data that must exist before the API accepts requests.

use chrono::Utc;

use marketdesk_core::{RepositoryResult, TenantKey};
use marketdesk_multitenancy::{Tenant, TenantRepository};

/// Create the root tenant if it is missing. Returns whether it was created.
pub async fn seed_root_tenant<R>(repository: &R, admin_email: &str) -> RepositoryResult<bool>
where
    R: TenantRepository + ?Sized,
{
    let key = TenantKey::root();
    if repository.get_by_key(&key).await?.is_some() {
        tracing::debug!("root tenant already present");
        return Ok(false);
    }

    let root = Tenant::new(key, "Root", admin_email, None, None, Utc::now());
    repository.add(root).await?;
    repository.save_changes().await?;
    tracing::info!(admin_email, "root tenant seeded");
    Ok(true)
}
