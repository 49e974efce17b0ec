//! Creating tenants and switching them on and off.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use marketdesk_core::{DomainError, RepositoryError, Request, RequestError, RequestHandler, TenantKey};

use crate::{TENANT_NOT_FOUND, Tenant, TenantRepository};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(
        custom(function = "marketdesk_core::validation::tenant_key_format"),
        length(max = 64, message = "'Id' must be 64 characters or fewer.")
    )]
    pub id: String,

    #[validate(custom(function = "marketdesk_core::validation::not_blank", message = "'Name' must not be empty."))]
    pub name: String,

    #[validate(email(message = "'Admin Email' is not a valid email address."))]
    pub admin_email: String,

    #[serde(default)]
    pub connection_string: Option<String>,

    #[serde(default)]
    pub issuer: Option<String>,
}

impl Request for CreateTenantRequest {
    type Response = TenantKey;
}

pub struct CreateTenantHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> CreateTenantHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<CreateTenantRequest> for CreateTenantHandler<R>
where
    R: TenantRepository + ?Sized,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.id))]
    async fn handle(&self, request: CreateTenantRequest) -> Result<TenantKey, RequestError> {
        let key = TenantKey::new(request.id)?;

        if self.repository.get_by_key(&key).await?.is_some() {
            return Err(DomainError::conflict(format!("Tenant {key} already exists.")).into());
        }

        let tenant = Tenant::new(
            key.clone(),
            request.name,
            request.admin_email,
            request.connection_string,
            request.issuer,
            Utc::now(),
        );
        let valid_upto = tenant.valid_upto();

        self.repository.add(tenant).await?;
        // A concurrent create can claim the key between the lookup and the commit.
        self.repository.save_changes().await.map_err(|e| match e {
            RepositoryError::Duplicate(_) => {
                RequestError::from(DomainError::conflict(format!("Tenant {key} already exists.")))
            }
            other => other.into(),
        })?;

        tracing::info!(%valid_upto, "tenant created");
        Ok(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ActivateTenantRequest {
    #[validate(custom(
        function = "marketdesk_core::validation::not_blank",
        message = "'Tenant Key' must not be empty."
    ))]
    pub tenant_key: String,
}

impl Request for ActivateTenantRequest {
    type Response = String;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct DeactivateTenantRequest {
    #[validate(custom(
        function = "marketdesk_core::validation::not_blank",
        message = "'Tenant Key' must not be empty."
    ))]
    pub tenant_key: String,
}

impl Request for DeactivateTenantRequest {
    type Response = String;
}

pub struct ActivateTenantHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> ActivateTenantHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

pub struct DeactivateTenantHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> DeactivateTenantHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Load, apply `change`, persist.
async fn change_tenant<R>(
    repository: &R,
    raw_key: &str,
    change: impl FnOnce(&mut Tenant) -> Result<(), DomainError> + Send,
) -> Result<TenantKey, RequestError>
where
    R: TenantRepository + ?Sized,
{
    let key = TenantKey::new(raw_key)?;
    let Some(mut tenant) = repository.get_by_key(&key).await? else {
        return Err(RequestError::not_found(TENANT_NOT_FOUND));
    };
    change(&mut tenant)?;
    repository.update(tenant).await?;
    repository.save_changes().await?;
    Ok(key)
}

#[async_trait]
impl<R> RequestHandler<ActivateTenantRequest> for ActivateTenantHandler<R>
where
    R: TenantRepository + ?Sized,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.tenant_key))]
    async fn handle(&self, request: ActivateTenantRequest) -> Result<String, RequestError> {
        let key = change_tenant(&*self.repository, &request.tenant_key, Tenant::activate).await?;
        tracing::info!("tenant activated");
        Ok(format!("Tenant {key} is now Activated."))
    }
}

#[async_trait]
impl<R> RequestHandler<DeactivateTenantRequest> for DeactivateTenantHandler<R>
where
    R: TenantRepository + ?Sized,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.tenant_key))]
    async fn handle(&self, request: DeactivateTenantRequest) -> Result<String, RequestError> {
        let key = change_tenant(&*self.repository, &request.tenant_key, Tenant::deactivate).await?;
        tracing::info!("tenant deactivated");
        Ok(format!("Tenant {key} is now Deactivated."))
    }
}
