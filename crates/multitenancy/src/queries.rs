use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use validator::Validate;

use marketdesk_core::{Request, RequestError, RequestHandler, TenantKey};

use crate::{TENANT_NOT_FOUND, TenantDto, TenantRepository};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct GetTenantRequest {
    #[validate(custom(
        function = "marketdesk_core::validation::not_blank",
        message = "'Tenant Key' must not be empty."
    ))]
    pub tenant_key: String,
}

impl Request for GetTenantRequest {
    type Response = TenantDto;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ListTenantsRequest {}

impl Request for ListTenantsRequest {
    type Response = Vec<TenantDto>;
}

pub struct GetTenantHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> GetTenantHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<GetTenantRequest> for GetTenantHandler<R>
where
    R: TenantRepository + ?Sized,
{
    async fn handle(&self, request: GetTenantRequest) -> Result<TenantDto, RequestError> {
        let key = TenantKey::new(request.tenant_key)?;
        match self.repository.get_by_key(&key).await? {
            Some(tenant) => Ok(TenantDto::from(&tenant)),
            None => Err(RequestError::not_found(TENANT_NOT_FOUND)),
        }
    }
}

pub struct ListTenantsHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> ListTenantsHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<ListTenantsRequest> for ListTenantsHandler<R>
where
    R: TenantRepository + ?Sized,
{
    async fn handle(&self, _request: ListTenantsRequest) -> Result<Vec<TenantDto>, RequestError> {
        let mut tenants = self.repository.list().await?;
        tenants.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(tenants.iter().map(TenantDto::from).collect())
    }
}
