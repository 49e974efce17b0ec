//! Brand use cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use validator::Validate;

use marketdesk_core::{Request, RequestError, RequestHandler, TenantKey};
use marketdesk_events::{EventBus, EventEnvelope};

use crate::{Brand, BrandCreated, BrandDto, BrandId, BrandRepository};

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreateBrandRequest {
    pub tenant: TenantKey,

    #[validate(
        custom(function = "marketdesk_core::validation::not_blank", message = "'Name' must not be empty."),
        length(max = 75, message = "'Name' must be 75 characters or fewer.")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "'Description' must be 1000 characters or fewer."))]
    pub description: Option<String>,
}

impl Request for CreateBrandRequest {
    type Response = BrandId;
}

/// Saves a new brand, then announces it with `BrandCreated`.
pub struct CreateBrandHandler<R: ?Sized, B> {
    brands: Arc<R>,
    bus: B,
}

impl<R: ?Sized, B> CreateBrandHandler<R, B> {
    pub fn new(brands: Arc<R>, bus: B) -> Self {
        Self { brands, bus }
    }
}

#[async_trait]
impl<R, B> RequestHandler<CreateBrandRequest> for CreateBrandHandler<R, B>
where
    R: BrandRepository + ?Sized,
    B: EventBus<EventEnvelope>,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.tenant))]
    async fn handle(&self, request: CreateBrandRequest) -> Result<BrandId, RequestError> {
        let brand = Brand::new(BrandId::new(), request.tenant, request.name, request.description);
        let event = BrandCreated::new(&brand, Utc::now());
        let id = brand.brand_id();

        self.brands.add(brand).await?;
        self.brands.save_changes().await?;

        let envelope = EventEnvelope::wrap(event.tenant().clone(), id.0, &event)
            .map_err(|e| RequestError::Publish(e.to_string()))?;
        self.bus
            .publish(envelope)
            .map_err(|e| RequestError::Publish(e.to_string()))?;

        tracing::info!(brand_id = %id, "brand created");
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct GetBrandRequest {
    pub tenant: TenantKey,
    pub id: BrandId,
}

impl Request for GetBrandRequest {
    type Response = BrandDto;
}

pub struct GetBrandHandler<R: ?Sized> {
    brands: Arc<R>,
}

impl<R: ?Sized> GetBrandHandler<R> {
    pub fn new(brands: Arc<R>) -> Self {
        Self { brands }
    }
}

#[async_trait]
impl<R> RequestHandler<GetBrandRequest> for GetBrandHandler<R>
where
    R: BrandRepository + ?Sized,
{
    async fn handle(&self, request: GetBrandRequest) -> Result<BrandDto, RequestError> {
        match self.brands.get(&request.tenant, request.id).await? {
            Some(brand) => Ok(BrandDto::from(&brand)),
            None => Err(RequestError::not_found(format!("Brand {} Not Found.", request.id))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ListBrandsRequest {
    pub tenant: TenantKey,
}

impl Request for ListBrandsRequest {
    type Response = Vec<BrandDto>;
}

pub struct ListBrandsHandler<R: ?Sized> {
    brands: Arc<R>,
}

impl<R: ?Sized> ListBrandsHandler<R> {
    pub fn new(brands: Arc<R>) -> Self {
        Self { brands }
    }
}

#[async_trait]
impl<R> RequestHandler<ListBrandsRequest> for ListBrandsHandler<R>
where
    R: BrandRepository + ?Sized,
{
    async fn handle(&self, request: ListBrandsRequest) -> Result<Vec<BrandDto>, RequestError> {
        let mut brands = self.brands.list(&request.tenant).await?;
        brands.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(brands.iter().map(BrandDto::from).collect())
    }
}
