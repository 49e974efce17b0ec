use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use marketdesk_auth::Permission;
use marketdesk_catalog::{
    BrandId, CreateBrandHandler, CreateBrandRequest, GetBrandHandler, GetBrandRequest,
    ListBrandsHandler, ListBrandsRequest,
};
use marketdesk_core::Pipeline;

use crate::app::dto::{CreateBrandBody, Created, Items};
use crate::app::errors::ApiError;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::require;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_brand).get(list_brands))
        .route("/:id", get(get_brand))
}

pub async fn create_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<CreateBrandBody>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::BRANDS_CREATE)?;

    let id = Pipeline::validated(CreateBrandHandler::new(services.brands(), services.bus()))
        .send(CreateBrandRequest {
            tenant: tenant.tenant().clone(),
            name: body.name,
            description: body.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(Created { id: *id.0.as_uuid() })).into_response())
}

pub async fn list_brands(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::BRANDS_VIEW)?;

    let items = Pipeline::validated(ListBrandsHandler::new(services.brands()))
        .send(ListBrandsRequest {
            tenant: tenant.tenant().clone(),
        })
        .await?;

    Ok(Json(Items { items }).into_response())
}

pub async fn get_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::BRANDS_VIEW)?;
    let id: BrandId = id.parse().map_err(|_| ApiError::InvalidId("brand"))?;

    let dto = Pipeline::validated(GetBrandHandler::new(services.brands()))
        .send(GetBrandRequest {
            tenant: tenant.tenant().clone(),
            id,
        })
        .await?;

    Ok(Json(dto).into_response())
}
