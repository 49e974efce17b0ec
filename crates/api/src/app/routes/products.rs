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
    BrandId, CreateProductHandler, CreateProductRequest, GetProductDetailsHandler,
    GetProductDetailsRequest, ListProductsHandler, ListProductsRequest, ProductId,
};
use marketdesk_core::{EntityId, Pipeline};

use crate::app::dto::{CreateProductBody, Created, Items};
use crate::app::errors::ApiError;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::require;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<CreateProductBody>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::PRODUCTS_CREATE)?;

    let handler = CreateProductHandler::new(services.products(), services.brands());
    let id = Pipeline::validated(handler)
        .send(CreateProductRequest {
            tenant: tenant.tenant().clone(),
            name: body.name,
            description: body.description,
            rate: body.rate,
            image_path: body.image_path,
            brand_id: BrandId(EntityId::from_uuid(body.brand_id)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(Created { id: *id.0.as_uuid() })).into_response())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::PRODUCTS_VIEW)?;

    let items = Pipeline::validated(ListProductsHandler::new(services.products(), services.brands()))
        .send(ListProductsRequest {
            tenant: tenant.tenant().clone(),
        })
        .await?;

    Ok(Json(Items { items }).into_response())
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    require(&tenant, &principal, &Permission::PRODUCTS_VIEW)?;
    let id: ProductId = id.parse().map_err(|_| ApiError::InvalidId("product"))?;

    let handler = GetProductDetailsHandler::new(services.products(), services.brands());
    let dto = Pipeline::validated(handler)
        .send(GetProductDetailsRequest {
            tenant: tenant.tenant().clone(),
            id,
        })
        .await?;

    Ok(Json(dto).into_response())
}
