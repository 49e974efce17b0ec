//! Tenant administration. Every route here requires the root tenant context.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use marketdesk_auth::Permission;
use marketdesk_core::Pipeline;
use marketdesk_multitenancy::{
    ActivateTenantHandler, ActivateTenantRequest, CreateTenantHandler, CreateTenantRequest,
    DeactivateTenantHandler, DeactivateTenantRequest, GetTenantHandler, GetTenantRequest,
    ListTenantsHandler, ListTenantsRequest, UpgradeSubscriptionHandler, UpgradeSubscriptionRequest,
};

use crate::app::dto::{Created, Items, Message, UpgradeSubscriptionBody};
use crate::app::errors::ApiError;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::require_root;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_tenant).get(list_tenants))
        .route("/:key", get(get_tenant))
        .route("/:key/activate", post(activate_tenant))
        .route("/:key/deactivate", post(deactivate_tenant))
        .route("/:key/upgrade", post(upgrade_subscription))
}

pub async fn create_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<CreateTenantRequest>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_CREATE)?;

    let key = Pipeline::validated(CreateTenantHandler::new(services.tenants()))
        .send(body)
        .await?;

    Ok((StatusCode::CREATED, Json(Created { id: key.to_string() })).into_response())
}

pub async fn list_tenants(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_VIEW)?;

    let items = Pipeline::validated(ListTenantsHandler::new(services.tenants()))
        .send(ListTenantsRequest {})
        .await?;

    Ok(Json(Items { items }).into_response())
}

pub async fn get_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_VIEW)?;

    let dto = Pipeline::validated(GetTenantHandler::new(services.tenants()))
        .send(GetTenantRequest { tenant_key: key })
        .await?;

    Ok(Json(dto).into_response())
}

pub async fn activate_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_UPDATE)?;

    let message = Pipeline::validated(ActivateTenantHandler::new(services.tenants()))
        .send(ActivateTenantRequest { tenant_key: key })
        .await?;

    Ok(Json(Message { message }).into_response())
}

pub async fn deactivate_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_UPDATE)?;

    let message = Pipeline::validated(DeactivateTenantHandler::new(services.tenants()))
        .send(DeactivateTenantRequest { tenant_key: key })
        .await?;

    Ok(Json(Message { message }).into_response())
}

pub async fn upgrade_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(key): Path<String>,
    JsonBody(body): JsonBody<UpgradeSubscriptionBody>,
) -> Result<Response, ApiError> {
    require_root(&tenant, &principal, &Permission::TENANTS_UPGRADE)?;

    let handler = UpgradeSubscriptionHandler::new(services.tenants())
        .with_policy(services.validity_policy());
    let message = Pipeline::validated(handler)
        .send(UpgradeSubscriptionRequest {
            tenant_key: key,
            extended_expiry_date: body.extended_expiry_date,
        })
        .await?;

    Ok(Json(Message { message }).into_response())
}
