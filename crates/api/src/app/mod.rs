//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage, event bus and background subscribers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request bodies and response envelopes
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body extractor with JSON rejections

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use marketdesk_core::RepositoryResult;
use marketdesk_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

use services::AppServices;

/// Connect storage, seed the root tenant, start background subscribers and
/// build the full router.
pub async fn build_app(config: &AppConfig) -> RepositoryResult<Router> {
    let services = AppServices::from_config(config).await?;
    if services.seed(&config.root_admin_email).await? {
        tracing::info!(admin_email = %config.root_admin_email, "root tenant created");
    }
    services::spawn_brand_created_logger(&services.bus());
    Ok(router(&config.jwt_secret, services))
}

/// Router over already-built services.
pub fn router(jwt_secret: &str, services: AppServices) -> Router {
    let jwt = Arc::new(marketdesk_auth::Hs256JwtValidator::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        jwt,
        services: services.clone(),
    };

    // Protected routes: require auth + tenant context.
    let protected = routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
