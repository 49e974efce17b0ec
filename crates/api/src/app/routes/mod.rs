use axum::{Router, routing::get};

pub mod brands;
pub mod products;
pub mod system;
pub mod tenants;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/tenants", tenants::router())
        .nest("/brands", brands::router())
        .nest("/products", products::router())
}
