use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use marketdesk_auth::JwtValidator;

use crate::app::errors::{ApiError, json_error};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub const TENANT_INACTIVE: &str = "Tenant is not Active. Please contact the Application Administrator.";
pub const TENANT_EXPIRED: &str =
    "Tenant Validity Has Expired. Please contact the Application Administrator.";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub services: AppServices,
}

/// Verify the bearer token, resolve its tenant, and attach both contexts.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).map_err(IntoResponse::into_response)?;

    let now = Utc::now();
    let claims = state.jwt.validate(token, now).map_err(|e| {
        tracing::debug!("token rejected: {e}");
        StatusCode::UNAUTHORIZED.into_response()
    })?;

    let tenant = state
        .services
        .tenants()
        .get_by_key(&claims.tenant)
        .await
        .map_err(|e| ApiError::from(marketdesk_core::RequestError::from(e)).into_response())?
        .ok_or_else(|| {
            tracing::debug!(tenant = %claims.tenant, "token names an unknown tenant");
            StatusCode::UNAUTHORIZED.into_response()
        })?;

    if !tenant.key().is_root() {
        if !tenant.is_active() {
            return Err(json_error(StatusCode::FORBIDDEN, "tenant_inactive", TENANT_INACTIVE));
        }
        if tenant.is_expired_at(now) {
            return Err(json_error(StatusCode::FORBIDDEN, "tenant_expired", TENANT_EXPIRED));
        }
    }

    req.extensions_mut().insert(TenantContext::new(claims.tenant));
    req.extensions_mut()
        .insert(PrincipalContext::new(claims.sub, claims.roles));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(extract_bearer(&headers("Basic abc")), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(extract_bearer(&headers("Bearer   ")), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
    }
}
