use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use marketdesk_auth::AuthzError;
use marketdesk_core::{DomainError, RepositoryError, RequestError};

/// Everything a route can fail with, mapped onto one JSON error shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("invalid {0} id")]
    InvalidId(&'static str),

    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Request(e) => request_error_to_response(e),
            ApiError::Authz(e) => {
                tracing::warn!("forbidden: {e}");
                json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
            }
            ApiError::InvalidId(what) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
            }
            ApiError::Body(rejection) => {
                tracing::debug!("request body rejected: {rejection}");
                json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
            }
        }
    }
}

pub fn request_error_to_response(err: RequestError) -> Response {
    match err {
        RequestError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": errors.to_string(),
                "errors": errors,
            })),
        )
            .into_response(),
        RequestError::Domain(e) => domain_error_to_response(e),
        RequestError::Repository(RepositoryError::Duplicate(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        RequestError::Repository(e) => {
            tracing::error!("repository failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", e.to_string())
        }
        RequestError::Publish(msg) => {
            tracing::error!("event publish failed: {msg}");
            json_error(StatusCode::BAD_GATEWAY, "publish_error", msg)
        }
    }
}

/// Not-found, conflict and invariant messages are user-facing and sent verbatim.
fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Validation(_) | DomainError::InvalidId(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", message),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketdesk_core::ValidationErrors;

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::from(RequestError::not_found("Tenant Not Found.")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn status_per_error_kind() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "'Name' must not be empty.");
        let cases = [
            (RequestError::Validation(errors), StatusCode::BAD_REQUEST),
            (DomainError::conflict("dup").into(), StatusCode::CONFLICT),
            (DomainError::invariant("no").into(), StatusCode::UNPROCESSABLE_ENTITY),
            (RepositoryError::duplicate("tenant key 'acme'").into(), StatusCode::CONFLICT),
            (
                RepositoryError::Poisoned.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RequestError::Publish("down".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(request_error_to_response(err).status(), status);
        }
        assert_eq!(
            ApiError::from(AuthzError::RootTenantRequired).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
