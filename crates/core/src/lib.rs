//! Domain foundation building blocks shared by every `marketdesk` crate.
//!
//! Identifiers, the domain error model, and the request/validator/handler
//! triad every use case in the workspace is built from. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod repository;
pub mod request;
pub mod validation;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, RequestError};
pub use id::{EntityId, TenantKey};
pub use repository::{RepositoryError, RepositoryResult};
pub use request::{Pipeline, Request, RequestHandler};
pub use validation::{DeriveValidator, FieldError, RequestValidator, ValidationErrors, validate_request};
