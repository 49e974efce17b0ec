//! Authentication and authorization boundary for `marketdesk`.
//!
//! Decoupled from HTTP and storage: the API hands in a bearer token and gets
//! back verified claims, then asks `authorize` about permissions.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::{PrincipalId, TenantMembership};
pub use roles::{Role, permissions_for_roles};
