use std::collections::HashSet;

use thiserror::Error;

use marketdesk_core::TenantKey;

use crate::{Permission, PrincipalId, TenantMembership};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub active_tenant: TenantKey,
    pub membership: TenantMembership,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: operation requires the root tenant")]
    RootTenantRequired,
}

/// Authorize a principal within its active tenant. Pure policy check, no IO.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_tenant != principal.membership.tenant {
        return Err(AuthzError::TenantMismatch);
    }

    let perms: HashSet<&str> = principal
        .membership
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

impl Principal {
    /// Tenant management is reserved to callers acting in the root tenant.
    pub fn require_root(&self) -> Result<(), AuthzError> {
        if self.active_tenant.is_root() {
            Ok(())
        } else {
            Err(AuthzError::RootTenantRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn principal(tenant: &str, member_of: &str, permissions: Vec<Permission>) -> Principal {
        Principal {
            principal_id: PrincipalId::new(),
            active_tenant: TenantKey::new(tenant).unwrap(),
            membership: TenantMembership {
                tenant: TenantKey::new(member_of).unwrap(),
                roles: vec![Role::new("test")],
                permissions,
            },
        }
    }

    #[test]
    fn wildcard_allows_everything() {
        let p = principal("acme", "acme", vec![Permission::WILDCARD]);
        assert!(authorize(&p, &Permission::BRANDS_CREATE).is_ok());
        assert!(authorize(&p, &Permission::TENANTS_UPGRADE).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let p = principal("acme", "acme", vec![Permission::BRANDS_VIEW]);
        assert_eq!(
            authorize(&p, &Permission::BRANDS_CREATE),
            Err(AuthzError::Forbidden("brands.create".into()))
        );
    }

    #[test]
    fn tenant_mismatch_is_rejected_even_with_wildcard() {
        let p = principal("acme", "globex", vec![Permission::WILDCARD]);
        assert_eq!(authorize(&p, &Permission::BRANDS_VIEW), Err(AuthzError::TenantMismatch));
    }

    #[test]
    fn root_check() {
        assert!(principal("root", "root", vec![]).require_root().is_ok());
        assert_eq!(
            principal("acme", "acme", vec![]).require_root(),
            Err(AuthzError::RootTenantRequired)
        );
    }
}
