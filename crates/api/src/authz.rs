//! Route-side authorization guard, checked before a request is sent.

use marketdesk_auth::{AuthzError, Permission, Principal, TenantMembership, authorize, permissions_for_roles};

use crate::context::{PrincipalContext, TenantContext};

fn resolve(tenant: &TenantContext, principal: &PrincipalContext) -> Principal {
    Principal {
        principal_id: principal.principal_id(),
        active_tenant: tenant.tenant().clone(),
        membership: TenantMembership {
            tenant: tenant.tenant().clone(),
            roles: principal.roles().to_vec(),
            permissions: permissions_for_roles(principal.roles()),
        },
    }
}

/// Require `permission` within the caller's tenant.
pub fn require(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    permission: &Permission,
) -> Result<(), AuthzError> {
    authorize(&resolve(tenant, principal), permission)
}

/// Require `permission` and that the caller acts within the root tenant.
pub fn require_root(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    permission: &Permission,
) -> Result<(), AuthzError> {
    let principal = resolve(tenant, principal);
    principal.require_root()?;
    authorize(&principal, permission)
}
