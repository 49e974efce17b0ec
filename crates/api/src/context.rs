use marketdesk_auth::{PrincipalId, Role};
use marketdesk_core::TenantKey;

/// Tenant the current request acts within, taken from the verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant: TenantKey,
}

impl TenantContext {
    pub fn new(tenant: TenantKey) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> &TenantKey {
        &self.tenant
    }
}

/// Principal context for a request (authenticated identity + roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: Vec<Role>) -> Self {
        Self { principal_id, roles }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}
