use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Tenant;

/// Transport projection of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDto {
    pub id: String,
    pub name: String,
    pub admin_email: String,
    pub connection_string: Option<String>,
    pub is_active: bool,
    pub valid_upto: DateTime<Utc>,
    pub issuer: Option<String>,
}

impl From<&Tenant> for TenantDto {
    fn from(t: &Tenant) -> Self {
        Self {
            id: t.key().to_string(),
            name: t.name().to_string(),
            admin_email: t.admin_email().to_string(),
            connection_string: t.connection_string().map(str::to_string),
            is_active: t.is_active(),
            valid_upto: t.valid_upto(),
            issuer: t.issuer().map(str::to_string),
        }
    }
}
