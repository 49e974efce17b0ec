use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// RBAC role name as carried in the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

const CATALOG_MANAGER: &[Permission] = &[
    Permission::BRANDS_CREATE,
    Permission::BRANDS_VIEW,
    Permission::PRODUCTS_CREATE,
    Permission::PRODUCTS_VIEW,
];

const VIEWER: &[Permission] = &[Permission::BRANDS_VIEW, Permission::PRODUCTS_VIEW];

/// Static role -> permission policy.
///
/// `admin` gets the wildcard; `catalog_manager` may create and read catalog
/// entries; `viewer` reads the catalog. Unknown roles grant nothing.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    let mut out: Vec<Permission> = Vec::new();
    for role in roles {
        let granted: &[Permission] = match role.as_str() {
            "admin" => return vec![Permission::WILDCARD],
            "catalog_manager" => CATALOG_MANAGER,
            "viewer" => VIEWER,
            _ => &[],
        };
        for permission in granted {
            if !out.contains(permission) {
                out.push(permission.clone());
            }
        }
    }
    out
}
