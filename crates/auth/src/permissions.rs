use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier, e.g. `"brands.create"`.
///
/// `"*"` is the wildcard granted to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission::from_static("*");

    pub const TENANTS_CREATE: Permission = Permission::from_static("tenants.create");
    pub const TENANTS_VIEW: Permission = Permission::from_static("tenants.view");
    pub const TENANTS_UPDATE: Permission = Permission::from_static("tenants.update");
    pub const TENANTS_UPGRADE: Permission = Permission::from_static("tenants.upgrade");

    pub const BRANDS_CREATE: Permission = Permission::from_static("brands.create");
    pub const BRANDS_VIEW: Permission = Permission::from_static("brands.view");

    pub const PRODUCTS_CREATE: Permission = Permission::from_static("products.create");
    pub const PRODUCTS_VIEW: Permission = Permission::from_static("products.view");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
