use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marketdesk_core::{DomainError, DomainResult, Entity, EntityId, TenantKey};

use crate::BrandId;

/// Product identifier (tenant-scoped via the owning `Product`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new() -> Self {
        Self(EntityId::new())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Decimal places a rate may carry; the `products.rate` column is `NUMERIC(18, 2)`.
pub const RATE_SCALE: u32 = 2;

/// Integer digits a rate may carry in the same column.
const RATE_INTEGER_DIGITS: u32 = 16;

pub const RATE_NEGATIVE: &str = "'Rate' must be greater than or equal to '0'.";
pub const RATE_TOO_PRECISE: &str = "'Rate' must not have more than 2 decimal places.";
pub const RATE_TOO_LARGE: &str = "'Rate' must be less than 10000000000000000.";

/// First rule `rate` breaks, if any.
pub fn rate_violation(rate: &Decimal) -> Option<&'static str> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Some(RATE_NEGATIVE);
    }
    if rate.normalize().scale() > RATE_SCALE {
        return Some(RATE_TOO_PRECISE);
    }
    let limit = Decimal::from(10_u64.pow(RATE_INTEGER_DIGITS));
    if *rate >= limit {
        return Some(RATE_TOO_LARGE);
    }
    None
}

/// `validator` rule over [`rate_violation`].
pub fn validate_rate(rate: &Decimal) -> Result<(), validator::ValidationError> {
    match rate_violation(rate) {
        None => Ok(()),
        Some(message) => {
            let mut err = validator::ValidationError::new("rate");
            err.message = Some(Cow::Borrowed(message));
            Err(err)
        }
    }
}

/// A sellable catalog item belonging to one brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    tenant: TenantKey,
    name: String,
    description: Option<String>,
    rate: Decimal,
    image_path: Option<String>,
    brand_id: BrandId,
}

impl Product {
    /// Build a product. The rate must pass [`rate_violation`].
    pub fn new(
        id: ProductId,
        tenant: TenantKey,
        name: impl Into<String>,
        description: Option<String>,
        rate: Decimal,
        image_path: Option<String>,
        brand_id: BrandId,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(message) = rate_violation(&rate) {
            return Err(DomainError::invariant(message));
        }
        Ok(Self {
            id,
            tenant,
            name,
            description,
            rate,
            image_path,
            brand_id,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.id
    }

    pub fn tenant(&self) -> &TenantKey {
        &self.tenant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
