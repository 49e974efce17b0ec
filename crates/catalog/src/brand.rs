use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketdesk_core::{EntityId, Entity, TenantKey};
use marketdesk_events::Event;

use crate::dto::BrandDto;

/// Brand identifier (tenant-scoped via the owning `Brand`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub EntityId);

impl BrandId {
    pub fn new() -> Self {
        Self(EntityId::new())
    }
}

impl Default for BrandId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for BrandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for BrandId {
    type Err = marketdesk_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    id: BrandId,
    tenant: TenantKey,
    name: String,
    description: Option<String>,
}

impl Brand {
    pub fn new(
        id: BrandId,
        tenant: TenantKey,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            tenant,
            name: name.into(),
            description,
        }
    }

    pub fn brand_id(&self) -> BrandId {
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
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Event: a brand was created.
///
/// Carries a snapshot of the brand as it was at creation. Built once from the
/// created entity and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCreated {
    tenant: TenantKey,
    brand: BrandDto,
    occurred_at: DateTime<Utc>,
}

impl BrandCreated {
    pub const EVENT_TYPE: &'static str = "catalog.brand.created";

    pub fn new(brand: &Brand, occurred_at: DateTime<Utc>) -> Self {
        Self {
            tenant: brand.tenant().clone(),
            brand: BrandDto::from(brand),
            occurred_at,
        }
    }

    pub fn tenant(&self) -> &TenantKey {
        &self.tenant
    }

    pub fn brand(&self) -> &BrandDto {
        &self.brand
    }
}

impl Event for BrandCreated {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
