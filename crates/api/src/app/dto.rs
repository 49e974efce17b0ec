//! HTTP request bodies and response envelopes.
//!
//! Bodies never carry the tenant: catalog requests get it from the token.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpgradeSubscriptionBody {
    #[serde(deserialize_with = "marketdesk_multitenancy::upgrade_subscription::deserialize_expiry")]
    pub extended_expiry_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBrandBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rate: Decimal,
    #[serde(default)]
    pub image_path: Option<String>,
    pub brand_id: Uuid,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct Created<T> {
    pub id: T,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}
