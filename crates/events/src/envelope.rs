use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use marketdesk_core::{EntityId, TenantKey};

use crate::Event;

/// Envelope for an event, containing tenant + source metadata.
///
/// This is the unit published on an `EventBus`. The payload is JSON so a
/// single bus can carry every event type; consumers match on `event_type`
/// before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E = JsonValue> {
    event_id: Uuid,
    tenant: TenantKey,

    /// Entity the event is about (e.g. the created brand).
    entity_id: EntityId,

    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,

    payload: E,
}

impl EventEnvelope<JsonValue> {
    /// Wrap a typed event for publication.
    pub fn wrap<E: Event>(
        tenant: TenantKey,
        entity_id: EntityId,
        event: &E,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: Uuid::now_v7(),
            tenant,
            entity_id,
            event_type: event.event_type().to_string(),
            event_version: event.version(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// Decode the payload back into a typed event.
    pub fn decode<E: Event + serde::de::DeserializeOwned>(&self) -> Result<E, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

impl<E> EventEnvelope<E> {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tenant(&self) -> &TenantKey {
        &self.tenant
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
