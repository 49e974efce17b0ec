use chrono::{DateTime, Utc};
use serde::Serialize;

/// A domain event.
///
/// Events are facts: build them once, never mutate them. Every event has a
/// stable type name and schema version so consumers can decode the JSON
/// payload carried by an `EventEnvelope`.
pub trait Event: Serialize + Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "catalog.brand.created").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
