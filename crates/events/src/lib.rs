//! Domain events: the event contract, tenant-scoped envelopes, and pub/sub.
//!
//! Events are raised by handlers after their changes are saved and fan out to
//! any number of subscribers (loggers, search indexers, notifications).

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
