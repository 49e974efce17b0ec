//! Storage + event bus wiring shared by every route.
//!
//! Repositories are scoped to one request: each call to `tenants()`,
//! `brands()` or `products()` hands out a fresh unit of work over the shared
//! committed state.

use std::sync::Arc;
use std::time::Duration;

use marketdesk_catalog::{BrandCreated, BrandRepository, ProductRepository};
use marketdesk_core::RepositoryResult;
use marketdesk_events::{EventBus, EventEnvelope, InMemoryEventBus};
use marketdesk_infra::config::StorageConfig;
use marketdesk_infra::{AppConfig, InMemoryStores, PostgresStores, run_migrations, seed_root_tenant};
use marketdesk_multitenancy::{TenantRepository, ValidityPolicy};

pub type SharedBus = Arc<InMemoryEventBus<EventEnvelope>>;

#[derive(Debug, Clone)]
enum Storage {
    InMemory(InMemoryStores),
    Postgres(PostgresStores),
}

#[derive(Debug, Clone)]
pub struct AppServices {
    storage: Storage,
    bus: SharedBus,
    validity_policy: ValidityPolicy,
}

impl AppServices {
    pub fn in_memory(validity_policy: ValidityPolicy) -> Self {
        Self {
            storage: Storage::InMemory(InMemoryStores::new()),
            bus: Arc::new(InMemoryEventBus::new()),
            validity_policy,
        }
    }

    /// Connect storage per `config`, applying migrations for Postgres.
    pub async fn from_config(config: &AppConfig) -> RepositoryResult<Self> {
        let storage = match &config.storage {
            StorageConfig::InMemory => {
                tracing::info!("using in-memory stores");
                Storage::InMemory(InMemoryStores::new())
            }
            StorageConfig::Postgres { database_url } => {
                let stores = PostgresStores::connect(database_url).await?;
                run_migrations(stores.pool()).await?;
                tracing::info!("using postgres stores");
                Storage::Postgres(stores)
            }
        };

        Ok(Self {
            storage,
            bus: Arc::new(InMemoryEventBus::new()),
            validity_policy: config.validity_policy,
        })
    }

    pub fn tenants(&self) -> Arc<dyn TenantRepository> {
        match &self.storage {
            Storage::InMemory(s) => Arc::new(s.tenants()),
            Storage::Postgres(s) => Arc::new(s.tenants()),
        }
    }

    pub fn brands(&self) -> Arc<dyn BrandRepository> {
        match &self.storage {
            Storage::InMemory(s) => Arc::new(s.brands()),
            Storage::Postgres(s) => Arc::new(s.brands()),
        }
    }

    pub fn products(&self) -> Arc<dyn ProductRepository> {
        match &self.storage {
            Storage::InMemory(s) => Arc::new(s.products()),
            Storage::Postgres(s) => Arc::new(s.products()),
        }
    }

    pub fn bus(&self) -> SharedBus {
        self.bus.clone()
    }

    pub fn validity_policy(&self) -> ValidityPolicy {
        self.validity_policy
    }

    pub async fn seed(&self, root_admin_email: &str) -> RepositoryResult<bool> {
        seed_root_tenant(&*self.tenants(), root_admin_email).await
    }
}

/// Background subscriber: logs every `BrandCreated` published on the bus.
///
/// Delivery is at-least-once, so this consumer only observes.
pub fn spawn_brand_created_logger(bus: &SharedBus) -> tokio::task::JoinHandle<()> {
    let sub = bus.subscribe();
    tokio::task::spawn_blocking(move || {
        loop {
            match sub.recv_timeout(Duration::from_secs(1)) {
                Ok(env) => {
                    if env.event_type() != BrandCreated::EVENT_TYPE {
                        continue;
                    }
                    match env.decode::<BrandCreated>() {
                        Ok(ev) => tracing::info!(
                            tenant = %ev.tenant(),
                            brand_id = %ev.brand().id,
                            name = %ev.brand().name,
                            event_id = %env.event_id(),
                            "brand created event received"
                        ),
                        Err(e) => tracing::warn!("BrandCreated payload decode failed: {e}"),
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
