//! Infrastructure layer: configuration, storage adapters, startup seeding.

pub mod config;
pub mod memory;
pub mod postgres;
pub mod seed;

pub use config::{AppConfig, ConfigError};
pub use memory::{InMemoryBrandRepository, InMemoryProductRepository, InMemoryStores, InMemoryTenantRepository};
pub use postgres::{PostgresBrandRepository, PostgresProductRepository, PostgresStores, PostgresTenantRepository, run_migrations};
pub use seed::seed_root_tenant;
