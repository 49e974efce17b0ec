//! Postgres-backed repositories.
//!
//! Same unit-of-work shape as the in-memory stores: writes are buffered in the
//! repository and `save_changes` flushes them inside one transaction, so a
//! failure part-way leaves the database untouched.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL code | RepositoryError |
//! |------------|-----------------|-----------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any | `Database` |
//! | ColumnDecode / Decode | N/A | `Serialization` |
//! | Other | N/A | `Database` |

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use marketdesk_catalog::{Brand, BrandId, BrandRepository, Product, ProductId, ProductRepository};
use marketdesk_core::{EntityId, RepositoryError, RepositoryResult, TenantKey};
use marketdesk_multitenancy::{Tenant, TenantRecord, TenantRepository};

const SCHEMA: &str = include_str!("../../../migrations/0001_init.sql");

/// Apply the schema. Every statement is idempotent (`IF NOT EXISTS`).
pub async fn run_migrations(pool: &PgPool) -> RepositoryResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("run_migrations", e))?;
    tracing::info!("database schema up to date");
    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                RepositoryError::duplicate(format!("{operation}: {}", db_err.message()))
            } else {
                RepositoryError::database(format!("database error in {operation}: {}", db_err.message()))
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::serialization(format!("decode error in {operation}: {err}"))
        }
        other => RepositoryError::database(format!("sqlx error in {operation}: {other}")),
    }
}

fn stage<T>(staged: &Mutex<Vec<T>>, value: T) -> RepositoryResult<()> {
    staged
        .lock()
        .map_err(|_| RepositoryError::Poisoned)?
        .push(value);
    Ok(())
}

fn take_staged<T>(staged: &Mutex<Vec<T>>) -> RepositoryResult<Vec<T>> {
    let mut guard = staged.lock().map_err(|_| RepositoryError::Poisoned)?;
    Ok(std::mem::take(&mut *guard))
}

fn tenant_key(raw: String) -> RepositoryResult<TenantKey> {
    TenantKey::new(raw).map_err(|e| RepositoryError::serialization(e.to_string()))
}

/// Connection pool plus per-request repository factory.
#[derive(Debug, Clone)]
pub struct PostgresStores {
    pool: Arc<PgPool>,
}

impl PostgresStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    pub async fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn tenants(&self) -> PostgresTenantRepository {
        PostgresTenantRepository {
            pool: self.pool.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }

    pub fn brands(&self) -> PostgresBrandRepository {
        PostgresBrandRepository {
            pool: self.pool.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }

    pub fn products(&self) -> PostgresProductRepository {
        PostgresProductRepository {
            pool: self.pool.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }
}

enum TenantChange {
    Insert(TenantRecord),
    Update(TenantRecord),
}

pub struct PostgresTenantRepository {
    pool: Arc<PgPool>,
    staged: Mutex<Vec<TenantChange>>,
}

fn tenant_from_row(row: &PgRow) -> Result<Tenant, RepositoryError> {
    let decode = |e| map_sqlx_error("decode_tenant", e);
    Ok(Tenant::from_record(TenantRecord {
        key: tenant_key(row.try_get("key").map_err(decode)?)?,
        name: row.try_get("name").map_err(decode)?,
        admin_email: row.try_get("admin_email").map_err(decode)?,
        connection_string: row.try_get("connection_string").map_err(decode)?,
        is_active: row.try_get("is_active").map_err(decode)?,
        valid_upto: row.try_get::<DateTime<Utc>, _>("valid_upto").map_err(decode)?,
        issuer: row.try_get("issuer").map_err(decode)?,
    }))
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    #[instrument(skip(self), fields(tenant = %key), err)]
    async fn get_by_key(&self, key: &TenantKey) -> RepositoryResult<Option<Tenant>> {
        let row = sqlx::query(
            r#"
            SELECT key, name, admin_email, connection_string, is_active, valid_upto, issuer
            FROM tenants
            WHERE key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_tenant", e))?;

        row.as_ref().map(tenant_from_row).transpose()
    }

    async fn list(&self) -> RepositoryResult<Vec<Tenant>> {
        let rows = sqlx::query(
            r#"
            SELECT key, name, admin_email, connection_string, is_active, valid_upto, issuer
            FROM tenants
            ORDER BY key ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_tenants", e))?;

        rows.iter().map(tenant_from_row).collect()
    }

    async fn add(&self, tenant: Tenant) -> RepositoryResult<()> {
        stage(&self.staged, TenantChange::Insert(tenant.to_record()))
    }

    async fn update(&self, tenant: Tenant) -> RepositoryResult<()> {
        stage(&self.staged, TenantChange::Update(tenant.to_record()))
    }

    #[instrument(skip(self), err)]
    async fn save_changes(&self) -> RepositoryResult<()> {
        let changes = take_staged(&self.staged)?;
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for change in &changes {
            match change {
                TenantChange::Insert(t) => {
                    sqlx::query(
                        r#"
                        INSERT INTO tenants (key, name, admin_email, connection_string, is_active, valid_upto, issuer)
                        VALUES ($1, $2, $3, $4, $5, $6, $7)
                        "#,
                    )
                    .bind(t.key.as_str())
                    .bind(&t.name)
                    .bind(&t.admin_email)
                    .bind(&t.connection_string)
                    .bind(t.is_active)
                    .bind(t.valid_upto)
                    .bind(&t.issuer)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("insert_tenant", e))?;
                }
                TenantChange::Update(t) => {
                    let result = sqlx::query(
                        r#"
                        UPDATE tenants
                        SET name = $2, admin_email = $3, connection_string = $4,
                            is_active = $5, valid_upto = $6, issuer = $7
                        WHERE key = $1
                        "#,
                    )
                    .bind(t.key.as_str())
                    .bind(&t.name)
                    .bind(&t.admin_email)
                    .bind(&t.connection_string)
                    .bind(t.is_active)
                    .bind(t.valid_upto)
                    .bind(&t.issuer)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("update_tenant", e))?;

                    if result.rows_affected() != 1 {
                        tx.rollback()
                            .await
                            .map_err(|e| map_sqlx_error("rollback", e))?;
                        return Err(RepositoryError::database(format!(
                            "update of missing tenant '{}'",
                            t.key
                        )));
                    }
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        tracing::debug!(changes = changes.len(), "tenant changes committed");
        Ok(())
    }
}

pub struct PostgresBrandRepository {
    pool: Arc<PgPool>,
    staged: Mutex<Vec<Brand>>,
}

fn brand_from_row(row: &PgRow) -> Result<Brand, RepositoryError> {
    let decode = |e| map_sqlx_error("decode_brand", e);
    Ok(Brand::new(
        BrandId(EntityId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?)),
        tenant_key(row.try_get("tenant_key").map_err(decode)?)?,
        row.try_get::<String, _>("name").map_err(decode)?,
        row.try_get("description").map_err(decode)?,
    ))
}

#[async_trait]
impl BrandRepository for PostgresBrandRepository {
    #[instrument(skip(self), fields(tenant = %tenant, brand_id = %id), err)]
    async fn get(&self, tenant: &TenantKey, id: BrandId) -> RepositoryResult<Option<Brand>> {
        let row = sqlx::query(
            "SELECT tenant_key, id, name, description FROM brands WHERE tenant_key = $1 AND id = $2",
        )
        .bind(tenant.as_str())
        .bind(id.0.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_brand", e))?;

        row.as_ref().map(brand_from_row).transpose()
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Brand>> {
        let rows = sqlx::query(
            "SELECT tenant_key, id, name, description FROM brands WHERE tenant_key = $1 ORDER BY name",
        )
        .bind(tenant.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_brands", e))?;

        rows.iter().map(brand_from_row).collect()
    }

    async fn add(&self, brand: Brand) -> RepositoryResult<()> {
        stage(&self.staged, brand)
    }

    #[instrument(skip(self), err)]
    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged = take_staged(&self.staged)?;
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for brand in &staged {
            sqlx::query("INSERT INTO brands (tenant_key, id, name, description) VALUES ($1, $2, $3, $4)")
                .bind(brand.tenant().as_str())
                .bind(brand.brand_id().0.as_uuid())
                .bind(brand.name())
                .bind(brand.description())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_brand", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}

pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
    staged: Mutex<Vec<Product>>,
}

fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    let decode = |e| map_sqlx_error("decode_product", e);
    Product::new(
        ProductId(EntityId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?)),
        tenant_key(row.try_get("tenant_key").map_err(decode)?)?,
        row.try_get::<String, _>("name").map_err(decode)?,
        row.try_get("description").map_err(decode)?,
        row.try_get::<Decimal, _>("rate").map_err(decode)?,
        row.try_get("image_path").map_err(decode)?,
        BrandId(EntityId::from_uuid(row.try_get::<Uuid, _>("brand_id").map_err(decode)?)),
    )
    .map_err(|e| RepositoryError::serialization(e.to_string()))
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), fields(tenant = %tenant, product_id = %id), err)]
    async fn get(&self, tenant: &TenantKey, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT tenant_key, id, name, description, rate, image_path, brand_id
            FROM products
            WHERE tenant_key = $1 AND id = $2
            "#,
        )
        .bind(tenant.as_str())
        .bind(id.0.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT tenant_key, id, name, description, rate, image_path, brand_id
            FROM products
            WHERE tenant_key = $1
            ORDER BY name
            "#,
        )
        .bind(tenant.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    async fn add(&self, product: Product) -> RepositoryResult<()> {
        stage(&self.staged, product)
    }

    #[instrument(skip(self), err)]
    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged = take_staged(&self.staged)?;
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for product in &staged {
            sqlx::query(
                r#"
                INSERT INTO products (tenant_key, id, name, description, rate, image_path, brand_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(product.tenant().as_str())
            .bind(product.product_id().0.as_uuid())
            .bind(product.name())
            .bind(product.description())
            .bind(product.rate())
            .bind(product.image_path())
            .bind(product.brand_id().0.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_product", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}
