//! In-memory stores for tests/dev.
//!
//! `InMemoryStores` owns the committed data and hands out per-request
//! repositories. Each repository stages its own writes; `save_changes` applies
//! them to the shared store in one step, and dropping the repository discards
//! whatever was not saved.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use marketdesk_catalog::{Brand, BrandId, BrandRepository, Product, ProductId, ProductRepository};
use marketdesk_core::{RepositoryError, RepositoryResult, TenantKey};
use marketdesk_multitenancy::{Tenant, TenantRepository};

type Shared<T> = Arc<RwLock<T>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStores {
    tenants: Shared<BTreeMap<TenantKey, Tenant>>,
    brands: Shared<HashMap<(TenantKey, BrandId), Brand>>,
    products: Shared<HashMap<(TenantKey, ProductId), Product>>,
}

impl InMemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tenants(&self) -> InMemoryTenantRepository {
        InMemoryTenantRepository {
            committed: self.tenants.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }

    pub fn brands(&self) -> InMemoryBrandRepository {
        InMemoryBrandRepository {
            committed: self.brands.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }

    pub fn products(&self) -> InMemoryProductRepository {
        InMemoryProductRepository {
            committed: self.products.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }
}

fn take_staged<T>(staged: &Mutex<Vec<T>>) -> RepositoryResult<Vec<T>> {
    let mut guard = staged.lock().map_err(|_| RepositoryError::Poisoned)?;
    Ok(std::mem::take(&mut *guard))
}

fn stage<T>(staged: &Mutex<Vec<T>>, value: T) -> RepositoryResult<()> {
    staged
        .lock()
        .map_err(|_| RepositoryError::Poisoned)?
        .push(value);
    Ok(())
}

#[derive(Debug)]
enum TenantChange {
    Insert(Tenant),
    Update(Tenant),
}

#[derive(Debug)]
pub struct InMemoryTenantRepository {
    committed: Shared<BTreeMap<TenantKey, Tenant>>,
    staged: Mutex<Vec<TenantChange>>,
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn get_by_key(&self, key: &TenantKey) -> RepositoryResult<Option<Tenant>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Tenant>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }

    async fn add(&self, tenant: Tenant) -> RepositoryResult<()> {
        stage(&self.staged, TenantChange::Insert(tenant))
    }

    async fn update(&self, tenant: Tenant) -> RepositoryResult<()> {
        stage(&self.staged, TenantChange::Update(tenant))
    }

    /// All staged changes apply or none do.
    async fn save_changes(&self) -> RepositoryResult<()> {
        let changes = take_staged(&self.staged)?;
        if changes.is_empty() {
            return Ok(());
        }

        let mut map = self.committed.write().map_err(|_| RepositoryError::Poisoned)?;
        let mut next = map.clone();
        for change in changes {
            match change {
                TenantChange::Insert(t) => {
                    if next.contains_key(t.key()) {
                        return Err(RepositoryError::duplicate(format!(
                            "tenant key '{}'",
                            t.key()
                        )));
                    }
                    next.insert(t.key().clone(), t);
                }
                TenantChange::Update(t) => {
                    if !next.contains_key(t.key()) {
                        return Err(RepositoryError::database(format!(
                            "update of missing tenant '{}'",
                            t.key()
                        )));
                    }
                    next.insert(t.key().clone(), t);
                }
            }
        }
        *map = next;
        tracing::debug!(tenants = map.len(), "tenant changes committed");
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryBrandRepository {
    committed: Shared<HashMap<(TenantKey, BrandId), Brand>>,
    staged: Mutex<Vec<Brand>>,
}

#[async_trait]
impl BrandRepository for InMemoryBrandRepository {
    async fn get(&self, tenant: &TenantKey, id: BrandId) -> RepositoryResult<Option<Brand>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(&(tenant.clone(), id)).cloned())
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Brand>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map
            .iter()
            .filter(|((t, _), _)| t == tenant)
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn add(&self, brand: Brand) -> RepositoryResult<()> {
        stage(&self.staged, brand)
    }

    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged = take_staged(&self.staged)?;
        let mut map = self.committed.write().map_err(|_| RepositoryError::Poisoned)?;
        for brand in staged {
            map.insert((brand.tenant().clone(), brand.brand_id()), brand);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryProductRepository {
    committed: Shared<HashMap<(TenantKey, ProductId), Product>>,
    staged: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, tenant: &TenantKey, id: ProductId) -> RepositoryResult<Option<Product>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(&(tenant.clone(), id)).cloned())
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Product>> {
        let map = self.committed.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map
            .iter()
            .filter(|((t, _), _)| t == tenant)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn add(&self, product: Product) -> RepositoryResult<()> {
        stage(&self.staged, product)
    }

    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged = take_staged(&self.staged)?;
        let mut map = self.committed.write().map_err(|_| RepositoryError::Poisoned)?;
        for product in staged {
            map.insert((product.tenant().clone(), product.product_id()), product);
        }
        Ok(())
    }
}
