//! Simple staged repositories for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use marketdesk_core::{RepositoryResult, TenantKey};

use crate::{Brand, BrandId, BrandRepository, Product, ProductId, ProductRepository};

#[derive(Default)]
pub struct StagedBrands {
    committed: Mutex<HashMap<BrandId, Brand>>,
    staged: Mutex<Vec<Brand>>,
}

impl StagedBrands {
    pub fn with(brands: impl IntoIterator<Item = Brand>) -> Self {
        let repo = Self::default();
        repo.committed
            .lock()
            .unwrap()
            .extend(brands.into_iter().map(|b| (b.brand_id(), b)));
        repo
    }

    pub fn committed_len(&self) -> usize {
        self.committed.lock().unwrap().len()
    }
}

#[async_trait]
impl BrandRepository for StagedBrands {
    async fn get(&self, tenant: &TenantKey, id: BrandId) -> RepositoryResult<Option<Brand>> {
        let map = self.committed.lock().unwrap();
        Ok(map.get(&id).filter(|b| b.tenant() == tenant).cloned())
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Brand>> {
        let map = self.committed.lock().unwrap();
        Ok(map.values().filter(|b| b.tenant() == tenant).cloned().collect())
    }

    async fn add(&self, brand: Brand) -> RepositoryResult<()> {
        self.staged.lock().unwrap().push(brand);
        Ok(())
    }

    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged: Vec<Brand> = self.staged.lock().unwrap().drain(..).collect();
        let mut map = self.committed.lock().unwrap();
        for b in staged {
            map.insert(b.brand_id(), b);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct StagedProducts {
    committed: Mutex<HashMap<ProductId, Product>>,
    staged: Mutex<Vec<Product>>,
}

impl StagedProducts {
    pub fn committed_len(&self) -> usize {
        self.committed.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductRepository for StagedProducts {
    async fn get(&self, tenant: &TenantKey, id: ProductId) -> RepositoryResult<Option<Product>> {
        let map = self.committed.lock().unwrap();
        Ok(map.get(&id).filter(|p| p.tenant() == tenant).cloned())
    }

    async fn list(&self, tenant: &TenantKey) -> RepositoryResult<Vec<Product>> {
        let map = self.committed.lock().unwrap();
        Ok(map.values().filter(|p| p.tenant() == tenant).cloned().collect())
    }

    async fn add(&self, product: Product) -> RepositoryResult<()> {
        self.staged.lock().unwrap().push(product);
        Ok(())
    }

    async fn save_changes(&self) -> RepositoryResult<()> {
        let staged: Vec<Product> = self.staged.lock().unwrap().drain(..).collect();
        let mut map = self.committed.lock().unwrap();
        for p in staged {
            map.insert(p.product_id(), p);
        }
        Ok(())
    }
}

pub fn acme() -> TenantKey {
    TenantKey::new("acme").unwrap()
}

pub fn globex() -> TenantKey {
    TenantKey::new("globex").unwrap()
}
