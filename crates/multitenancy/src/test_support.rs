//! Recording tenant repository for handler tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use marketdesk_core::{RepositoryResult, TenantKey};

use crate::{Tenant, TenantRepository};

#[derive(Default)]
pub struct RecordingTenantRepository {
    committed: Mutex<BTreeMap<TenantKey, Tenant>>,
    staged: Mutex<Vec<Tenant>>,
    pub adds: AtomicUsize,
    pub updates: AtomicUsize,
    pub saves: AtomicUsize,
}

impl RecordingTenantRepository {
    pub fn with(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let repo = Self::default();
        {
            let mut committed = repo.committed.lock().unwrap();
            for t in tenants {
                committed.insert(t.key().clone(), t);
            }
        }
        repo
    }

    pub fn stored(&self, key: &str) -> Option<Tenant> {
        let key = TenantKey::new(key).unwrap();
        self.committed.lock().unwrap().get(&key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantRepository for RecordingTenantRepository {
    async fn get_by_key(&self, key: &TenantKey) -> RepositoryResult<Option<Tenant>> {
        Ok(self.committed.lock().unwrap().get(key).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Tenant>> {
        Ok(self.committed.lock().unwrap().values().cloned().collect())
    }

    async fn add(&self, tenant: Tenant) -> RepositoryResult<()> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.staged.lock().unwrap().push(tenant);
        Ok(())
    }

    async fn update(&self, tenant: Tenant) -> RepositoryResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.staged.lock().unwrap().push(tenant);
        Ok(())
    }

    async fn save_changes(&self) -> RepositoryResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let staged: Vec<Tenant> = self.staged.lock().unwrap().drain(..).collect();
        let mut committed = self.committed.lock().unwrap();
        for t in staged {
            committed.insert(t.key().clone(), t);
        }
        Ok(())
    }
}

pub fn tenant(key: &str) -> Tenant {
    Tenant::new(
        TenantKey::new(key).unwrap(),
        format!("{key} inc"),
        format!("admin@{key}.test"),
        None,
        None,
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    )
}

pub fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}
