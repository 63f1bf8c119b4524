//! In-memory catalog for tests and development.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sq_protocol::CatalogRecord;

use crate::error::{StoreError, StoreResult};
use crate::CatalogStore;

/// A catalog that serves records from memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<RwLock<Vec<CatalogRecord>>>,
    offline: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Build from `(name, quantity)` pairs.
    pub fn from_pairs(pairs: &[(&str, u64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(name, qty)| CatalogRecord::new(*name, *qty))
                .collect(),
        )
    }

    /// Sample pharmacy stock for development.
    pub fn with_sample_data() -> Self {
        Self::from_pairs(&[
            ("Aspirin 500mg", 120),
            ("Dipirona Sódica", 80),
            ("Paracetamol 750mg", 45),
            ("Ibuprofen 400mg", 60),
            ("Bandage Roll", 30),
            ("Gauze Pads", 200),
            ("Insulin NPH", 12),
        ])
    }

    /// A catalog whose every read fails.
    pub fn unavailable() -> Self {
        let catalog = Self::default();
        catalog.set_offline(true);
        catalog
    }

    pub async fn replace(&self, records: Vec<CatalogRecord>) {
        *self.records.write().await = records;
    }

    pub async fn push(&self, record: CatalogRecord) {
        self.records.write().await.push(record);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `fetch_all` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn fetch_all(&self) -> StoreResult<Vec<CatalogRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory catalog offline".into()));
        }
        Ok(self.records.read().await.clone())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
