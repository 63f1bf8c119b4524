//! Inventory catalog access for StockQuery.
//!
//! The pipeline only ever reads the full record list; there are no write
//! paths. `CatalogStore` keeps the backend swappable (SQLite file in
//! production, in-memory for tests and development).

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryCatalog;
pub use sqlite::{SqliteCatalog, StoreConfig};

use async_trait::async_trait;
use sq_protocol::CatalogRecord;

/// Read-only access to the current catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read every record, in storage order.
    async fn fetch_all(&self) -> StoreResult<Vec<CatalogRecord>>;

    /// Name of this backend (for logging).
    fn backend_name(&self) -> &str;
}
