//! In-memory response store.
//!
//! `MemoryStore` keeps records for the lifetime of the process. It backs
//! tests and local runs of the server without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use prakriti::{MemoryStore, ResponseStore};
//!
//! let store = MemoryStore::new();
//! store.insert(&record).await?;
//! assert_eq!(store.list_newest_first().await?.len(), 1);
//! ```

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{ResponseRecord, ResponseStore, StoreError};

/// A response store that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ResponseRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-filled with records.
    pub fn with_records(records: Vec<ResponseRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Get the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    fn label(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let mut records = self.records.read().await.clone();
        // equal timestamps: most recently inserted first
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}
