//! Record stores feeding the advice pipelines.
//!
//! Stores hand back loosely-typed documents; validation happens when the
//! pipelines convert them into domain records.

use chrono::{DateTime, Utc};
use thiserror::Error;

use shelfwise_core::ProductId;
use shelfwise_inventory::{InventoryDocument, NewProduct};
use shelfwise_sales::SalesDocument;

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::{InMemoryInventoryStore, InMemorySalesHistoryStore};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresInventoryStore, PostgresSalesHistoryStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("stored record is unreadable: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Inventory collection: bulk read plus single-record insert.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<InventoryDocument>, StoreError>;

    /// Persist a validated product; `received_at` fills a missing
    /// `date_received`.
    async fn insert(
        &self,
        product: NewProduct,
        received_at: DateTime<Utc>,
    ) -> Result<ProductId, StoreError>;
}

/// Sales history collection.
#[async_trait::async_trait]
pub trait SalesHistoryStore: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<SalesDocument>, StoreError>;

    /// Append raw entries; returns how many were written.
    async fn append(&self, docs: Vec<SalesDocument>) -> Result<usize, StoreError>;
}
