use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use shelfwise_core::ProductId;
use shelfwise_inventory::{InventoryDocument, NewProduct};
use shelfwise_sales::SalesDocument;

use super::{InventoryStore, SalesHistoryStore, StoreError};

/// In-memory inventory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Vec<(ProductId, InventoryDocument)>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw documents (which may be incomplete, as a real store's
    /// could be).
    pub fn with_documents(docs: impl IntoIterator<Item = InventoryDocument>) -> Self {
        Self {
            inner: RwLock::new(docs.into_iter().map(|d| (ProductId::new(), d)).collect()),
        }
    }

    pub fn get(&self, id: ProductId) -> Option<InventoryDocument> {
        let rows = self.inner.read().ok()?;
        rows.iter().find(|(k, _)| *k == id).map(|(_, d)| d.clone())
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_all(&self) -> Result<Vec<InventoryDocument>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().map(|(_, d)| d.clone()).collect())
    }

    async fn insert(
        &self,
        product: NewProduct,
        received_at: DateTime<Utc>,
    ) -> Result<ProductId, StoreError> {
        let id = ProductId::new();
        let doc = product.into_document(received_at);
        self.inner
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push((id, doc));
        debug!(product_id = %id, "product inserted");
        Ok(id)
    }
}

/// In-memory sales history store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySalesHistoryStore {
    inner: RwLock<Vec<SalesDocument>>,
}

impl InMemorySalesHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: impl IntoIterator<Item = SalesDocument>) -> Self {
        Self {
            inner: RwLock::new(docs.into_iter().collect()),
        }
    }
}

#[async_trait::async_trait]
impl SalesHistoryStore for InMemorySalesHistoryStore {
    async fn list_all(&self) -> Result<Vec<SalesDocument>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.clone())
    }

    async fn append(&self, docs: Vec<SalesDocument>) -> Result<usize, StoreError> {
        let n = docs.len();
        self.inner
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .extend(docs);
        Ok(n)
    }
}
