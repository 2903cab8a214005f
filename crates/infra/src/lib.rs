//! Infrastructure layer: record stores and configuration.

pub mod config;
pub mod store;

pub use config::{AdvisorConfig, ConfigError};
pub use store::{
    InMemoryInventoryStore, InMemorySalesHistoryStore, InventoryStore, SalesHistoryStore,
    StoreError,
};
