//! Inventory domain module.
//!
//! This crate contains the inventory record types consumed by the discount
//! engine, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod product;
pub mod record;

pub use product::NewProduct;
pub use record::{DEFAULT_SALES_VOLUME, DEFAULT_TURNOVER_RATE, InventoryDocument, InventoryRecord};
