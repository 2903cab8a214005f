//! Sales history domain module.
//!
//! Sales observations and their per-product time series, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod record;
pub mod series;

pub use record::{SalesDocument, SalesRecord, records_from_documents};
pub use series::{SalesSeries, group_by_product};
