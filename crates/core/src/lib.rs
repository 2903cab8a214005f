//! `shelfwise-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod date;
pub mod error;
pub mod id;

pub use date::parse_calendar_date;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
