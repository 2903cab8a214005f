//! `shelfwise-ai`
//!
//! **Responsibility:** the two advice pipelines.
//!
//! - Discount Strategy Engine: tier ladder over shelf life and stock pressure,
//!   plus a financial projection per record.
//! - Replenishment Forecast Pipeline: weekly-seasonal demand forecast per
//!   product, reorder quantity, and waste avoided versus a naive baseline.
//!
//! This crate does no IO. Inputs are loaded by callers (infra/api) and outputs
//! are plain values; nothing here mutates stored state.

pub mod discount;
pub mod forecast;
pub mod job;
pub mod result;
pub mod scheduler;

pub use discount::{ActionStatus, DiscountStrategyJob, StrategyResult};
pub use forecast::{ForecastConfig, ForecastResult, ProductSelection, ReplenishmentForecastJob};
pub use job::AdviceJob;
pub use result::AdviceError;
pub use scheduler::{AdviceScheduler, LocalAdviceScheduler, WorkerPool};
