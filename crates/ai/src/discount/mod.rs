//! Discount Strategy Engine: tier ladder + financial projection.

pub mod engine;
pub mod ladder;
pub mod projection;

pub use engine::{DiscountStrategyJob, StrategyResult, evaluate, evaluate_batch};
pub use ladder::{ActionStatus, TierInputs, decide};
pub use projection::{Projection, project};
