//! Replenishment Forecast Pipeline: per-product demand model, safety buffer,
//! and waste-avoidance estimate.

pub mod model;
pub mod pipeline;

pub use model::{ModelError, WeeklySeasonalModel};
pub use pipeline::{
    ForecastConfig, ForecastResult, ForecastStatus, ProductSelection, ReplenishmentForecastJob,
    fit_series, forecast_batch, forecast_series, select_products,
};
