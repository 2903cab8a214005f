use std::sync::Arc;

use axum::{Json, extract::Extension};

use shelfwise_ai::{ForecastResult, StrategyResult};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn discounts(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<StrategyResult>>, ApiError> {
    services.discount_strategy().await.map(Json)
}

pub async fn forecast(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<ForecastResult>>, ApiError> {
    services.replenishment_forecast().await.map(Json)
}
