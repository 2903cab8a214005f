use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};

use crate::app::dto::ServiceInfo;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn index(Extension(services): Extension<Arc<AppServices>>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(services.config().reference_date))
}
