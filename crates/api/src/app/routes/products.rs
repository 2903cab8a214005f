use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use shelfwise_inventory::InventoryDocument;

use crate::app::dto::CreatedResponse;
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<InventoryDocument>, JsonRejection>,
) -> axum::response::Response {
    let Json(doc) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match services.create_product(doc).await {
        Ok(id) => {
            let body = CreatedResponse { id: id.to_string() };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
