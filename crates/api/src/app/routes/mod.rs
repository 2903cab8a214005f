use axum::{
    Router,
    routing::{get, post},
};

pub mod advice;
pub mod products;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/api/discounts", get(advice::discounts))
        .route("/api/forecast", get(advice::forecast))
        .route("/api/products", post(products::create_product))
}
