mod health;
mod products;
mod report;

use axum::{
    routing::{get, put},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/report", get(report::get_report))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
