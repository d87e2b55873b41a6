use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod doc;
pub mod home;
pub mod kantin_menus;
pub mod menus;
pub mod ratings;
pub mod stock;

/// Every feature router merged at the root, with docs and the JSON 404 fallback.
/// Transport layers (tracing, request ids, limits) are added by the binary.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health_check))
        .merge(auth::router())
        .merge(menus::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(dashboard::router())
        .merge(stock::router())
        .merge(kantin_menus::router())
        .merge(ratings::router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
