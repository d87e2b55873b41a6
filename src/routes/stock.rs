use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::stock::{StockList, UpdateStockRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::Menu,
    response::ApiResponse,
    services::stock_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/stock", get(list_stock).post(update_stock))
}

#[utoipa::path(
    get,
    path = "/admin/stock",
    responses(
        (status = 200, description = "Menus whose stock the caller manages", body = ApiResponse<StockList>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StockList>>> {
    let resp = stock_service::list_stock(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/stock",
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock overwritten", body = ApiResponse<Menu>),
        (status = 400, description = "Negative stock"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateStockRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = stock_service::update_stock(&state, &user, payload).await?;
    Ok(Json(resp))
}
