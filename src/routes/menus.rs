use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::menus::{MenuList, MenuQuery},
    error::AppResult,
    response::ApiResponse,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/menu", get(list_menus))
}

#[utoipa::path(
    get,
    path = "/menu",
    params(
        ("q" = Option<String>, Query, description = "Search in menu name or description")
    ),
    responses(
        (status = 200, description = "Menus with stall name and rating", body = ApiResponse<MenuList>)
    ),
    tag = "Menus"
)]
pub async fn list_menus(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_menus(&state, query).await?;
    Ok(Json(resp))
}
