use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::ratings::{RateMenuRequest, RatingResult},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::rating_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/rate_menu/{menu_id}", post(rate_menu))
}

#[utoipa::path(
    post,
    path = "/rate_menu/{menu_id}",
    params(
        ("menu_id" = Uuid, Path, description = "Menu ID")
    ),
    request_body = RateMenuRequest,
    responses(
        (status = 200, description = "Rating created or overwritten", body = ApiResponse<RatingResult>),
        (status = 400, description = "Score outside 1..=5"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Ratings"
)]
pub async fn rate_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(menu_id): Path<Uuid>,
    AppJson(payload): AppJson<RateMenuRequest>,
) -> AppResult<Json<ApiResponse<RatingResult>>> {
    let resp = rating_service::rate_menu(&state, &user, menu_id, payload).await?;
    Ok(Json(resp))
}
