use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardView,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Admin overview or stall sales summary", body = ApiResponse<DashboardView>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Customer account, or kantin account without a stall"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardView>>> {
    let resp = dashboard_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}
