use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::menus::{CreateMenuRequest, ManagedMenuList, MenuFormContext, UpdateMenuRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::Menu,
    response::ApiResponse,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kantin/menus", get(list_menus))
        .route("/kantin/menus/add", get(new_menu_form).post(create_menu))
        .route("/kantin/menus/edit/{id}", get(edit_menu_form).post(update_menu))
        .route("/kantin/menus/delete/{id}", post(delete_menu))
}

#[utoipa::path(
    get,
    path = "/kantin/menus",
    responses(
        (status = 200, description = "Menus of the caller's stall, or all menus for admins", body = ApiResponse<ManagedMenuList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn list_menus(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ManagedMenuList>>> {
    let resp = menu_service::list_managed_menus(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/kantin/menus/add",
    responses(
        (status = 200, description = "Context for a new menu", body = ApiResponse<MenuFormContext>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn new_menu_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MenuFormContext>>> {
    let resp = menu_service::menu_form(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/kantin/menus/add",
    request_body = CreateMenuRequest,
    responses(
        (status = 201, description = "Menu created", body = ApiResponse<Menu>),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Stall not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateMenuRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Menu>>)> {
    let resp = menu_service::create_menu(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/kantin/menus/edit/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "Menu to edit", body = ApiResponse<Menu>),
        (status = 403, description = "Menu belongs to another stall"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn edit_menu_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::get_menu_for_edit(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/kantin/menus/edit/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu ID")
    ),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Menu updated", body = ApiResponse<Menu>),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Menu belongs to another stall"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateMenuRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::update_menu(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/kantin/menus/delete/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "Menu deleted", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Menu has order history"),
        (status = 403, description = "Menu belongs to another stall"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Kantin Menus"
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu(&state, &user, id).await?;
    Ok(Json(resp))
}
