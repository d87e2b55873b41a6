use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartLineView, CartUpdateView, CartView, UpdateCartRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/add_to_cart/{menu_id}", post(add_to_cart))
        .route("/update_cart/{menu_id}", post(update_cart))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Current cart, empty when not logged in", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, user.as_ref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/add_to_cart/{menu_id}",
    params(
        ("menu_id" = Uuid, Path, description = "Menu ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line after the add", body = ApiResponse<CartLineView>),
        (status = 400, description = "Invalid quantity or not enough stock"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(menu_id): Path<Uuid>,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLineView>>> {
    let resp = cart_service::add_to_cart(&state, &user, menu_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/update_cart/{menu_id}",
    params(
        ("menu_id" = Uuid, Path, description = "Menu ID")
    ),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Cart after the update", body = ApiResponse<CartUpdateView>),
        (status = 400, description = "Not enough stock or menu not in cart"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(menu_id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartUpdateView>>> {
    let resp = cart_service::update_cart(&state, &user, menu_id, payload).await?;
    Ok(Json(resp))
}
