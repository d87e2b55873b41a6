use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    dto::auth::{FormFields, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration form fields", body = ApiResponse<FormFields>)
    ),
    tag = "Auth"
)]
pub async fn register_form() -> Json<ApiResponse<FormFields>> {
    let form = FormFields::new("/register", &["username", "email", "password", "role"]);
    Json(ApiResponse::success("Register", form, Some(Meta::empty())))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Missing fields, duplicate username/email or admin role")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form fields", body = ApiResponse<FormFields>)
    ),
    tag = "Auth"
)]
pub async fn login_form() -> Json<ApiResponse<FormFields>> {
    let form = FormFields::new("/login", &["username", "password"]);
    Json(ApiResponse::success("Login", form, Some(Meta::empty())))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Start a session", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session dropped", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = logout_user(&state, &user).await?;
    Ok(Json(resp))
}
