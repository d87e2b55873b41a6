use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use password_hash::rand_core::OsRng;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn role(&self) -> AppResult<Role> {
        self.role
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
    }
}

/// Trim and require the registration fields; resolve the requested role.
pub fn validate_registration(payload: &RegisterRequest) -> AppResult<Role> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".into()));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("password is required".into()));
    }
    match payload.role.unwrap_or(Role::Customer) {
        Role::Admin => Err(AppError::BadRequest(
            "admin accounts cannot be self-registered".into(),
        )),
        role => Ok(role),
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let role = validate_registration(&payload)?;
    let username = payload.username.trim();
    let email = payload.email.trim();

    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&state.pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest("username is already taken".into()));
    }

    let registered: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&state.pool)
        .await?;
    if registered.is_some() {
        return Err(AppError::BadRequest("email is already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, password_hash, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(user_id = %row.id, role = %role, "user registered");
    record(
        &state.pool,
        Some(row.id),
        AuditAction::UserRegister,
        serde_json::json!({ "user_id": row.id, "role": role.as_str() }),
    )
    .await;

    let user = User {
        id: row.id,
        username: row.username,
        email: row.email,
        role,
        created_at: row.created_at,
    };
    Ok(ApiResponse::success(
        "Registration successful, please log in",
        user,
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, role, created_at FROM users WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(&state.pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(invalid_credentials()),
    };

    let parsed_hash = PasswordHash::new(&row.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid_credentials());
    }

    let role = row.role()?;
    let session = state.sessions.create(row.id, &row.username, role).await;
    let token = issue_token(&state.config.jwt_secret, &session)?;

    tracing::info!(user_id = %row.id, session_id = %session.id, "user logged in");
    record(
        &state.pool,
        Some(row.id),
        AuditAction::UserLogin,
        serde_json::json!({ "user_id": row.id, "session_id": session.id }),
    )
    .await;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        username: row.username,
        role,
        redirect: role.home_path().to_string(),
    };
    Ok(ApiResponse::success(
        format!("Welcome, {}!", resp.username),
        resp,
        Some(Meta::empty()),
    ))
}

pub async fn logout_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.sessions.remove(user.session_id).await;

    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::UserLogout,
        serde_json::json!({ "session_id": user.session_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "You have been logged out",
        serde_json::json!({ "redirect": "/" }),
        Some(Meta::empty()),
    ))
}

fn invalid_credentials() -> AppError {
    AppError::BadRequest("invalid username or password".into())
}
