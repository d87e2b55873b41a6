use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    models::{Capability, Role},
    session::Session,
    state::AppState,
};

/// Caller identity resolved from the bearer token and a live session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub role: Role,
}

pub fn ensure_capability(user: &AuthUser, capability: Capability) -> Result<(), AppError> {
    if user.role.allows(capability) {
        return Ok(());
    }
    let action = match capability {
        Capability::Shop => "shop",
        Capability::ViewDashboard => "view the dashboard",
        Capability::ManageStock => "manage stock",
        Capability::ManageMenus => "manage menus",
    };
    Err(AppError::Forbidden(format!(
        "{} accounts cannot {action}",
        user.role
    )))
}

/// Sign a token bound to `session`. It expires together with the session.
pub fn issue_token(secret: &str, session: &Session) -> AppResult<String> {
    let claims = Claims {
        sub: session.user_id.to_string(),
        sid: session.id.to_string(),
        username: session.username.clone(),
        role: session.role,
        exp: session.expires_at.timestamp().max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

async fn authenticate(parts: &Parts, state: &AppState) -> AppResult<AuthUser> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("please log in first".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("invalid Authorization scheme".into()))?;

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))?;

    let session_id = Uuid::parse_str(&decoded.claims.sid)
        .map_err(|_| AppError::Unauthorized("invalid session id in token".into()))?;

    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::Unauthorized("session has expired, please log in again".into()))?;

    Ok(AuthUser {
        user_id: session.user_id,
        session_id: session.id,
        username: session.username,
        role: session.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

/// `Option<AuthUser>` treats a missing or stale session as an anonymous caller.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(authenticate(parts, state).await.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            username: "tester".into(),
            role,
        }
    }

    #[test]
    fn customer_is_refused_staff_capabilities() {
        let err = ensure_capability(&user(Role::Customer), Capability::ManageStock).unwrap_err();
        match err {
            AppError::Forbidden(message) => {
                assert_eq!(message, "customer accounts cannot manage stock")
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(ensure_capability(&user(Role::Customer), Capability::Shop).is_ok());
    }

    #[test]
    fn kantin_and_admin_pass_dashboard_check() {
        assert!(ensure_capability(&user(Role::Kantin), Capability::ViewDashboard).is_ok());
        assert!(ensure_capability(&user(Role::Admin), Capability::ViewDashboard).is_ok());
    }

    #[test]
    fn issued_token_carries_session_claims() {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "kantin1".into(),
            role: Role::Kantin,
            cart: Default::default(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        };
        let token = issue_token("test-secret", &session).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sid, session.id.to_string());
        assert_eq!(decoded.claims.sub, session.user_id.to_string());
        assert_eq!(decoded.claims.role, Role::Kantin);
    }
}
