use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// State-changing operations recorded in `audit_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    UserLogout,
    Checkout,
    MenuCreate,
    MenuUpdate,
    MenuDelete,
    StockUpdate,
    MenuRate,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::Checkout => "checkout",
            AuditAction::MenuCreate => "menu_create",
            AuditAction::MenuUpdate => "menu_update",
            AuditAction::MenuDelete => "menu_delete",
            AuditAction::StockUpdate => "stock_update",
            AuditAction::MenuRate => "menu_rate",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::UserRegister | AuditAction::UserLogin | AuditAction::UserLogout => {
                "users"
            }
            AuditAction::Checkout => "orders",
            AuditAction::MenuCreate
            | AuditAction::MenuUpdate
            | AuditAction::MenuDelete
            | AuditAction::StockUpdate => "menus",
            AuditAction::MenuRate => "ratings",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Write an audit row after the main operation has committed. Failures are
/// logged and never surface to the caller.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
