use sea_orm::sea_query::LockType;
use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set, TransactionTrait};

use crate::{
    audit::{AuditAction, record},
    dto::stock::{StockList, UpdateStockRequest},
    entity::menus::{ActiveModel as MenuActive, Entity as Menus},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::{Capability, Menu},
    response::{ApiResponse, Meta},
    services::{kantin_scope::resolve_scope, menu_service::scoped_menus},
    state::AppState,
};

pub async fn list_stock(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StockList>> {
    ensure_capability(user, Capability::ManageStock)?;
    let scope = resolve_scope(&state.orm, user).await?;
    let items = scoped_menus(state, &scope).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Stock", StockList { items }, Some(meta)))
}

/// Overwrite a menu's stock with an absolute value.
pub async fn update_stock(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateStockRequest,
) -> AppResult<ApiResponse<Menu>> {
    ensure_capability(user, Capability::ManageStock)?;
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    let scope = resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;
    let menu = Menus::find_by_id(payload.menu_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let menu = match menu {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    scope.ensure_owns(&menu)?;

    let previous = menu.stock;
    let mut active: MenuActive = menu.into();
    active.stock = Set(payload.stock);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(menu_id = %updated.id, previous, stock = updated.stock, "stock updated");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::StockUpdate,
        serde_json::json!({ "menu_id": updated.id, "previous": previous, "stock": updated.stock }),
    )
    .await;

    let message = format!("Stock of {} set to {}", updated.name, updated.stock);
    Ok(ApiResponse::success(
        message,
        Menu::from(updated),
        Some(Meta::empty()),
    ))
}
