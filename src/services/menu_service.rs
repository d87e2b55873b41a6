use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::menus::{
        CreateMenuRequest, ManagedMenuList, MenuFormContext, MenuList, MenuListing, MenuQuery,
        UpdateMenuRequest,
    },
    entity::{
        kantins::Entity as Kantins,
        menus::{self, ActiveModel as MenuActive, Column as MenuCol, Entity as Menus},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::{Capability, DEFAULT_MENU_IMAGE, Kantin, Menu},
    response::{ApiResponse, Meta},
    services::kantin_scope::{StallScope, resolve_scope},
    state::AppState,
};

/// Public menu listing, optionally filtered by a search term.
pub async fn list_menus(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let mut condition = Condition::all();
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(search) = search {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Menus, MenuCol::Name)).ilike(pattern.clone()))
                .add(Expr::col((Menus, MenuCol::Description)).ilike(pattern)),
        );
    }

    let rows = Menus::find()
        .find_also_related(Kantins)
        .filter(condition)
        .order_by_desc(MenuCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let ratings: HashMap<Uuid, (f64, i64)> = sqlx::query_as::<_, (Uuid, f64, i64)>(
        r#"
        SELECT menu_id, AVG(score)::FLOAT8, COUNT(*)
        FROM ratings
        GROUP BY menu_id
        "#,
    )
    .fetch_all(&state.pool)
    .await?
    .into_iter()
    .map(|(menu_id, average, count)| (menu_id, (average, count)))
    .collect();

    let items: Vec<MenuListing> = rows
        .into_iter()
        .map(|(menu, kantin)| {
            let rating = ratings.get(&menu.id).copied();
            MenuListing {
                kantin_name: kantin.map(|k| k.name).unwrap_or_default(),
                average_rating: rating.map(|(average, _)| average),
                rating_count: rating.map(|(_, count)| count).unwrap_or(0),
                menu: Menu::from(menu),
            }
        })
        .collect();

    let message = match search {
        Some(search) => format!("Search results for '{search}'"),
        None => "Menus".to_string(),
    };
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(message, MenuList { items }, Some(meta)))
}

/// Menus the caller manages: their own stall's, or every menu for admins.
pub async fn list_managed_menus(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ManagedMenuList>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let scope = resolve_scope(&state.orm, user).await?;

    let items = scoped_menus(state, &scope).await?;
    let meta = Meta::count(items.len());
    let data = ManagedMenuList {
        kantin: scope.kantin().cloned().map(Kantin::from),
        items,
    };
    Ok(ApiResponse::success("Menus", data, Some(meta)))
}

pub(crate) async fn scoped_menus(state: &AppState, scope: &StallScope) -> AppResult<Vec<Menu>> {
    let mut finder = Menus::find();
    if let Some(kantin) = scope.kantin() {
        finder = finder.filter(MenuCol::KantinId.eq(kantin.id));
    }
    let menus = finder
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Menu::from)
        .collect();
    Ok(menus)
}

pub async fn menu_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<MenuFormContext>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let scope = resolve_scope(&state.orm, user).await?;
    let data = MenuFormContext {
        kantin: scope.kantin().cloned().map(Kantin::from),
        default_image_url: DEFAULT_MENU_IMAGE.to_string(),
    };
    Ok(ApiResponse::success("New menu", data, Some(Meta::empty())))
}

/// Shared rules for create and edit: returns the trimmed name.
pub fn validate_menu_fields(name: &str, price: i64, stock: i32) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if price <= 0 {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(name.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_menu(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let name = validate_menu_fields(&payload.name, payload.price, payload.stock)?;
    let scope = resolve_scope(&state.orm, user).await?;

    let kantin_id = match (&scope, payload.kantin_id) {
        (StallScope::Own(kantin), Some(requested)) if requested != kantin.id => {
            return Err(AppError::Forbidden(
                "menus can only be added to your own stall".into(),
            ));
        }
        (StallScope::Own(kantin), _) => kantin.id,
        (StallScope::All, Some(requested)) => {
            Kantins::find_by_id(requested)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?
                .id
        }
        (StallScope::All, None) => {
            return Err(AppError::BadRequest("kantin_id is required".into()));
        }
    };

    let menu = MenuActive {
        id: Set(Uuid::new_v4()),
        kantin_id: Set(kantin_id),
        name: Set(name),
        description: Set(non_blank(payload.description)),
        price: Set(payload.price),
        stock: Set(payload.stock),
        image_url: Set(non_blank(payload.image_url).unwrap_or_else(|| DEFAULT_MENU_IMAGE.into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(menu_id = %menu.id, kantin_id = %kantin_id, "menu created");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::MenuCreate,
        serde_json::json!({ "menu_id": menu.id, "kantin_id": kantin_id }),
    )
    .await;

    let message = format!("Menu \"{}\" added", menu.name);
    Ok(ApiResponse::success(
        message,
        Menu::from(menu),
        Some(Meta::empty()),
    ))
}

async fn find_owned_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<menus::Model> {
    let menu = Menus::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let scope = resolve_scope(&state.orm, user).await?;
    scope.ensure_owns(&menu)?;
    Ok(menu)
}

pub async fn get_menu_for_edit(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Menu>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let menu = find_owned_menu(state, user, id).await?;
    Ok(ApiResponse::success("Menu", Menu::from(menu), Some(Meta::empty())))
}

pub async fn update_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let name = validate_menu_fields(&payload.name, payload.price, payload.stock)?;
    let existing = find_owned_menu(state, user, id).await?;

    let mut active: MenuActive = existing.into();
    active.name = Set(name);
    active.description = Set(non_blank(payload.description));
    active.price = Set(payload.price);
    active.stock = Set(payload.stock);
    if let Some(image_url) = non_blank(payload.image_url) {
        active.image_url = Set(image_url);
    }
    let menu = active.update(&state.orm).await?;

    tracing::info!(menu_id = %menu.id, "menu updated");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::MenuUpdate,
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    let message = format!("Menu \"{}\" updated", menu.name);
    Ok(ApiResponse::success(
        message,
        Menu::from(menu),
        Some(Meta::empty()),
    ))
}

/// Delete a menu and its ratings. Menus that appear in any order are kept so
/// order history and stall revenue stay intact.
pub async fn delete_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_capability(user, Capability::ManageMenus)?;
    let scope = resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;
    let menu = Menus::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_owns(&menu)?;

    let ordered = OrderItems::find()
        .filter(OrderItemCol::MenuId.eq(menu.id))
        .count(&txn)
        .await?;
    if ordered > 0 {
        return Err(AppError::BadRequest(format!(
            "\"{}\" has been ordered before and cannot be deleted; set its stock to 0 instead",
            menu.name
        )));
    }

    Menus::delete_by_id(menu.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(menu_id = %menu.id, "menu deleted");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::MenuDelete,
        serde_json::json!({ "menu_id": menu.id, "kantin_id": menu.kantin_id }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Menu \"{}\" deleted", menu.name),
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
