use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    cart::{Cart, CartError},
    dto::{cart::CartView, orders::OrderWithItems},
    entity::{
        kantins::{Column as KantinCol, Entity as Kantins},
        menus::{self, Column as MenuCol, Entity as Menus},
        order_items::ActiveModel as OrderItemActive,
        orders::ActiveModel as OrderActive,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::{Capability, Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Cart summary shown before the caller confirms the checkout.
pub async fn checkout_summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CartView>> {
    ensure_capability(user, Capability::Shop)?;
    let cart = state.sessions.cart(user.session_id).await?;
    if cart.is_empty() {
        return Err(empty_cart());
    }
    let meta = Meta::count(cart.len());
    Ok(ApiResponse::success(
        "Confirm your order",
        CartView::from(&cart),
        Some(meta),
    ))
}

/// Turn the caller's cart into a completed order.
///
/// The cart is emptied for the duration of the transaction and handed back on
/// failure, so a failed checkout leaves both the database and the cart as
/// they were.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_capability(user, Capability::Shop)?;
    // Taking the cart out up front means a concurrent checkout of the same
    // session sees an empty cart, and adds made meanwhile land in a fresh one.
    let cart = state.sessions.take_cart(user.session_id).await?;
    if cart.is_empty() {
        return Err(empty_cart());
    }

    let placed = match place_order(state, user.user_id, &cart).await {
        Ok(placed) => placed,
        Err(err) => {
            tracing::warn!(user_id = %user.user_id, error = %err, "checkout failed");
            state.sessions.restore_cart(user.session_id, cart).await;
            return Err(err);
        }
    };

    tracing::info!(
        order_id = %placed.order.id,
        total_price = placed.order.total_price,
        items = placed.items.len(),
        "checkout completed"
    );
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::Checkout,
        serde_json::json!({ "order_id": placed.order.id, "total_price": placed.order.total_price }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment successful, your order has been placed. Please pick up your food.",
        placed,
        Some(Meta::empty()),
    ))
}

async fn place_order(state: &AppState, user_id: Uuid, cart: &Cart) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;
    let now = Utc::now();

    // Locks are taken in id order so concurrent checkouts cannot deadlock.
    let menu_ids: Vec<Uuid> = cart.lines().map(|line| line.menu_id).collect();
    let locked: HashMap<Uuid, menus::Model> = Menus::find()
        .filter(MenuCol::Id.is_in(menu_ids))
        .order_by_asc(MenuCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|menu| (menu.id, menu))
        .collect();

    check_stock(cart, &locked)?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        total_price: Set(cart.total()),
        status: Set(OrderStatus::Completed.as_str().into()),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(cart.len());
    for line in cart.lines() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_id: Set(line.menu_id),
            quantity: Set(line.quantity),
            price: Set(line.unit_price),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));

        Menus::update_many()
            .col_expr(MenuCol::Stock, Expr::col(MenuCol::Stock).sub(line.quantity))
            .filter(MenuCol::Id.eq(line.menu_id))
            .exec(&txn)
            .await?;
    }

    let kantin_ids = affected_kantins(cart, &locked);
    Kantins::update_many()
        .col_expr(KantinCol::LastOrderAt, Expr::value(now))
        .filter(KantinCol::Id.is_in(kantin_ids))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}

/// Re-check every cart line against the locked stock figures.
pub fn check_stock(cart: &Cart, locked: &HashMap<Uuid, menus::Model>) -> Result<(), CartError> {
    for line in cart.lines() {
        let menu = locked.get(&line.menu_id).ok_or_else(|| CartError::Unavailable {
            name: line.name.clone(),
        })?;
        if menu.stock < line.quantity {
            return Err(CartError::InsufficientStock {
                name: menu.name.clone(),
                available: menu.stock,
            });
        }
    }
    Ok(())
}

/// Distinct stalls touched by the cart.
pub fn affected_kantins(cart: &Cart, locked: &HashMap<Uuid, menus::Model>) -> BTreeSet<Uuid> {
    cart.lines()
        .filter_map(|line| locked.get(&line.menu_id))
        .map(|menu| menu.kantin_id)
        .collect()
}

fn empty_cart() -> AppError {
    AppError::BadRequest("cart is empty".into())
}
