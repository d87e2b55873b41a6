use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::{
    dto::dashboard::{AdminDashboard, DashboardView, KantinDashboard, SaleLine},
    entity::{
        kantins::{self, Column as KantinCol, Entity as Kantins},
        menus::{Column as MenuCol, Entity as Menus},
        order_items::{self, Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::{Capability, Kantin, Menu, Order, OrderStatus, Role},
    response::{ApiResponse, Meta},
    services::kantin_scope::find_owned_kantin,
    state::AppState,
};

/// How far back an order still counts as "new" on the stall dashboard.
pub const NEW_ORDER_WINDOW_MINUTES: i64 = 5;

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardView>> {
    ensure_capability(user, Capability::ViewDashboard)?;
    let view = match user.role {
        Role::Admin => DashboardView::Admin(admin_dashboard(state).await?),
        Role::Kantin => DashboardView::Kantin(kantin_dashboard(state, user, Utc::now()).await?),
        Role::Customer => {
            return Err(AppError::Forbidden(
                "customer accounts cannot view the dashboard".into(),
            ));
        }
    };
    Ok(ApiResponse::success("Dashboard", view, Some(Meta::empty())))
}

async fn admin_dashboard(state: &AppState) -> AppResult<AdminDashboard> {
    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let kantins = Kantins::find()
        .order_by_asc(KantinCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Kantin::from)
        .collect();

    let total_revenue: (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(total_price), 0)::BIGINT FROM orders")
            .fetch_one(&state.pool)
            .await?;

    Ok(AdminDashboard {
        orders,
        kantins,
        total_revenue: total_revenue.0,
    })
}

async fn kantin_dashboard(
    state: &AppState,
    user: &AuthUser,
    now: DateTime<Utc>,
) -> AppResult<KantinDashboard> {
    let kantin = find_owned_kantin(&state.orm, user)
        .await?
        .ok_or(AppError::NoStall)?;

    let menus = Menus::find()
        .filter(MenuCol::KantinId.eq(kantin.id))
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Menu::from)
        .collect();

    let order_items = sales_of(state, &kantin).await?;
    let (revenue, items_sold) = summarize_sales(&order_items);

    let new_orders: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT o.id)
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.id
        JOIN menus m ON m.id = oi.menu_id
        WHERE m.kantin_id = $1
          AND o.status = $2
          AND o.created_at > $3
        "#,
    )
    .bind(kantin.id)
    .bind(OrderStatus::Completed.as_str())
    .bind(new_order_threshold(now))
    .fetch_one(&state.pool)
    .await?;

    Ok(KantinDashboard {
        kantin: Kantin::from(kantin),
        menus,
        order_items,
        revenue,
        items_sold,
        new_orders_count: new_orders.0,
    })
}

/// Order lines containing this stall's menus, newest order first.
async fn sales_of(state: &AppState, kantin: &kantins::Model) -> AppResult<Vec<SaleLine>> {
    let lines = OrderItems::find()
        .select_only()
        .column_as(OrderItemCol::Id, "order_item_id")
        .column_as(OrderItemCol::OrderId, "order_id")
        .column_as(OrderCol::UserId, "customer_id")
        .column_as(OrderItemCol::MenuId, "menu_id")
        .column_as(MenuCol::Name, "menu_name")
        .column_as(OrderItemCol::Quantity, "quantity")
        .column_as(OrderItemCol::Price, "price")
        .column_as(OrderCol::Status, "status")
        .column_as(OrderCol::CreatedAt, "ordered_at")
        .join(JoinType::InnerJoin, order_items::Relation::Orders.def())
        .join(JoinType::InnerJoin, order_items::Relation::Menus.def())
        .filter(MenuCol::KantinId.eq(kantin.id))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_asc(OrderItemCol::Id)
        .into_model::<SaleLine>()
        .all(&state.orm)
        .await?;
    Ok(lines)
}

/// Revenue (Σ quantity × price) and items sold (Σ quantity) over a stall's lines.
pub fn summarize_sales(lines: &[SaleLine]) -> (i64, i64) {
    lines.iter().fold((0, 0), |(revenue, sold), line| {
        let quantity = i64::from(line.quantity);
        (revenue + quantity * line.price, sold + quantity)
    })
}

pub fn new_order_threshold(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(NEW_ORDER_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn line(quantity: i32, price: i64) -> SaleLine {
        SaleLine {
            order_item_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            menu_id: Uuid::new_v4(),
            menu_name: "Ayam Geprek".into(),
            quantity,
            price,
            status: "completed".into(),
            ordered_at: Utc::now(),
        }
    }

    #[test]
    fn revenue_is_quantity_times_purchase_price() {
        let lines = vec![line(2, 20_000), line(1, 18_000), line(3, 8_000)];
        assert_eq!(summarize_sales(&lines), (82_000, 6));
    }

    #[test]
    fn empty_stall_has_zero_revenue() {
        assert_eq!(summarize_sales(&[]), (0, 0));
    }

    #[test]
    fn new_order_window_is_five_minutes() {
        let now = Utc::now();
        assert_eq!(now - new_order_threshold(now), Duration::minutes(5));
    }
}
