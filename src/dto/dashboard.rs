use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Kantin, Menu, Order};

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub orders: Vec<Order>,
    pub kantins: Vec<Kantin>,
    pub total_revenue: i64,
}

/// One order line of a stall, joined with its order and menu.
#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
pub struct SaleLine {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub menu_id: Uuid,
    pub menu_name: String,
    pub quantity: i32,
    pub price: i64,
    pub status: String,
    pub ordered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KantinDashboard {
    pub kantin: Kantin,
    pub menus: Vec<Menu>,
    pub order_items: Vec<SaleLine>,
    pub revenue: i64,
    pub items_sold: i64,
    pub new_orders_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Kantin(KantinDashboard),
}
