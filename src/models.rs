use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{kantins, menus, order_items, orders, ratings, users};

/// Placeholder image reference for menus created without one.
pub const DEFAULT_MENU_IMAGE: &str = "images/placeholder.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
    Kantin,
}

/// What an operation needs from the caller. Checked with
/// [`crate::middleware::auth::ensure_capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Shop,
    ViewDashboard,
    ManageStock,
    ManageMenus,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::Kantin => "kantin",
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Shop => true,
            Capability::ViewDashboard | Capability::ManageStock | Capability::ManageMenus => {
                matches!(self, Role::Admin | Role::Kantin)
            }
        }
    }

    /// Where a freshly logged-in user should land.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Customer => "/menu",
            Role::Admin | Role::Kantin => "/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "kantin" => Ok(Role::Kantin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Kantin {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub last_order_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Menu {
    pub id: Uuid,
    pub kantin_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_id: Uuid,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub menu_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
    pub rated_at: DateTime<Utc>,
}

impl TryFrom<users::Model> for User {
    type Error = String;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role.parse()?,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

impl From<kantins::Model> for Kantin {
    fn from(model: kantins::Model) -> Self {
        Kantin {
            id: model.id,
            name: model.name,
            location: model.location,
            last_order_at: model.last_order_at.with_timezone(&Utc),
            user_id: model.user_id,
        }
    }
}

impl From<menus::Model> for Menu {
    fn from(model: menus::Model) -> Self {
        Menu {
            id: model.id,
            kantin_id: model.kantin_id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Order {
            id: model.id,
            user_id: model.user_id,
            total_price: model.total_price,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: model.order_id,
            menu_id: model.menu_id,
            quantity: model.quantity,
            price: model.price,
        }
    }
}

impl From<ratings::Model> for Rating {
    fn from(model: ratings::Model) -> Self {
        Rating {
            id: model.id,
            user_id: model.user_id,
            menu_id: model.menu_id,
            score: model.score,
            comment: model.comment,
            rated_at: model.rated_at.with_timezone(&Utc),
        }
    }
}
