use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Kantin, Menu};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuQuery {
    /// Case-insensitive substring of the name or description.
    pub q: Option<String>,
}

/// Public listing row: the menu, its stall and its rating aggregate.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuListing {
    #[serde(flatten)]
    pub menu: Menu,
    pub kantin_name: String,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuListing>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManagedMenuList {
    pub kantin: Option<Kantin>,
    pub items: Vec<Menu>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    /// Required for admins; kantin accounts always create in their own stall.
    pub kantin_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    /// Keeps the current image when omitted.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuFormContext {
    pub kantin: Option<Kantin>,
    pub default_image_url: String,
}
