use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Menu;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStockRequest {
    pub menu_id: Uuid,
    /// New absolute stock level.
    pub stock: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockList {
    pub items: Vec<Menu>,
}
