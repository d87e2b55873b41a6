use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(default = "default_add_quantity")]
    pub quantity: i32,
}

fn default_add_quantity() -> i32 {
    1
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    /// Zero or less removes the line.
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    pub menu_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub image_url: String,
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_price: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            menu_id: line.menu_id,
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            image_url: line.image_url.clone(),
            subtotal: line.subtotal(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().map(CartLineView::from).collect(),
            total_price: cart.total(),
        }
    }
}

/// Result of an update: the line as it now stands, or `None` once removed.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartUpdateView {
    pub line: Option<CartLineView>,
    pub cart: CartView,
}
