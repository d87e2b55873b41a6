//! Per-session shopping cart.
//!
//! The cart caches the name, unit price and image of each menu at the moment it
//! was first added. Checkout charges the cached price, so a price edit after
//! the item was added does not affect an in-flight cart.

use std::collections::{BTreeMap, btree_map::Entry};

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity::menus, error::AppError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("insufficient stock for {name}: only {available} left")]
    InsufficientStock { name: String, available: i32 },

    #[error("menu is not in the cart")]
    NotInCart,

    #[error("quantity of {name} in the cart is too large")]
    QuantityTooLarge { name: String },

    #[error("{name} is no longer available")]
    Unavailable { name: String },
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartLine {
    pub menu_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub image_url: String,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Outcome of [`Cart::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    Removed,
    Unchanged,
    Updated(CartLine),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<Uuid, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, menu_id: Uuid) -> Option<&CartLine> {
        self.lines.get(&menu_id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn total(&self) -> i64 {
        self.lines.values().map(CartLine::subtotal).sum()
    }

    /// Add `quantity` of `menu`, merging into an existing line.
    ///
    /// The requested quantity is checked against the menu's current stock. On
    /// error the cart is left untouched.
    pub fn add(&mut self, menu: &menus::Model, quantity: i32) -> Result<&CartLine, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        if menu.stock < quantity {
            return Err(CartError::InsufficientStock {
                name: menu.name.clone(),
                available: menu.stock,
            });
        }

        match self.lines.entry(menu.id) {
            Entry::Occupied(entry) => {
                let line = entry.into_mut();
                let Some(merged) = line.quantity.checked_add(quantity) else {
                    return Err(CartError::QuantityTooLarge {
                        name: line.name.clone(),
                    });
                };
                line.quantity = merged;
                Ok(line)
            }
            Entry::Vacant(entry) => Ok(entry.insert(CartLine {
                menu_id: menu.id,
                name: menu.name.clone(),
                unit_price: menu.price,
                quantity,
                image_url: menu.image_url.clone(),
            })),
        }
    }

    /// Merge lines taken out of this cart back in. Taken lines keep their
    /// cached price; quantities added in the meantime are summed onto them.
    pub fn absorb(&mut self, taken: Cart) {
        for (menu_id, mut line) in taken.lines {
            if let Some(added) = self.lines.get(&menu_id) {
                line.quantity = line.quantity.saturating_add(added.quantity);
            }
            self.lines.insert(menu_id, line);
        }
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. `menu` is only needed for a
    /// positive quantity, where it supplies the stock to validate against.
    pub fn update(
        &mut self,
        menu_id: Uuid,
        quantity: i32,
        menu: Option<&menus::Model>,
    ) -> Result<CartUpdate, CartError> {
        if quantity <= 0 {
            return Ok(match self.lines.remove(&menu_id) {
                Some(_) => CartUpdate::Removed,
                None => CartUpdate::Unchanged,
            });
        }

        if let Some(menu) = menu {
            if menu.stock < quantity {
                return Err(CartError::InsufficientStock {
                    name: menu.name.clone(),
                    available: menu.stock,
                });
            }
        }

        let line = self.lines.get_mut(&menu_id).ok_or(CartError::NotInCart)?;
        line.quantity = quantity;
        Ok(CartUpdate::Updated(line.clone()))
    }
}
