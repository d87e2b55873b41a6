use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError, CartUpdate},
    dto::cart::{AddToCartRequest, CartLineView, CartUpdateView, CartView, UpdateCartRequest},
    entity::menus::Entity as Menus,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_capability},
    models::Capability,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Current cart of the caller; anonymous callers get an empty cart.
pub async fn view_cart(
    state: &AppState,
    user: Option<&AuthUser>,
) -> AppResult<ApiResponse<CartView>> {
    let cart = match user {
        Some(user) => state.sessions.cart(user.session_id).await?,
        None => Cart::new(),
    };
    let message = if cart.is_empty() {
        "Your cart is empty"
    } else {
        "Cart"
    };
    let meta = Meta::count(cart.len());
    Ok(ApiResponse::success(message, CartView::from(&cart), Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLineView>> {
    ensure_capability(user, Capability::Shop)?;
    if payload.quantity <= 0 {
        return Err(CartError::InvalidQuantity.into());
    }

    let menu = Menus::find_by_id(menu_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let line = state
        .sessions
        .with_cart(user.session_id, |cart| {
            cart.add(&menu, payload.quantity).map(CartLineView::from)
        })
        .await?;

    tracing::debug!(menu_id = %menu_id, quantity = payload.quantity, "added to cart");
    let message = format!("{}x {} added to cart", payload.quantity, menu.name);
    Ok(ApiResponse::success(message, line, Some(Meta::empty())))
}

pub async fn update_cart(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartUpdateView>> {
    ensure_capability(user, Capability::Shop)?;

    let menu = if payload.quantity > 0 {
        let menu = Menus::find_by_id(menu_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;
        Some(menu)
    } else {
        None
    };

    let (outcome, cart) = state
        .sessions
        .with_cart(user.session_id, |cart| {
            let outcome = cart.update(menu_id, payload.quantity, menu.as_ref())?;
            Ok((outcome, CartView::from(&*cart)))
        })
        .await?;

    let (message, line) = match outcome {
        CartUpdate::Removed => ("Item removed from cart", None),
        CartUpdate::Unchanged => ("Item was not in the cart", None),
        CartUpdate::Updated(line) => ("Cart quantity updated", Some(CartLineView::from(&line))),
    };
    Ok(ApiResponse::success(
        message,
        CartUpdateView { line, cart },
        Some(Meta::empty()),
    ))
}
