//! Cart route handlers - the cart page surface.
//!
//! Every handler reads the one cart owned by this session's
//! [`BrowsingState`](crate::state::BrowsingState); the dashboard surface
//! reads the same instance, so the two can never disagree on totals.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use quickbite_core::{ItemId, Price};

use crate::cart::Cart;
use crate::error::{AppError, Result};
use crate::models::CurrentAccount;
use crate::state::AppState;

use super::browsing_state;

// =============================================================================
// Payload Types
// =============================================================================

/// Add-to-cart payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddForm {
    pub item_id: ItemId,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Quantity-change payload. Decrement buttons post `delta: -1`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityForm {
    pub item_id: ItemId,
    pub delta: i64,
}

/// Remove-line payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveForm {
    pub item_id: ItemId,
}

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<String>,
}

/// Cart display data, totals recomputed at render time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    item_id: line.item,
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_price: line.line_price(),
                    promo: line.promo.clone(),
                })
                .collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart badge data.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    _account: CurrentAccount,
    session: Session,
) -> Result<Json<CartView>> {
    let handle = browsing_state(&state, &session).await?;
    let browsing = handle.lock().await;

    Ok(Json(CartView::from(&browsing.cart)))
}

/// Add an item to the cart, merging into an existing line.
pub async fn add(
    State(state): State<AppState>,
    _account: CurrentAccount,
    session: Session,
    Json(form): Json<AddForm>,
) -> Result<Json<CartView>> {
    let item = state
        .catalog()
        .get(form.item_id)
        .ok_or_else(|| AppError::NotFound(format!("No menu item with id {}", form.item_id)))?;

    let handle = browsing_state(&state, &session).await?;
    let mut browsing = handle.lock().await;
    browsing
        .cart
        .add_or_increment(item, form.quantity.unwrap_or(1));

    Ok(Json(CartView::from(&browsing.cart)))
}

/// Apply a signed quantity delta. A line driven to zero disappears; an
/// unknown id is a no-op, never an error.
pub async fn quantity(
    State(state): State<AppState>,
    _account: CurrentAccount,
    session: Session,
    Json(form): Json<QuantityForm>,
) -> Result<Json<CartView>> {
    let handle = browsing_state(&state, &session).await?;
    let mut browsing = handle.lock().await;
    browsing.cart.change_quantity(form.item_id, form.delta);

    Ok(Json(CartView::from(&browsing.cart)))
}

/// Remove a line. Idempotent.
pub async fn remove(
    State(state): State<AppState>,
    _account: CurrentAccount,
    session: Session,
    Json(form): Json<RemoveForm>,
) -> Result<Json<CartView>> {
    let handle = browsing_state(&state, &session).await?;
    let mut browsing = handle.lock().await;
    browsing.cart.remove(form.item_id);

    Ok(Json(CartView::from(&browsing.cart)))
}

/// Cart badge count.
pub async fn count(
    State(state): State<AppState>,
    _account: CurrentAccount,
    session: Session,
) -> Result<Json<CartCountView>> {
    let handle = browsing_state(&state, &session).await?;
    let browsing = handle.lock().await;

    Ok(Json(CartCountView {
        count: browsing.cart.total_items(),
    }))
}
