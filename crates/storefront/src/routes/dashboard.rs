//! Dashboard route handler - the other surface of the cart.
//!
//! Serves the menu (with the original dashboard's name search) plus the
//! cart badge totals, read from the same cart the cart page renders.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use quickbite_core::Price;

use crate::catalog::CatalogItem;
use crate::error::Result;
use crate::models::CurrentAccount;
use crate::state::AppState;

use super::browsing_state;

/// Dashboard query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// Dashboard display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub account: CurrentAccount,
    pub items: Vec<CatalogItem>,
    pub cart_count: u64,
    pub cart_total: Price,
}

/// Display the dashboard: filtered menu plus cart badge totals.
pub async fn show(
    State(state): State<AppState>,
    account: CurrentAccount,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Json<DashboardView>> {
    let items = state
        .catalog()
        .search(&query.search)
        .into_iter()
        .cloned()
        .collect();

    let handle = browsing_state(&state, &session).await?;
    let browsing = handle.lock().await;

    Ok(Json(DashboardView {
        account,
        items,
        cart_count: browsing.cart.total_items(),
        cart_total: browsing.cart.total_price(),
    }))
}
