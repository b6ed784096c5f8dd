//! Catalog snapshot the cart draws items from.
//!
//! Where the records come from (static seed, remote fetch) is not this
//! app's concern; the only requirement is that item ids are unique within
//! one snapshot.

use serde::{Deserialize, Serialize};

use quickbite_core::{ItemId, Price};

/// One orderable menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Price,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo: Option<String>,
}

/// An immutable snapshot of the menu.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a snapshot, dropping records whose id repeats (first wins).
    #[must_use]
    pub fn new(records: Vec<CatalogItem>) -> Self {
        let mut items: Vec<CatalogItem> = Vec::with_capacity(records.len());
        for record in records {
            if items.iter().any(|item| item.id == record.id) {
                tracing::warn!(id = %record.id, name = %record.name, "duplicate catalog id dropped");
                continue;
            }
            items.push(record);
        }
        Self { items }
    }

    /// All items in the snapshot.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Case-insensitive name filter used by the dashboard search box.
    /// An empty query returns everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The built-in seed menu served until a real catalog source exists.
    #[must_use]
    pub fn sample_menu() -> Self {
        Self::new(vec![
            CatalogItem {
                id: ItemId::new(1),
                name: "Pizza Margherita".to_owned(),
                unit_price: Price::from_cents(800),
                image: "https://source.unsplash.com/400x300/?pizza".to_owned(),
                promo: Some("10% off".to_owned()),
            },
            CatalogItem {
                id: ItemId::new(2),
                name: "Burger Deluxe".to_owned(),
                unit_price: Price::from_cents(500),
                image: "https://source.unsplash.com/400x300/?burger".to_owned(),
                promo: Some("Buy 1 Get 1".to_owned()),
            },
            CatalogItem {
                id: ItemId::new(3),
                name: "Pasta Alfredo".to_owned(),
                unit_price: Price::from_cents(700),
                image: "https://source.unsplash.com/400x300/?pasta".to_owned(),
                promo: Some("20% off".to_owned()),
            },
            CatalogItem {
                id: ItemId::new(4),
                name: "Sushi Platter".to_owned(),
                unit_price: Price::from_cents(1200),
                image: "https://source.unsplash.com/400x300/?sushi".to_owned(),
                promo: Some("Special Combo".to_owned()),
            },
        ])
    }
}
