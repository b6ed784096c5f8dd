//! Shopping-cart engine.
//!
//! One cart per browsing session, owned by
//! [`BrowsingState`](crate::state::BrowsingState). Every presentation
//! surface (the dashboard badge, the cart page) reads and mutates this one
//! instance, so all of them observe identical totals.
//!
//! The engine never fails: mutations against unknown ids are no-ops, and
//! quantities cannot be observed at zero or below - a line that would drop
//! to zero is removed instead.

use quickbite_core::{ItemId, Price};

use crate::catalog::CatalogItem;

/// One row of the cart, uniquely keyed by catalog item id.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: ItemId,
    pub name: String,
    pub unit_price: Price,
    /// Always >= 1 while the line exists.
    pub quantity: u32,
    pub promo: Option<String>,
}

impl CartLine {
    /// Price of this line (`unit_price x quantity`).
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// In-memory cart: insertion-ordered lines, at most one per item id.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `qty` of a catalog item, merging into the existing line if the
    /// item is already present. A zero `qty` still adds one: a line is
    /// never created below quantity 1.
    pub fn add_or_increment(&mut self, item: &CatalogItem, qty: u32) {
        let qty = qty.max(1);
        if let Some(line) = self.lines.iter_mut().find(|line| line.item == item.id) {
            line.quantity = line.quantity.saturating_add(qty);
        } else {
            self.lines.push(CartLine {
                item: item.id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: qty,
                promo: item.promo.clone(),
            });
        }
    }

    /// Apply a signed quantity delta to a line.
    ///
    /// Unknown ids are ignored. A line whose quantity would drop to zero
    /// or below is removed outright - this one rule governs both
    /// increment and decrement, so removal-by-decrement and explicit
    /// removal are observably identical.
    pub fn change_quantity(&mut self, id: ItemId, delta: i64) {
        let Some(pos) = self.lines.iter().position(|line| line.item == id) else {
            return;
        };

        let current = self.lines.get(pos).map_or(0, |line| i64::from(line.quantity));
        let new_qty = current.saturating_add(delta);

        if new_qty <= 0 {
            self.lines.remove(pos);
        } else if let Some(line) = self.lines.get_mut(pos) {
            line.quantity = u32::try_from(new_qty).unwrap_or(u32::MAX);
        }
    }

    /// Drop a line. Idempotent: no-op when absent.
    pub fn remove(&mut self, id: ItemId) {
        self.lines.retain(|line| line.item != id);
    }

    /// Total unit count across all lines (the badge number), not the
    /// number of lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Order total, recomputed from the lines on every call. No total is
    /// ever cached.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_price).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn menu() -> Catalog {
        Catalog::sample_menu()
    }

    fn pizza(catalog: &Catalog) -> &CatalogItem {
        catalog.get(ItemId::new(1)).unwrap()
    }

    fn burger(catalog: &Catalog) -> &CatalogItem {
        catalog.get(ItemId::new(2)).unwrap()
    }

    #[test]
    fn test_add_twice_merges_into_one_line() {
        let catalog = menu();
        let mut cart = Cart::new();

        cart.add_or_increment(pizza(&catalog), 1);
        cart.add_or_increment(pizza(&catalog), 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().unwrap().quantity, 2);
        assert_eq!(cart.total_price(), Price::from_cents(1600));
    }

    #[test]
    fn test_add_zero_quantity_still_adds_one() {
        let catalog = menu();
        let mut cart = Cart::new();

        cart.add_or_increment(pizza(&catalog), 0);

        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let catalog = menu();
        let mut cart = Cart::new();
        cart.add_or_increment(pizza(&catalog), 2);
        cart.add_or_increment(burger(&catalog), 1);

        cart.change_quantity(ItemId::new(2), -1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Price::from_cents(1600));
    }

    #[test]
    fn test_quantity_never_observable_at_or_below_zero() {
        let catalog = menu();
        let mut cart = Cart::new();
        cart.add_or_increment(pizza(&catalog), 1);

        cart.change_quantity(ItemId::new(1), -5);

        assert!(cart.is_empty());
        for line in cart.lines() {
            assert!(line.quantity >= 1);
        }
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let catalog = menu();
        let mut cart = Cart::new();
        cart.add_or_increment(pizza(&catalog), 1);

        cart.change_quantity(ItemId::new(99), 3);

        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let catalog = menu();
        let mut cart = Cart::new();
        cart.add_or_increment(pizza(&catalog), 2);
        cart.add_or_increment(burger(&catalog), 1);

        cart.remove(ItemId::new(1));
        let after_once = cart.clone();
        cart.remove(ItemId::new(1));

        assert_eq!(cart.lines().len(), after_once.lines().len());
        assert_eq!(cart.total_items(), after_once.total_items());
        assert_eq!(cart.total_price(), after_once.total_price());
    }

    #[test]
    fn test_totals_recomputed_after_every_mutation() {
        let catalog = menu();
        let mut cart = Cart::new();

        cart.add_or_increment(pizza(&catalog), 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Price::from_cents(1600));

        cart.add_or_increment(burger(&catalog), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::from_cents(2100));

        cart.change_quantity(ItemId::new(1), 1);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), Price::from_cents(2900));

        cart.remove(ItemId::new(2));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::from_cents(2400));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let catalog = menu();
        let mut cart = Cart::new();
        cart.add_or_increment(burger(&catalog), 1);
        cart.add_or_increment(pizza(&catalog), 1);
        cart.add_or_increment(burger(&catalog), 1);

        let ids: Vec<ItemId> = cart.lines().iter().map(|line| line.item).collect();
        assert_eq!(ids, vec![ItemId::new(2), ItemId::new(1)]);
    }
}
