//! Cart aggregate
//!
//! Client-side accumulation of menu items before submission. The cart is
//! keyed by menu item id, persisted as a versioned JSON snapshot through
//! [`CartStorage`], and rehydrated on [`Cart::load`].
//!
//! The cart is not scoped to a table: one storage key per client.

mod storage;

pub use storage::{CartStorage, MemoryCartStorage};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{MenuItem, OrderCreate, OrderLineInput};

/// Storage key for the cart snapshot
pub const CART_STORAGE_KEY: &str = "table-order-cart";

/// Current snapshot schema version
///
/// - 1: bare array of `{ item, quantity }`
/// - 2: `{ version, submission_id, entries }`
pub const CART_SCHEMA_VERSION: u32 = 2;

/// Consumption tax rate used for the checkout preview
pub const TAX_RATE_PERCENT: i64 = 10;

/// Menu item snapshot with a quantity ≥ 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartEntry {
    pub fn line_total(&self) -> i64 {
        self.item.price.saturating_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    version: u32,
    submission_id: Uuid,
    entries: Vec<CartEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCart {
    Current(CartSnapshot),
    Legacy(Vec<CartEntry>),
}

/// Explicit cart service, constructed once per client
#[derive(Debug)]
pub struct Cart<S: CartStorage> {
    storage: S,
    entries: Vec<CartEntry>,
    submission_id: Uuid,
}

impl<S: CartStorage> Cart<S> {
    /// Rehydrate from storage
    ///
    /// Missing, unreadable or unparseable data yields an empty cart.
    pub fn load(storage: S) -> Self {
        let mut cart = Self {
            storage,
            entries: Vec::new(),
            submission_id: Uuid::new_v4(),
        };

        let raw = match cart.storage.read(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return cart,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                return cart;
            }
        };

        match serde_json::from_str::<StoredCart>(&raw) {
            Ok(StoredCart::Current(snapshot)) if snapshot.version == CART_SCHEMA_VERSION => {
                cart.submission_id = snapshot.submission_id;
                cart.entries = normalize(snapshot.entries);
            }
            Ok(StoredCart::Current(snapshot)) => {
                tracing::warn!(
                    version = snapshot.version,
                    "Stored cart has unknown schema version, discarding"
                );
            }
            Ok(StoredCart::Legacy(entries)) => {
                tracing::info!(entries = entries.len(), "Migrating legacy cart snapshot");
                cart.entries = normalize(entries);
                cart.persist();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored cart is not valid JSON, discarding");
            }
        }
        cart
    }

    /// Add one unit of `item`, inserting it when absent
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.entries.iter_mut().find(|e| e.item.id == item.id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => self.entries.push(CartEntry {
                item: item.clone(),
                quantity: 1,
            }),
        }
        self.persist();
    }

    /// Set the quantity of an item already in the cart
    ///
    /// `quantity <= 0` removes the entry. Items not in the cart are ignored
    /// because there is no menu snapshot to insert.
    pub fn set_quantity(&mut self, item_id: i64, quantity: i64) {
        let Some(pos) = self.entries.iter().position(|e| e.item.id == item_id) else {
            return;
        };
        if quantity <= 0 {
            self.entries.remove(pos);
        } else {
            self.entries[pos].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist();
    }

    /// Remove one unit; the entry goes away when it would reach zero
    pub fn remove_one(&mut self, item_id: i64) {
        let current = self.quantity_of(item_id);
        if current > 0 {
            self.set_quantity(item_id, i64::from(current) - 1);
        }
    }

    /// Empty the cart and start a new submission id
    ///
    /// Call only after the order was accepted.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.submission_id = Uuid::new_v4();
        self.persist();
    }

    pub fn total_amount(&self) -> i64 {
        self.entries
            .iter()
            .map(CartEntry::line_total)
            .fold(0, i64::saturating_add)
    }

    pub fn total_item_count(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.quantity)
            .fold(0, u32::saturating_add)
    }

    pub fn quantity_of(&self, item_id: i64) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item.id == item_id)
            .map_or(0, |e| e.quantity)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Idempotency key for the pending submission
    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    /// Tax shown at checkout, floor(total × 10%). Never persisted.
    pub fn tax_preview(&self) -> i64 {
        // Split so the multiplication cannot overflow near i64::MAX
        let total = self.total_amount();
        total / 100 * TAX_RATE_PERCENT + total % 100 * TAX_RATE_PERCENT / 100
    }

    pub fn total_with_tax_preview(&self) -> i64 {
        self.total_amount().saturating_add(self.tax_preview())
    }

    /// Build the submission payload
    ///
    /// Fails on an empty cart so no request is ever sent for it.
    pub fn to_order_request(
        &self,
        table_id: i64,
        special_requests: Option<String>,
    ) -> AppResult<OrderCreate> {
        if self.entries.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        let items = self
            .entries
            .iter()
            .map(|e| {
                let quantity = i32::try_from(e.quantity).map_err(|_| {
                    AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        format!("Quantity for {} is too large", e.item.name),
                    )
                })?;
                Ok(OrderLineInput {
                    menu_item_id: e.item.id,
                    quantity,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(OrderCreate {
            table_id,
            special_requests: special_requests.filter(|s| !s.trim().is_empty()),
            items,
            expected_total: Some(self.total_amount()),
            idempotency_key: Some(self.submission_id.to_string()),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        let snapshot = CartSnapshot {
            version: CART_SCHEMA_VERSION,
            submission_id: self.submission_id,
            entries: self.entries.clone(),
        };
        let raw = match serde_json::to_string(&snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.write(CART_STORAGE_KEY, &raw) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

/// Drop zero quantities and merge duplicate ids, keeping first position
fn normalize(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut out: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|e| e.quantity > 0) {
        match out.iter_mut().find(|e| e.item.id == entry.item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => out.push(entry),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
        MenuItem {
            id,
            category_id: 1,
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
            is_available: true,
            allergens: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn margherita() -> MenuItem {
        menu_item(1, "Margherita", 1680)
    }

    fn carbonara() -> MenuItem {
        menu_item(2, "Carbonara", 1580)
    }

    #[test]
    fn test_happy_path_totals() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&margherita());
        cart.add_item(&carbonara());
        cart.add_item(&carbonara());

        assert_eq!(cart.total_amount(), 4840);
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.quantity_of(2), 2);
        assert_eq!(cart.tax_preview(), 484);
        assert_eq!(cart.total_with_tax_preview(), 5324);
    }

    #[test]
    fn test_tax_preview_floors() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&menu_item(3, "Espresso", 399));
        assert_eq!(cart.tax_preview(), 39);
    }

    #[test]
    fn test_totals_saturate_instead_of_wrapping() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        let pricey = menu_item(7, "Whole Tuna", i64::MAX / 2);
        cart.add_item(&pricey);
        cart.set_quantity(7, i64::from(u32::MAX));
        cart.add_item(&margherita());
        cart.set_quantity(1, i64::from(u32::MAX));

        assert_eq!(cart.total_amount(), i64::MAX);
        assert_eq!(cart.total_item_count(), u32::MAX);
        assert!(cart.tax_preview() > 0);
        assert_eq!(cart.total_with_tax_preview(), i64::MAX);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&margherita());
        cart.set_quantity(1, 0);
        assert!(cart.is_empty());

        cart.add_item(&margherita());
        cart.set_quantity(1, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_is_idempotent() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&carbonara());
        cart.set_quantity(2, 5);
        let first = cart.entries().to_vec();
        cart.set_quantity(2, 5);
        assert_eq!(cart.entries(), first.as_slice());
        assert_eq!(cart.total_item_count(), 5);
    }

    #[test]
    fn test_set_quantity_unknown_item_is_ignored() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.set_quantity(42, 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_one() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&carbonara());
        cart.add_item(&carbonara());
        cart.remove_one(2);
        assert_eq!(cart.quantity_of(2), 1);
        cart.remove_one(2);
        assert_eq!(cart.quantity_of(2), 0);
        assert!(cart.is_empty());
        // no-op on absent entry
        cart.remove_one(2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_hold_over_mixed_sequences() {
        let items = [margherita(), carbonara(), menu_item(3, "Tiramisu", 780)];
        let mut cart = Cart::load(MemoryCartStorage::new());
        for step in 0..60i64 {
            let item = &items[(step % 3) as usize];
            match step % 5 {
                0 | 1 => cart.add_item(item),
                2 => cart.remove_one(item.id),
                3 => cart.set_quantity(item.id, step % 4),
                _ => cart.add_item(item),
            }
            let count: u32 = cart.entries().iter().map(|e| e.quantity).sum();
            let amount: i64 = cart
                .entries()
                .iter()
                .map(|e| e.item.price * i64::from(e.quantity))
                .sum();
            assert_eq!(cart.total_item_count(), count);
            assert_eq!(cart.total_amount(), amount);
            assert!(cart.entries().iter().all(|e| e.quantity >= 1));
        }
    }

    #[test]
    fn test_rehydrates_state_before_reload() {
        let storage = MemoryCartStorage::new();
        let mut cart = Cart::load(storage.clone());
        cart.add_item(&margherita());
        cart.add_item(&carbonara());
        cart.set_quantity(2, 2);
        let before = cart.entries().to_vec();
        let submission_id = cart.submission_id();
        drop(cart);

        let reloaded = Cart::load(storage);
        assert_eq!(reloaded.entries(), before.as_slice());
        assert_eq!(reloaded.submission_id(), submission_id);
        assert_eq!(reloaded.total_amount(), 4840);
    }

    #[test]
    fn test_legacy_array_snapshot_is_migrated() {
        let storage = MemoryCartStorage::new();
        let legacy = serde_json::to_string(&vec![
            CartEntry {
                item: margherita(),
                quantity: 2,
            },
            CartEntry {
                item: carbonara(),
                quantity: 0,
            },
        ])
        .unwrap();
        storage.write(CART_STORAGE_KEY, &legacy).unwrap();

        let cart = Cart::load(storage.clone());
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.entries().len(), 1);

        let raw = storage.read(CART_STORAGE_KEY).unwrap().unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["version"], CART_SCHEMA_VERSION);
    }

    #[test]
    fn test_garbage_snapshot_starts_empty() {
        let storage = MemoryCartStorage::new();
        storage.write(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = Cart::load(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_version_is_discarded() {
        let storage = MemoryCartStorage::new();
        let raw = format!(
            r#"{{"version":99,"submission_id":"{}","entries":[]}}"#,
            Uuid::new_v4()
        );
        storage.write(CART_STORAGE_KEY, &raw).unwrap();
        assert!(Cart::load(storage).is_empty());
    }

    #[test]
    fn test_clear_resets_submission_id() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&margherita());
        let before = cart.submission_id();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), 0);
        assert_ne!(cart.submission_id(), before);
    }

    #[test]
    fn test_empty_cart_cannot_build_order() {
        let cart = Cart::load(MemoryCartStorage::new());
        let err = cart.to_order_request(1, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_order_request_carries_totals_and_key() {
        let mut cart = Cart::load(MemoryCartStorage::new());
        cart.add_item(&margherita());
        cart.add_item(&carbonara());
        cart.add_item(&carbonara());

        let req = cart
            .to_order_request(5, Some("  ".to_string()))
            .unwrap();
        assert_eq!(req.table_id, 5);
        assert_eq!(req.special_requests, None);
        assert_eq!(req.expected_total, Some(4840));
        assert_eq!(
            req.idempotency_key,
            Some(cart.submission_id().to_string())
        );
        assert_eq!(
            req.items,
            vec![
                OrderLineInput {
                    menu_item_id: 1,
                    quantity: 1
                },
                OrderLineInput {
                    menu_item_id: 2,
                    quantity: 2
                },
            ]
        );
    }

    #[test]
    fn test_cart_is_shared_across_tables() {
        // Known gap: the storage key is not per table, so a cart started at
        // table 1 is still there when the same client opens table 2.
        let storage = MemoryCartStorage::new();
        let mut at_table_one = Cart::load(storage.clone());
        at_table_one.add_item(&margherita());

        let at_table_two = Cart::load(storage);
        assert_eq!(at_table_two.quantity_of(1), 1);
        let req = at_table_two.to_order_request(2, None).unwrap();
        assert_eq!(req.table_id, 2);
    }
}
