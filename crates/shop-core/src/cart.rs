//! # Cart Engine
//!
//! The in-memory shopping cart and the two operations that mutate it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  Caller (controller)        Engine                  Cart change         │
//! │  ───────────────────        ──────                  ───────────         │
//! │                                                                         │
//! │  resolve user + item ─────► add_item(item, q) ────► push q copies      │
//! │                                                             │          │
//! │  resolve user + item ─────► remove_item(item, q) ─► drop ≤ q copies    │
//! │                                                             │          │
//! │                                                             ▼          │
//! │                                                  recompute_total()     │
//! │                                                             │          │
//! │  save(cart) ◄───────────────────────────────────────────────┘          │
//! │                                                                         │
//! │  NOTE: The engine never touches storage. Persisting is the caller's    │
//! │        explicit, separate step.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `total == Σ item.price` over `items` after every successful mutation
//! - Duplicated entries represent quantity
//! - A rejected operation leaves the cart exactly as it was
//! - Prices are never negative and the total never overflows `Money`
//!
//! ## Versions
//! `version` is the stored revision the cart was loaded at. Stores only
//! accept a save whose version still matches, then bump it with
//! [`Cart::mark_saved`]. It is not part of the serialized cart.
//!
//! ## Removal Policy
//! Removing more copies than the cart holds removes every copy present and
//! is not an error. Removing an item the cart does not hold is a no-op.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Item;
use crate::MAX_ITEM_QUANTITY;

/// A user's shopping cart.
///
/// Fields are private so the total can only change through operations that
/// recompute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    id: i64,
    user_id: i64,
    #[serde(skip)]
    version: i64,
    items: Vec<Item>,
    total: Money,
}

impl Cart {
    /// Creates an empty cart owned by `user_id`.
    pub fn new(id: i64, user_id: i64) -> Self {
        Cart {
            id,
            user_id,
            version: 0,
            items: Vec::new(),
            total: Money::zero(),
        }
    }

    /// Rebuilds a cart from persisted entries at stored `version`.
    ///
    /// The total is derived from `items`, never taken from storage.
    ///
    /// ## Errors
    /// - `InvalidPrice` if a stored entry has a negative price
    /// - `TotalOverflow` if the entries do not sum to a valid `Money`
    pub fn from_parts(id: i64, user_id: i64, version: i64, items: Vec<Item>) -> CoreResult<Self> {
        for item in &items {
            checked_price(item)?;
        }

        let mut cart = Cart {
            id,
            user_id,
            version,
            items,
            total: Money::zero(),
        };
        cart.recompute_total()?;
        Ok(cart)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Stored revision this cart was loaded at (0 for a fresh cart).
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Records the revision a store assigned when it persisted this cart.
    pub fn mark_saved(&mut self, version: i64) {
        self.version = version;
    }

    /// Entries in insertion order; duplicates represent quantity.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Number of entries (total quantity across all items).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many copies of the item with `item_id` the cart holds.
    pub fn count_of(&self, item_id: i64) -> usize {
        self.items.iter().filter(|i| i.id == item_id).count()
    }

    /// Appends `quantity` copies of `item` and recomputes the total.
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity < 1`
    /// - `QuantityTooLarge` if `quantity > MAX_ITEM_QUANTITY`
    /// - `InvalidPrice` if the item's price is negative
    /// - `TotalOverflow` if the new total would not fit in `Money`
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::{Cart, Item, Money};
    ///
    /// let mut cart = Cart::new(1, 1);
    /// let item = Item::new(1, "Shoe", Money::from_cents(1000));
    ///
    /// cart.add_item(&item, 2).unwrap();
    /// assert_eq!(cart.total().cents(), 2000);
    /// assert!(cart.add_item(&item, 0).is_err());
    /// assert_eq!(cart.len(), 2);
    /// ```
    pub fn add_item(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        let copies = checked_quantity(quantity)?;
        checked_price(item)?;

        let before = self.items.len();
        self.items.extend(std::iter::repeat(item).take(copies).cloned());

        if let Err(err) = self.recompute_total() {
            self.items.truncate(before);
            return Err(err);
        }
        Ok(())
    }

    /// Removes up to `quantity` copies of `item` (matched by id) and
    /// recomputes the total.
    ///
    /// Returns how many copies were actually removed. Asking for more than
    /// the cart holds removes all of them.
    ///
    /// ## Errors
    /// Same quantity rules as [`Cart::add_item`].
    pub fn remove_item(&mut self, item: &Item, quantity: i64) -> CoreResult<usize> {
        let mut remaining = checked_quantity(quantity)?;
        let before = self.items.len();

        self.items.retain(|existing| {
            if remaining > 0 && existing.id == item.id {
                remaining -= 1;
                false
            } else {
                true
            }
        });

        // a subset of non-negative prices always fits
        self.recompute_total()?;
        Ok(before - self.items.len())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero();
    }

    /// Sets `total` to the exact sum of entry prices.
    ///
    /// On overflow the previous total is kept and `TotalOverflow` returned.
    pub(crate) fn recompute_total(&mut self) -> CoreResult<Money> {
        self.total = Money::checked_sum(self.items.iter().map(Item::price))
            .ok_or(CoreError::TotalOverflow)?;
        Ok(self.total)
    }
}

/// Rejects items priced below zero.
fn checked_price(item: &Item) -> CoreResult<()> {
    if item.price().is_negative() {
        return Err(CoreError::InvalidPrice {
            item_id: item.id,
            cents: item.price_cents,
        });
    }
    Ok(())
}

/// Validates an operation quantity and converts it to a copy count.
fn checked_quantity(quantity: i64) -> CoreResult<usize> {
    if quantity < 1 {
        return Err(CoreError::InvalidQuantity { quantity });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    // Bounded by MAX_ITEM_QUANTITY above.
    Ok(quantity as usize)
}

// =============================================================================
// Unit Tests
// =============================================================================
