use crate::core::error::CartError;
use crate::models::cart::CartLine;
use crate::models::product::Product;
use crate::storage::{read_json, write_json, KeyValueStore, CART_ITEMS_KEY};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Cart line items, unique by product ID and kept in insertion order
///
/// No line ever holds a quantity of 0: a decrement that would reach 0
/// removes the line instead. The full collection is written to storage after
/// every mutation.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    lines: Mutex<Vec<CartLine>>,
}

impl CartStore {
    /// Create the store, restoring lines from storage
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut lines = read_json::<Vec<CartLine>>(storage.as_ref(), CART_ITEMS_KEY).unwrap_or_default();

        let loaded = lines.len();
        lines.retain(|line| line.quantity > 0);
        if lines.len() < loaded {
            warn!(dropped = loaded - lines.len(), "Dropped stored cart lines with zero quantity");
        }

        Self {
            storage,
            lines: Mutex::new(lines),
        }
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().clone()
    }

    pub fn get(&self, product_id: &str) -> Option<CartLine> {
        self.lock().iter().find(|line| line.id == product_id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Add one unit of a product, creating the line on first add
    pub fn add_to_cart(&self, product: &Product) -> Result<CartLine, CartError> {
        let id = product.id.clone().ok_or(CartError::MissingIdentifier)?;
        let mut lines = self.lock();

        let line = match lines.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                if line.quantity == u32::MAX {
                    warn!(product_id = %id, "Cart line already at maximum quantity");
                }
                line.quantity = line.quantity.saturating_add(1);
                line.clone()
            }
            None => {
                let line = CartLine::from_product(id, product);
                lines.push(line.clone());
                line
            }
        };

        self.persist(&lines);
        debug!(product_id = %line.id, quantity = line.quantity, "Added to cart");

        Ok(line)
    }

    /// Take one unit off a line, removing it when it is the last one
    ///
    /// Returns the remaining line, or None when the line is gone.
    pub fn remove_from_cart(&self, product_id: &str) -> Option<CartLine> {
        let mut lines = self.lock();

        let position = lines.iter().position(|line| line.id == product_id)?;

        let remaining = if lines[position].quantity > 1 {
            lines[position].quantity -= 1;
            Some(lines[position].clone())
        } else {
            lines.remove(position);
            None
        };

        self.persist(&lines);
        debug!(product_id, remaining = ?remaining.as_ref().map(|l| l.quantity), "Removed from cart");

        remaining
    }

    /// Drop a line whatever its quantity; returns whether a line was removed
    pub fn remove_item_completely(&self, product_id: &str) -> bool {
        let mut lines = self.lock();

        let before = lines.len();
        lines.retain(|line| line.id != product_id);
        let removed = lines.len() < before;

        if removed {
            self.persist(&lines);
            debug!(product_id, "Line removed from cart");
        }

        removed
    }

    pub fn clear_cart(&self) {
        let mut lines = self.lock();
        lines.clear();
        self.persist(&lines);

        info!("Cart cleared");
    }

    /// Total number of units across all lines, capped at `u32::MAX`
    pub fn cart_count(&self) -> u32 {
        self.lock()
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of price times quantity; lines without a price count as 0
    pub fn cart_total(&self) -> f64 {
        self.lock().iter().map(CartLine::subtotal).sum()
    }

    fn persist(&self, lines: &[CartLine]) {
        write_json(self.storage.as_ref(), CART_ITEMS_KEY, lines);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
