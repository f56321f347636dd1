use std::sync::Arc;

use super::{Storage, StorageError, load_or_default, store};
use crate::payload::{Ingredient, aggregate};

const CART_KEY: &str = "cart";

/// The shopping cart, a list of ingredients in the order they were added.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn Storage>,
}

impl CartStore {
    /// Creates a cart backed by `storage`.
    #[inline]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Returns the raw cart items, duplicates included.
    pub fn items(&self) -> Result<Vec<Ingredient>, StorageError> {
        load_or_default(self.storage.as_ref(), CART_KEY)
    }

    /// Returns the cart items merged by name and unit.
    pub fn aggregated(&self) -> Result<Vec<Ingredient>, StorageError> {
        Ok(aggregate(&self.items()?))
    }

    /// Adds one item.
    pub fn add_item(&self, item: Ingredient) -> Result<(), StorageError> {
        self.add_items([item])
    }

    /// Adds several items at once.
    pub fn add_items(
        &self,
        items: impl IntoIterator<Item = Ingredient>,
    ) -> Result<(), StorageError> {
        let mut current = self.items()?;
        let before = current.len();
        current.extend(items);
        debug!("adding {} items to the cart", current.len() - before);
        store(self.storage.as_ref(), CART_KEY, &current)
    }

    /// Removes every item named `name`. Returns `true` if any was removed.
    pub fn remove_item(&self, name: &str) -> Result<bool, StorageError> {
        let mut current = self.items()?;
        let before = current.len();
        current.retain(|item| item.name != name);
        if current.len() == before {
            return Ok(false);
        }
        store(self.storage.as_ref(), CART_KEY, &current)?;
        Ok(true)
    }

    /// Empties the cart.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear(CART_KEY)
    }
}
