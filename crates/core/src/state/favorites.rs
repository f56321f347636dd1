use std::sync::Arc;

use super::{Storage, StorageError, load_or_default, store};

/// The stores a user has marked as favorite, by store id.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl FavoritesStore {
    /// Creates the favorites of `user_id`.
    pub fn new(storage: Arc<dyn Storage>, user_id: &str) -> Self {
        Self {
            storage,
            key: format!("favorites-{user_id}"),
        }
    }

    /// Returns the favorite ids in the order they were added.
    pub fn ids(&self) -> Result<Vec<String>, StorageError> {
        load_or_default(self.storage.as_ref(), &self.key)
    }

    /// Returns `true` if `id` is a favorite.
    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.ids()?.iter().any(|fav| fav == id))
    }

    /// Marks `id` as favorite. Returns `false` if it already was.
    pub fn add(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.ids()?;
        if ids.iter().any(|fav| fav == id) {
            return Ok(false);
        }
        ids.push(id.to_owned());
        store(self.storage.as_ref(), &self.key, &ids)?;
        Ok(true)
    }

    /// Unmarks `id`. Returns `false` if it wasn't a favorite.
    pub fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.ids()?;
        let before = ids.len();
        ids.retain(|fav| fav != id);
        if ids.len() == before {
            return Ok(false);
        }
        store(self.storage.as_ref(), &self.key, &ids)?;
        Ok(true)
    }
}
