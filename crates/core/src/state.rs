//! Client-side state: the cart, favorites, preferences and chat history.
//!
//! Every store reads and writes through a [`Storage`], keeping values as
//! JSON text under string keys. A value that can't be decoded is treated
//! as missing.

mod cart;
mod favorites;
mod history;
mod preferences;
mod storage;

pub use cart::CartStore;
pub use favorites::FavoritesStore;
pub use history::ChatHistoryStore;
pub use preferences::{PreferencesStore, Profile, ProfileUpdate, Theme};
pub use storage::{MemoryStorage, Storage, StorageError};

use serde::Serialize;
use serde::de::DeserializeOwned;

fn load_or_default<T: DeserializeOwned + Default>(
    storage: &dyn Storage,
    key: &str,
) -> Result<T, StorageError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!("stored value under {key} is corrupt, ignoring: {err}");
            Ok(T::default())
        }
    }
}

fn store<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}
