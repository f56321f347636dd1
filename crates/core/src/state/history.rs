use std::sync::Arc;

use shopit_model::Transcript;

use super::{Storage, StorageError, store};

/// The persisted chat transcript of a user.
#[derive(Clone)]
pub struct ChatHistoryStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl ChatHistoryStore {
    /// Creates the chat history of `user_id`.
    pub fn new(storage: Arc<dyn Storage>, user_id: &str) -> Self {
        Self {
            storage,
            key: format!("chat-history-{user_id}"),
        }
    }

    /// Loads the saved transcript.
    ///
    /// Returns `None` when nothing was saved, the saved transcript is empty,
    /// or it can't be decoded.
    pub fn load(&self) -> Result<Option<Transcript>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Transcript>(&raw) {
            Ok(transcript) if transcript.is_empty() => Ok(None),
            Ok(transcript) => Ok(Some(transcript)),
            Err(err) => {
                error!("failed to parse saved chat history: {err}");
                Ok(None)
            }
        }
    }

    /// Saves `transcript`. Empty transcripts are not written.
    pub fn save(&self, transcript: &Transcript) -> Result<(), StorageError> {
        if transcript.is_empty() {
            return Ok(());
        }
        store(self.storage.as_ref(), &self.key, transcript)
    }

    /// Deletes the saved transcript.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use shopit_model::Message;

    use super::*;
    use crate::state::MemoryStorage;

    fn history() -> (Arc<MemoryStorage>, ChatHistoryStore) {
        let storage = Arc::new(MemoryStorage::new());
        let history = ChatHistoryStore::new(storage.clone(), "u1");
        (storage, history)
    }

    #[test]
    fn test_save_and_load() {
        let (storage, history) = history();
        assert_eq!(history.load().unwrap(), None);

        history.save(&Transcript::new()).unwrap();
        assert_eq!(storage.get("chat-history-u1").unwrap(), None);

        let transcript =
            Transcript::from(vec![Message::user("msg:0", "Dinner ideas?")]);
        history.save(&transcript).unwrap();
        assert_eq!(history.load().unwrap(), Some(transcript));

        history.clear().unwrap();
        assert_eq!(history.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_or_empty_history() {
        let (storage, history) = history();
        storage.set("chat-history-u1", "[{\"id\":").unwrap();
        assert_eq!(history.load().unwrap(), None);

        storage.set("chat-history-u1", "[]").unwrap();
        assert_eq!(history.load().unwrap(), None);
    }
}
