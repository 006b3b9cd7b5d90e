//! Browser localStorage backend for `StateStore`.
use web_sys::{Storage, window};

use crate::error::StoreError;
use crate::state::GameState;
use crate::store::{StateStore, decode, encode};

pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)
    }
}

impl StateStore for LocalStorageStore {
    fn load(&self) -> Result<Option<GameState>, StoreError> {
        let raw = self
            .storage()?
            .get_item(&self.key)
            .map_err(|_| StoreError::Unavailable)?;
        raw.as_deref().map(decode).transpose()
    }

    fn save(&mut self, state: &GameState) -> Result<(), StoreError> {
        let raw = encode(state)?;
        self.storage()?
            .set_item(&self.key, &raw)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}
