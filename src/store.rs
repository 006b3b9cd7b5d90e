//! Persistence of `GameState`. The session never touches storage; the host
//! loads once at start-up and saves after every state change.

use crate::error::StoreError;
use crate::state::GameState;

pub trait StateStore {
    fn load(&self) -> Result<Option<GameState>, StoreError>;
    fn save(&mut self, state: &GameState) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

pub fn encode(state: &GameState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(state)?)
}

pub fn decode(raw: &str) -> Result<GameState, StoreError> {
    let state: GameState = serde_json::from_str(raw)?;
    Ok(state.normalized())
}

/// Loads the saved state, falling back to a fresh one when nothing usable is
/// stored.
pub fn load_or_new(store: &dyn StateStore, initial_coins: u32) -> GameState {
    match store.load() {
        Ok(Some(state)) => state,
        Ok(None) => GameState::new(initial_coins),
        Err(e) => {
            log::warn!("discarding saved game: {e}");
            GameState::new(initial_coins)
        }
    }
}

/// Keeps the encoded state in memory. Used by native hosts and tests.
#[derive(Default, Debug)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<GameState>, StoreError> {
        self.raw.as_deref().map(decode).transpose()
    }

    fn save(&mut self, state: &GameState) -> Result<(), StoreError> {
        self.raw = Some(encode(state)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.raw = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::default();
        let mut s = GameState::new(20);
        s.streak = 2;
        s.is_dropping = true;
        store.save(&s).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.streak, 2);
        assert!(!loaded.is_dropping);
    }

    #[test]
    fn corrupt_entry_falls_back_to_fresh_state() {
        let store = MemoryStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
        assert_eq!(load_or_new(&store, 20), GameState::new(20));
    }

    #[test]
    fn empty_store_gives_fresh_state() {
        let store = MemoryStore::default();
        assert_eq!(load_or_new(&store, 20), GameState::new(20));
    }

    #[test]
    fn clear_forgets() {
        let mut store = MemoryStore::default();
        store.save(&GameState::new(3)).unwrap();
        store.clear().unwrap();
        assert!(store.raw().is_none());
    }
}
