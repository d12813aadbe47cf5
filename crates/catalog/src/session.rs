use std::collections::BTreeMap;

use crate::error::SessionError;

/// Key under which the intro records that it has already played.
pub const VISITED_KEY: &str = "portfolio_visited";

/// Per-session key/value storage (the browser's `sessionStorage`).
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<bool, SessionError>;
}

pub fn has_visited(store: &dyn SessionStore) -> Result<bool, SessionError> {
    Ok(store.get(VISITED_KEY)?.as_deref() == Some("true"))
}

pub fn mark_visited(store: &mut dyn SessionStore) -> Result<(), SessionError> {
    store.set(VISITED_KEY, "true")
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    entries: BTreeMap<String, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, SessionError> {
        Ok(self.entries.remove(key).is_some())
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::SessionStore;
    use crate::error::SessionError;

    /// `window.sessionStorage`, optionally namespaced by a key prefix.
    #[derive(Debug, Default)]
    pub struct BrowserSessionStore {
        key_prefix: String,
    }

    impl BrowserSessionStore {
        pub fn new() -> Result<Self, SessionError> {
            Self::with_prefix("")
        }

        /// Fails fast when storage is disabled (e.g. some private modes).
        pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, SessionError> {
            window_session_storage()?;
            Ok(Self {
                key_prefix: prefix.into(),
            })
        }

        fn key(&self, key: &str) -> String {
            format!("{}{}", self.key_prefix, key)
        }
    }

    impl SessionStore for BrowserSessionStore {
        fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
            window_session_storage()?
                .get_item(&self.key(key))
                .map_err(|e| SessionError::Io(format!("get_item failed: {:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
            window_session_storage()?
                .set_item(&self.key(key), value)
                .map_err(|e| SessionError::Io(format!("set_item failed: {:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<bool, SessionError> {
            let storage = window_session_storage()?;
            let k = self.key(key);
            let existed = storage
                .get_item(&k)
                .map_err(|e| SessionError::Io(format!("get_item failed: {:?}", e)))?
                .is_some();
            storage
                .remove_item(&k)
                .map_err(|e| SessionError::Io(format!("remove_item failed: {:?}", e)))?;
            Ok(existed)
        }
    }

    fn window_session_storage() -> Result<web_sys::Storage, SessionError> {
        let win = web_sys::window().ok_or(SessionError::StorageUnavailable)?;
        win.session_storage()
            .map_err(|e| SessionError::Io(format!("sessionStorage error: {:?}", e)))?
            .ok_or(SessionError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSessionStore;
