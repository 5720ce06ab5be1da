//! Persisted auth session: a bearer token plus the user profile as JSON,
//! stored under two keys in a key/value backend (browser local storage in
//! the UI, memory in tests).
//!
//! Writes happen only through [`crate::APIClient`]: login saves, logout and
//! the 401 handler clear.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::responses::{LoginResponse, UserProfile};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Minimal key/value storage, shaped after the Web Storage API.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut items =
            self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        let mut items =
            self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// The stored user. A profile that no longer parses reads as absent;
    /// the token stays until logout, a 401 or a validation that rewrites it.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {e}");
                None
            }
        }
    }

    pub(crate) fn save(&self, login: &LoginResponse) {
        self.storage.set_item(TOKEN_KEY, &login.token);
        self.save_user(&login.profile());
    }

    pub(crate) fn save_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(json) => self.storage.set_item(USER_KEY, &json),
            Err(e) => tracing::error!("Failed to serialize user: {e}"),
        }
    }

    pub(crate) fn clear(&self) {
        self.storage.remove_item(TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> LoginResponse {
        LoginResponse {
            token: "abc".into(),
            username: "alice".into(),
            is_admin: true,
        }
    }

    #[test]
    fn save_then_clear() {
        let session = SessionStore::in_memory();
        assert_eq!(session.token(), None);

        session.save(&alice());
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.user(), Some(alice().profile()));

        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
    }

    #[test]
    fn user_is_stored_as_camel_case_json() {
        let storage = Arc::new(MemoryStorage::default());
        let session = SessionStore::new(storage.clone());
        session.save(&alice());
        assert_eq!(
            storage.get_item(USER_KEY).as_deref(),
            Some(r#"{"username":"alice","isAdmin":true}"#)
        );
    }

    #[test]
    fn corrupt_user_reads_as_absent_without_clearing() {
        let storage = Arc::new(MemoryStorage::default());
        storage.set_item(TOKEN_KEY, "abc");
        storage.set_item(USER_KEY, "{not json");
        let session = SessionStore::new(storage.clone());

        assert_eq!(session.user(), None);
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(storage.get_item(USER_KEY).as_deref(), Some("{not json"));

        session.save_user(&alice().profile());
        assert_eq!(session.user(), Some(alice().profile()));
    }
}
