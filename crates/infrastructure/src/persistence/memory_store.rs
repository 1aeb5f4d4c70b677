//! In-memory credential store.
//!
//! A key-value holder shaped like browser local storage: string keys,
//! string values, with the credential occupying two well-known keys. Both
//! tokens are written and removed under one lock acquisition so readers
//! never observe a half-updated pair.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use aegis_application::ports::CredentialStore;
use aegis_domain::{Credential, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// String key-value store holding the session credential.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an arbitrary entry.
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Writes an arbitrary entry.
    pub fn set_item(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Removes an arbitrary entry.
    pub fn remove_item(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let access = entries.get(ACCESS_TOKEN_KEY)?.clone();
        Some(Credential::new(
            access,
            entries.get(REFRESH_TOKEN_KEY).cloned(),
        ))
    }

    fn set(&self, credential: &Credential) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(ACCESS_TOKEN_KEY.to_string(), credential.access.clone());
        match &credential.refresh {
            Some(refresh) => {
                entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh.clone());
            }
            None => {
                entries.remove(REFRESH_TOKEN_KEY);
            }
        }
    }

    fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn credential_occupies_the_well_known_keys() {
        let store = MemoryCredentialStore::new();
        store.set(&Credential::new("A1", Some("R1".to_string())));

        assert_eq!(store.get_item(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
        assert_eq!(store.get_item(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert_eq!(store.access_token().as_deref(), Some("A1"));
    }

    #[test]
    fn storing_an_access_only_credential_drops_the_stale_refresh() {
        let store = MemoryCredentialStore::new();
        store.set(&Credential::new("A1", Some("R1".to_string())));
        store.set(&Credential::access_only("A2"));

        assert_eq!(store.get_item(REFRESH_TOKEN_KEY), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn clear_removes_both_tokens_but_not_other_entries() {
        let store = MemoryCredentialStore::new();
        store.set_item("theme", "dark");
        store.set(&Credential::new("A1", Some("R1".to_string())));
        store.clear();

        assert_eq!(store.get(), None);
        assert_eq!(store.get_item("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn get_requires_an_access_token() {
        let store = MemoryCredentialStore::new();
        store.set_item(REFRESH_TOKEN_KEY, "R1");
        assert_eq!(store.get(), None);
    }
}
