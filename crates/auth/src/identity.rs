//! Credential store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use pedalshare_core::Username;

/// Accounts present in every freshly bootstrapped process.
pub const SEED_USERS: [(&str, &str); 2] = [("user", "pass123"), ("admin", "adminpass")];

/// Thread-safe username → secret mapping.
///
/// Entries are never deleted and never overwritten: registering an existing
/// username is refused.
#[derive(Debug, Default)]
pub struct IdentityStore {
    credentials: RwLock<HashMap<Username, String>>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with [`SEED_USERS`].
    pub fn with_seed_users() -> Self {
        let store = Self::new();
        for (name, secret) in SEED_USERS {
            store.register(&Username::from(name), secret);
        }
        store
    }

    /// `true` only when `username` exists and `secret` matches exactly.
    pub fn verify_credentials(&self, username: &Username, secret: &str) -> bool {
        let map = self.credentials.read().unwrap_or_else(PoisonError::into_inner);
        map.get(username).is_some_and(|stored| stored == secret)
    }

    /// Insert a new credential. Returns `false` without touching the store if
    /// the username is taken.
    pub fn register(&self, username: &Username, secret: &str) -> bool {
        let mut map = self.credentials.write().unwrap_or_else(PoisonError::into_inner);
        match map.entry(username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(secret.to_string());
                tracing::info!(username = %username, "user registered");
                true
            }
        }
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.credentials.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    fn name(s: &str) -> Username {
        Username::from(s)
    }

    #[test]
    fn seed_users_can_log_in() {
        let store = IdentityStore::with_seed_users();
        assert_eq!(store.len(), 2);
        assert!(store.verify_credentials(&name("user"), "pass123"));
        assert!(store.verify_credentials(&name("admin"), "adminpass"));
    }

    #[test]
    fn wrong_secret_or_unknown_user_is_rejected() {
        let store = IdentityStore::with_seed_users();
        assert!(!store.verify_credentials(&name("user"), "PASS123"));
        assert!(!store.verify_credentials(&name("user"), ""));
        assert!(!store.verify_credentials(&name("ghost"), "pass123"));
    }

    #[test]
    fn duplicate_registration_does_not_overwrite() {
        let store = IdentityStore::new();
        assert!(store.is_empty());
        assert!(store.register(&name("carol"), "first"));
        assert!(!store.register(&name("carol"), "second"));

        assert!(store.verify_credentials(&name("carol"), "first"));
        assert!(!store.verify_credentials(&name("carol"), "second"));
        assert!(store.contains(&name("carol")));
    }

    #[test]
    fn concurrent_registration_of_one_name_has_a_single_winner() {
        for _ in 0..50 {
            let store = Arc::new(IdentityStore::new());
            let barrier = Arc::new(Barrier::new(4));

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        store.register(&name("dave"), &format!("secret-{i}"))
                    })
                })
                .collect();

            let successes = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count();
            assert_eq!(successes, 1);
            assert_eq!(store.len(), 1);
        }
    }
}
