//! In-memory feed subscriptions, scoped per user.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

/// Per-user subscription table. Lost on restart.
#[derive(Debug, Default)]
pub struct SubscriptionStore {
    users: RwLock<HashMap<String, BTreeMap<String, bool>>>,
}

impl SubscriptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `user_id` to `url`.
    pub fn add(&self, user_id: &str, url: &str) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users
            .entry(user_id.to_string())
            .or_default()
            .insert(url.to_string(), true);
    }

    /// Unsubscribe `user_id` from `url`. Returns whether it was subscribed.
    pub fn remove(&self, user_id: &str, url: &str) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let Some(subscriptions) = users.get_mut(user_id) else {
            return false;
        };
        let removed = subscriptions.remove(url).is_some();
        if subscriptions.is_empty() {
            users.remove(user_id);
        }
        removed
    }

    /// Membership map of every URL `user_id` is subscribed to.
    pub fn list(&self, user_id: &str) -> BTreeMap<String, bool> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}
