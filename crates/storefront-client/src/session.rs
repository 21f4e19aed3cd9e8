// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session state.
//!
//! One [`SessionStore`] is created per process (or per test) and shared by
//! `Arc` between the dispatcher and the front-end. Nothing is persisted.

use arc_swap::ArcSwap;
use storefront_core::{CredentialProvider, CredentialUpdater, Session};
use tracing::debug;

/// Single source of truth for the current credentials.
///
/// Every mutation swaps in a new [`Session`] snapshot, so readers never see a
/// half-applied change. Concurrent writers resolve as last write wins.
#[derive(Debug)]
pub struct SessionStore {
    state: ArcSwap<Session>,
}

impl SessionStore {
    /// An empty, logged-out session.
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(Session::default()),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Session {
        Session::clone(&self.state.load())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.load().is_logged_in()
    }

    pub fn user_name(&self) -> Option<String> {
        self.state.load().user_name.clone()
    }

    /// Replace the access token. The value is not inspected.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update(|s| s.access_token = Some(token.clone()));
    }

    pub fn set_refresh_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update(|s| s.refresh_token = Some(token.clone()));
    }

    pub fn set_user_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.update(|s| s.user_name = Some(name.clone()));
    }

    /// Clear both tokens. The display name is kept so a later login prompt
    /// can greet the returning user.
    pub fn log_out(&self) {
        self.update(|s| {
            s.access_token = None;
            s.refresh_token = None;
        });
        debug!("session tokens cleared");
    }

    fn update(&self, apply: impl Fn(&mut Session)) {
        self.state.rcu(|current| {
            let mut next = Session::clone(current);
            apply(&mut next);
            next
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.state.load().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.state.load().refresh_token.clone()
    }
}

impl CredentialUpdater for SessionStore {
    fn set_access_token(&self, token: String) {
        SessionStore::set_access_token(self, token);
    }

    fn log_out(&self) {
        SessionStore::log_out(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_empty() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(), Session::default());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn setters_replace_values_unconditionally() {
        let store = SessionStore::new();
        store.set_access_token("first");
        store.set_access_token("");
        store.set_user_name("john");
        store.set_user_name("mor_2314");

        assert_eq!(CredentialProvider::access_token(&store).as_deref(), Some(""));
        assert!(store.is_logged_in());
        assert_eq!(store.user_name().as_deref(), Some("mor_2314"));
    }

    #[test]
    fn log_out_clears_tokens_but_keeps_name() {
        let store = SessionStore::new();
        store.set_access_token("access");
        store.set_refresh_token("refresh");
        store.set_user_name("john");

        store.log_out();

        let session = store.snapshot();
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
        assert_eq!(session.user_name.as_deref(), Some("john"));
    }

    #[test]
    fn shared_store_sees_updates_through_traits() {
        let store = Arc::new(SessionStore::new());
        let updater: Arc<SessionStore> = Arc::clone(&store);

        CredentialUpdater::set_access_token(&updater, "new123".to_string());
        assert_eq!(store.access_token().as_deref(), Some("new123"));

        CredentialUpdater::log_out(&updater);
        assert!(store.access_token().is_none());
    }
}
