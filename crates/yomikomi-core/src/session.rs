//! Local account state.
//!
//! There is no authentication: the username is whatever the user typed, kept
//! under the `user` key. The upload allow-list is a UI convenience only.

use crate::kv::{KeyValueStore, USER_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Session {
    /// Session persisted from a previous visit, if any.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        match store.get(USER_KEY) {
            Ok(Some(user)) if !user.is_empty() => Self::Authenticated(user),
            Ok(_) => Self::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored user");
                Self::Anonymous
            }
        }
    }

    /// Log in as `username`. A blank name leaves the session untouched.
    pub fn login(&mut self, store: &dyn KeyValueStore, username: &str) {
        if username.is_empty() {
            return;
        }
        if let Err(e) = store.set(USER_KEY, username) {
            tracing::warn!(error = %e, "Failed to save user");
        }
        tracing::info!(user = %username, "Logged in");
        *self = Self::Authenticated(username.to_string());
    }

    pub fn logout(&mut self, store: &dyn KeyValueStore) {
        if let Err(e) = store.remove(USER_KEY) {
            tracing::warn!(error = %e, "Failed to clear user");
        }
        *self = Self::Anonymous;
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(u) => Some(u),
        }
    }

    /// Label of the login button.
    pub fn greeting(&self) -> String {
        match self {
            Self::Anonymous => "Login".into(),
            Self::Authenticated(u) => format!("Hi, {u}"),
        }
    }

    /// Whether the upload button should be shown. Case-insensitive.
    pub fn can_upload(&self, authorized: &[String]) -> bool {
        self.username().is_some_and(|u| {
            let u = u.to_lowercase();
            authorized.iter().any(|a| a.to_lowercase() == u)
        })
    }
}
