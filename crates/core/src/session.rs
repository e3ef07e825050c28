//! Session tokens.
//!
//! Login produces an opaque bearer token bound to an [`Identity`]; the API
//! layer resolves the token back to the identity at the start of each request
//! and passes it explicitly into service calls. Sessions live in process
//! memory only, matching the request-scoped identity model.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::Identity;

/// In-memory token → identity map.
///
/// Poisoned-lock recovery: a panic while holding the lock can only leave the
/// map in a consistent state (single insert/remove), so poisoning is ignored.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Identity>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for `identity` and returns its bearer token.
    pub fn create(&self, identity: Identity) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(token.clone(), identity);
        token
    }

    /// Resolves a token to its identity, if the session is still live.
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(token).copied()
    }

    /// Removes a session. Returns whether the token was live.
    pub fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token).is_some()
    }
}
