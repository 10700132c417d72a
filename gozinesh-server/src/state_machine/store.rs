//! Session store: one mutable state record per user.
//!
//! The top-level map is protected because independent users are served
//! concurrently; a single user's events arrive strictly sequentially
//! (the transport serializes them), so no per-session lock is needed.

use std::collections::HashMap;

use tokio::sync::RwLock;

use gozinesh_core::UserId;

use super::state::SessionState;

/// Thread-safe per-user session map.
///
/// Absence of an entry means the user is at the root menu: idle sessions
/// are never retained.
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, user: UserId) -> Option<SessionState> {
        let sessions = self.sessions.read().await;
        sessions.get(&user).cloned()
    }

    /// Current state, or `Idle` for a user with no session.
    pub async fn get_or_default(&self, user: UserId) -> SessionState {
        self.get(user).await.unwrap_or_default()
    }

    /// Store a state. Storing `Idle` clears the entry instead, so the map
    /// only ever holds users mid-flow.
    pub async fn put(&self, user: UserId, state: SessionState) {
        let mut sessions = self.sessions.write().await;
        if state.is_idle() {
            sessions.remove(&user);
        } else {
            sessions.insert(user, state);
        }
    }

    pub async fn clear(&self, user: UserId) -> Option<SessionState> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&user)
    }

    /// Number of users currently mid-flow.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
