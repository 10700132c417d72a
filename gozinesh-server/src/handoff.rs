//! Pending-handoff registry.
//!
//! When a user confirms an interview submission, the rendered report is
//! parked here under an opaque token and delivered to the administrator
//! with accept/ignore buttons carrying that token. The administrator's
//! decision consumes the entry exactly once, so a double press (or two
//! administrators racing) archives at most one copy.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use gozinesh_core::{InterviewCategory, UserId};

/// Default bound on unclaimed entries; see [`HandoffRegistry::with_capacity`].
pub const DEFAULT_HANDOFF_CAPACITY: usize = 256;

/// Opaque token identifying one parked submission.
///
/// Built from the submitter id and a process-wide monotonic counter, so
/// two submissions registered within the same clock tick still get
/// distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandoffToken(String);

impl HandoffToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandoffToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HandoffToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HandoffToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A drafted submission awaiting the administrator's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHandoff {
    pub submitter: UserId,
    pub submitter_name: String,
    pub category: InterviewCategory,
    pub report: String,
}

struct Entry {
    handoff: PendingHandoff,
    /// Registration order, for oldest-first eviction.
    seq: u64,
}

/// Concurrency-safe token -> handoff map with take-or-miss semantics.
///
/// Holds at most `capacity` unclaimed entries; registering past the bound
/// evicts the oldest. Entries never expire on their own otherwise.
pub struct HandoffRegistry {
    entries: RwLock<HashMap<HandoffToken, Entry>>,
    counter: AtomicU64,
    capacity: usize,
}

impl HandoffRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HANDOFF_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Park a handoff and return its token.
    pub async fn register(&self, handoff: PendingHandoff) -> HandoffToken {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let token = HandoffToken(format!("{}-{}", handoff.submitter, seq));

        let mut entries = self.entries.write().await;
        entries.insert(token.clone(), Entry { handoff, seq });

        if entries.len() > self.capacity {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(token, _)| token.clone())
            {
                tracing::warn!(
                    "handoff registry over capacity ({}), evicting {}",
                    self.capacity,
                    oldest
                );
                entries.remove(&oldest);
            }
        }

        token
    }

    /// Atomically remove and return the entry for `token`. A second call
    /// with the same token after a successful take returns `None`.
    pub async fn take_if_present(&self, token: &HandoffToken) -> Option<PendingHandoff> {
        let mut entries = self.entries.write().await;
        entries.remove(token).map(|entry| entry.handoff)
    }

    /// Put a taken entry back under its original token.
    ///
    /// Used when archiving fails after a successful take: the buttons the
    /// administrator already has still carry this token, so the retry
    /// must find the entry again.
    pub async fn reinstate(&self, token: HandoffToken, handoff: PendingHandoff) {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write().await;
        entries.insert(token, Entry { handoff, seq });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for HandoffRegistry {
    fn default() -> Self {
        Self::new()
    }
}
