//! Messaging collaborator contract.
//!
//! The transport owns all wording, button labels and localization; the
//! engine hands it render instructions ([`Notice`]) plus the typed action
//! codes to attach as buttons.

use std::fmt;

use async_trait::async_trait;

use gozinesh_core::UserId;

use crate::state_machine::effect::Notice;
use crate::state_machine::event::Action;

/// One outgoing message: a render instruction and the buttons to offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub notice: Notice,
    pub choices: Vec<Action>,
}

/// A delivery failure. Never fatal: the engine logs it and the session
/// loop continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    Unavailable { message: String },
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { message } => write!(f, "message delivery failed: {}", message),
        }
    }
}

impl std::error::Error for MessagingError {}

/// The messaging transport as the engine sees it.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Show `message` to `user` by editing their current menu message in
    /// place; when the previous message no longer supports in-place
    /// editing, the implementation falls back to sending a new message.
    async fn edit_or_send(&self, user: UserId, message: Outgoing) -> Result<(), MessagingError>;

    /// Send a fresh message to an arbitrary user, who need not be the one
    /// currently acting.
    async fn send(&self, user: UserId, message: Outgoing) -> Result<(), MessagingError>;
}

/// How a recorded delivery was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    EditOrSend,
    Send,
}

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub user: UserId,
    pub kind: DeliveryKind,
    pub message: Outgoing,
}

/// Messenger that records every delivery instead of sending it.
///
/// Used by the test suite and for dry runs against a real repository.
#[derive(Default)]
pub struct RecordingMessenger {
    deliveries: tokio::sync::RwLock<Vec<Delivery>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.read().await.clone()
    }

    /// Deliveries addressed to one user, in order.
    pub async fn deliveries_for(&self, user: UserId) -> Vec<Delivery> {
        self.deliveries
            .read()
            .await
            .iter()
            .filter(|d| d.user == user)
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        self.deliveries.write().await.clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn edit_or_send(&self, user: UserId, message: Outgoing) -> Result<(), MessagingError> {
        self.deliveries.write().await.push(Delivery {
            user,
            kind: DeliveryKind::EditOrSend,
            message,
        });
        Ok(())
    }

    async fn send(&self, user: UserId, message: Outgoing) -> Result<(), MessagingError> {
        self.deliveries.write().await.push(Delivery {
            user,
            kind: DeliveryKind::Send,
            message,
        });
        Ok(())
    }
}
