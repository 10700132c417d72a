//! Conversational flow engine for the gozinesh vetting bot.
//!
//! Drives four fixed multi-step flows over a message-based transport:
//! the interview Q&A, the admin question-design wizard, the regulations
//! test with negative marking, and the password-gated archive browser.
//! The transport and the durable store are external collaborators behind
//! the [`messaging::Messenger`] and
//! [`state_machine::QuestionRepository`] traits.

pub mod config;
pub mod engine;
pub mod handoff;
pub mod messaging;
pub mod scoring;
pub mod state_machine;

pub use config::Config;
pub use engine::{Command, FlowEngine, Inbound};
pub use handoff::{HandoffRegistry, HandoffToken, PendingHandoff};
pub use messaging::{
    Delivery, DeliveryKind, Messenger, MessagingError, Outgoing, RecordingMessenger,
};
