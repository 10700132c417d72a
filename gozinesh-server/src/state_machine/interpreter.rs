//! Effect interpreter.
//!
//! Executes the effects returned by a transition against the messaging
//! collaborator. Delivery failures are logged and never crash the session
//! loop; when a notification to another user fails, the acting user gets
//! the generic failure notice so the problem is visible to someone.

use tracing::{error, info, warn};

use crate::messaging::{Messenger, Outgoing};

use super::effect::{Effect, LogLevel, Notice};
use super::transition::Actor;

pub async fn execute_effects(messenger: &dyn Messenger, actor: &Actor, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Reply { notice, choices } => {
                let message = Outgoing { notice, choices };
                if let Err(delivery_error) = messenger.edit_or_send(actor.user(), message).await {
                    error!(
                        "failed to reply to user {}: {}",
                        actor.user(),
                        delivery_error
                    );
                }
            }

            Effect::Notify {
                user,
                notice,
                choices,
            } => {
                let message = Outgoing { notice, choices };
                if let Err(delivery_error) = messenger.send(user, message).await {
                    error!("failed to notify user {}: {}", user, delivery_error);
                    let fallback = Outgoing {
                        notice: Notice::OperationFailed,
                        choices: Vec::new(),
                    };
                    if let Err(fallback_error) =
                        messenger.edit_or_send(actor.user(), fallback).await
                    {
                        error!(
                            "failed to report delivery failure to user {}: {}",
                            actor.user(),
                            fallback_error
                        );
                    }
                }
            }

            Effect::Log { level, message } => match level {
                LogLevel::Info => info!("{}", message),
                LogLevel::Warn => warn!("{}", message),
                LogLevel::Error => error!("{}", message),
            },
        }
    }
}
