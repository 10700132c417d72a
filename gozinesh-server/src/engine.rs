//! Engine facade: the single entry point the transport calls.
//!
//! Parses raw inbound updates into events, routes administrator handoff
//! decisions (which live outside any session), and runs everything else
//! through the per-user state machine.

use std::sync::Arc;

use tracing::{info, warn};

use gozinesh_core::{NewArchivedSubmission, SubmissionKind, SubmitterIdentity};

use crate::config::Config;
use crate::handoff::{HandoffRegistry, HandoffToken};
use crate::messaging::Messenger;
use crate::state_machine::interpreter::execute_effects;
use crate::state_machine::repository::QuestionRepository;
use crate::state_machine::transition::{transition, Actor, FlowContext};
use crate::state_machine::{Action, Effect, Event, Notice, SessionStore};

/// A slash-command style instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    Help,
}

/// A raw inbound update from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    /// A free-text message.
    Text(String),
    /// A button press carrying its opaque action code.
    Action(String),
}

/// The assembled flow engine.
pub struct FlowEngine {
    config: Config,
    store: SessionStore,
    handoffs: HandoffRegistry,
    repo: Arc<dyn QuestionRepository>,
    messenger: Arc<dyn Messenger>,
}

impl FlowEngine {
    pub fn new(
        config: Config,
        repo: Arc<dyn QuestionRepository>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let handoffs = HandoffRegistry::with_capacity(config.handoff_capacity);
        Self {
            config,
            store: SessionStore::new(),
            handoffs,
            repo,
            messenger,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn handoffs(&self) -> &HandoffRegistry {
        &self.handoffs
    }

    /// Process one inbound update for one user.
    ///
    /// Failures inside are logged and surfaced to the user as notices;
    /// nothing here is fatal, and one session's failure never affects
    /// another's.
    pub async fn handle(&self, identity: SubmitterIdentity, inbound: Inbound) {
        let actor = Actor::new(identity);

        let event = match inbound {
            Inbound::Command(Command::Start) => Event::Started,
            Inbound::Command(Command::Cancel) => Event::Cancelled,
            Inbound::Command(Command::Help) => {
                self.deliver(&actor, Effect::reply(Notice::Help)).await;
                return;
            }
            Inbound::Text(text) => Event::Text(text),
            Inbound::Action(code) => match Action::parse(&code) {
                Some(Action::AcceptHandoff(token)) => {
                    self.handle_handoff(&actor, token, true).await;
                    return;
                }
                Some(Action::IgnoreHandoff(token)) => {
                    self.handle_handoff(&actor, token, false).await;
                    return;
                }
                Some(action) => Event::Selected(action),
                None => {
                    warn!("ignoring unknown action code from user {}", actor.user());
                    return;
                }
            },
        };

        let state = self.store.get_or_default(actor.user()).await;
        info!(
            "processing event {} for user {} in state {}",
            event.log_summary(),
            actor.user(),
            state.tag()
        );

        let ctx = FlowContext {
            repo: &*self.repo,
            handoffs: &self.handoffs,
            config: &self.config,
        };
        let result = transition(&ctx, &actor, state, event).await;

        execute_effects(&*self.messenger, &actor, result.effects).await;
        self.store.put(actor.user(), result.state).await;
    }

    /// The administrator's accept/ignore decision on a parked submission.
    ///
    /// This never runs inside a session: the administrator did not
    /// initiate the submitter's flow, and the decision must stay
    /// race-safe if the button is pressed twice or by two people.
    async fn handle_handoff(&self, actor: &Actor, token: HandoffToken, accept: bool) {
        if !actor.is_admin(&self.config) {
            self.deliver(actor, Effect::reply(Notice::NotAuthorized))
                .await;
            return;
        }

        let handoff = match self.handoffs.take_if_present(&token).await {
            Some(handoff) => handoff,
            None => {
                self.deliver(actor, Effect::reply(Notice::HandoffAlreadyHandled))
                    .await;
                return;
            }
        };

        if !accept {
            info!("handoff {} ignored", token);
            self.deliver(actor, Effect::reply(Notice::HandoffIgnored))
                .await;
            return;
        }

        let submission = NewArchivedSubmission {
            user: handoff.submitter,
            user_name: handoff.submitter_name.clone(),
            kind: SubmissionKind::Interview(handoff.category),
            full_text: handoff.report.clone(),
        };
        match self.repo.append_submission(submission).await {
            Ok(()) => {
                info!("handoff {} archived", token);
                self.deliver(actor, Effect::reply(Notice::HandoffArchived))
                    .await;
            }
            Err(error) => {
                // The buttons the administrator holds still carry this
                // token; reinstating lets the same press be retried.
                warn!("archiving handoff {} failed: {}", token, error);
                self.handoffs.reinstate(token, handoff).await;
                self.deliver(actor, Effect::reply(Notice::OperationFailed))
                    .await;
            }
        }
    }

    async fn deliver(&self, actor: &Actor, effect: Effect) {
        execute_effects(&*self.messenger, actor, vec![effect]).await;
    }
}
