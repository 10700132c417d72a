//! Session transition logic.
//!
//! `transition` takes the current state and an event and returns the next
//! state plus rendering effects. Handlers may consult the repository and
//! the handoff registry through [`FlowContext`], but all output to users
//! is returned as effect data for the interpreter.
//!
//! Each flow has its own handler module with co-located tests:
//! - `idle`: root menu
//! - `interview`: interview Q&A and submission handoff
//! - `wizard`: admin question authoring (create / delete / quiz create)
//! - `archive`: password-gated archive browser
//! - `quiz`: regulations test with scoring and cooldown

mod archive;
mod idle;
mod interview;
mod quiz;
mod wizard;

use gozinesh_core::{InterviewCategory, PoliticalTopic, SubmitterIdentity, TestType, UserId};

use crate::config::Config;
use crate::handoff::HandoffRegistry;

use super::effect::{Effect, Notice};
use super::event::{Action, Event};
use super::repository::QuestionRepository;
use super::state::{FlowKind, SessionState};

/// Collaborators available to transition handlers.
pub struct FlowContext<'a> {
    pub repo: &'a dyn QuestionRepository,
    pub handoffs: &'a HandoffRegistry,
    pub config: &'a Config,
}

/// The user an inbound event belongs to, with the transport-supplied
/// identity used in reports.
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: SubmitterIdentity,
}

impl Actor {
    pub fn new(identity: SubmitterIdentity) -> Self {
        Self { identity }
    }

    pub fn user(&self) -> UserId {
        self.identity.id
    }

    pub fn is_admin(&self, config: &Config) -> bool {
        config.is_admin(self.user())
    }
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub state: SessionState,
    /// Effects to execute.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn no_change(state: SessionState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Dispatch an event against the current session state.
///
/// `Cancelled` is legal from every state: it unconditionally returns to
/// `Idle`, discarding all accumulated data. `Started` likewise resets to
/// the root menu.
pub async fn transition(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    state: SessionState,
    event: Event,
) -> TransitionResult {
    match event {
        Event::Cancelled => {
            return TransitionResult::new(SessionState::Idle, vec![Effect::reply(Notice::Cancelled)])
        }
        Event::Started => return TransitionResult::new(SessionState::Idle, vec![main_menu()]),
        _ => {}
    }

    match state.flow() {
        None => idle::handle(ctx, actor, state, event).await,
        Some(FlowKind::Interview) => interview::handle(ctx, actor, state, event).await,
        Some(FlowKind::Wizard) => wizard::handle(ctx, actor, state, event).await,
        Some(FlowKind::Archive) => archive::handle(ctx, actor, state, event).await,
        Some(FlowKind::Quiz) => quiz::handle(ctx, actor, state, event).await,
    }
}

/// Catch-all for (state, event) pairs no handler claims: keep the state,
/// log the event.
pub(crate) fn unhandled(state: SessionState, event: &Event) -> TransitionResult {
    let message = format!(
        "Unhandled event {} in state {}",
        event.log_summary(),
        state.tag()
    );
    TransitionResult::new(state, vec![Effect::log_warn(message)])
}

/// A repository failure: log it, show the generic failure notice, leave
/// the state unchanged so the user can retry the same step.
pub(crate) fn repo_failure(
    state: SessionState,
    error: super::repository::RepositoryError,
) -> TransitionResult {
    TransitionResult::new(
        state,
        vec![
            Effect::Log {
                level: super::effect::LogLevel::Error,
                message: format!("repository error: {}", error),
            },
            Effect::reply(Notice::OperationFailed),
        ],
    )
}

// =============================================================================
// Shared menu builders
// =============================================================================

pub(crate) fn main_menu() -> Effect {
    Effect::menu(
        Notice::MainMenu,
        vec![
            Action::EnterInterview,
            Action::EnterDesign,
            Action::EnterArchive,
            Action::EnterQuiz,
        ],
    )
}

pub(crate) fn interview_kind_menu() -> Effect {
    let mut choices: Vec<Action> = InterviewCategory::ALL
        .into_iter()
        .map(Action::ChooseKind)
        .collect();
    choices.push(Action::BackToMain);
    Effect::menu(Notice::InterviewKindMenu, choices)
}

pub(crate) fn political_topic_menu() -> Effect {
    let mut choices: Vec<Action> = PoliticalTopic::ALL
        .into_iter()
        .map(Action::ChooseTopic)
        .collect();
    choices.push(Action::BackToInterviewMenu);
    Effect::menu(Notice::PoliticalTopicMenu, choices)
}

pub(crate) fn design_menu() -> Effect {
    Effect::menu(
        Notice::DesignMenu,
        vec![
            Action::CreateInterviewQuestion,
            Action::DeleteInterviewQuestion,
            Action::CreateQuizQuestion,
            Action::BackToMain,
        ],
    )
}

pub(crate) fn create_category_menu() -> Effect {
    let mut choices: Vec<Action> = InterviewCategory::ALL
        .into_iter()
        .map(Action::CreateInCategory)
        .collect();
    choices.push(Action::BackToDesignMenu);
    Effect::menu(Notice::CreateCategoryMenu, choices)
}

pub(crate) fn create_topic_menu() -> Effect {
    let mut choices: Vec<Action> = PoliticalTopic::ALL
        .into_iter()
        .map(Action::CreateInTopic)
        .collect();
    choices.push(Action::BackToCreateMenu);
    Effect::menu(Notice::CreateTopicMenu, choices)
}

pub(crate) fn delete_category_menu() -> Effect {
    let mut choices: Vec<Action> = InterviewCategory::ALL
        .into_iter()
        .map(Action::DeleteInCategory)
        .collect();
    choices.push(Action::BackToDesignMenu);
    Effect::menu(Notice::DeleteCategoryMenu, choices)
}

pub(crate) fn delete_topic_menu() -> Effect {
    let mut choices: Vec<Action> = PoliticalTopic::ALL
        .into_iter()
        .map(Action::DeleteInTopic)
        .collect();
    choices.push(Action::BackToDeleteMenu);
    Effect::menu(Notice::DeleteTopicMenu, choices)
}

pub(crate) fn test_type_menu() -> Effect {
    let mut choices: Vec<Action> = TestType::ALL.into_iter().map(Action::StartTest).collect();
    choices.push(Action::BackToMain);
    Effect::menu(Notice::TestTypeMenu, choices)
}

pub(crate) fn test_type_menu_for_create() -> Effect {
    let mut choices: Vec<Action> = TestType::ALL
        .into_iter()
        .map(Action::CreateForTest)
        .collect();
    choices.push(Action::BackToDesignMenu);
    Effect::menu(Notice::TestTypeMenuForCreate, choices)
}
