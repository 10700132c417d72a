//! Root menu transitions.
//!
//! `Idle` is the initial state and the state every flow returns to. The
//! four entry actions fan out into their flows; the design entry is
//! guarded by the administrator identity.

use super::{
    interview_kind_menu, main_menu, test_type_menu, unhandled, Actor, FlowContext,
    TransitionResult,
};
use crate::state_machine::effect::{Effect, Notice};
use crate::state_machine::event::{Action, Event};
use crate::state_machine::state::SessionState;

pub async fn handle(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    state: SessionState,
    event: Event,
) -> TransitionResult {
    match event {
        Event::Selected(Action::EnterInterview) => TransitionResult::new(
            SessionState::ChoosingInterviewKind,
            vec![interview_kind_menu()],
        ),

        // Admin-only: rejected with a notice, state unchanged.
        Event::Selected(Action::EnterDesign) => {
            if !actor.is_admin(ctx.config) {
                return TransitionResult::new(state, vec![Effect::reply(Notice::NotAuthorized)]);
            }
            TransitionResult::new(SessionState::ChoosingDesignAction, vec![super::design_menu()])
        }

        Event::Selected(Action::EnterArchive) => TransitionResult::new(
            SessionState::AwaitingPassword,
            vec![Effect::reply(Notice::PasswordPrompt)],
        ),

        Event::Selected(Action::EnterQuiz) => {
            TransitionResult::new(SessionState::ChoosingTestType, vec![test_type_menu()])
        }

        // Back-to-main while already at the root: just re-render.
        Event::Selected(Action::BackToMain) => {
            TransitionResult::new(SessionState::Idle, vec![main_menu()])
        }

        event => unhandled(state, &event),
    }
}
