//! Archive browser transitions (password gated).
//!
//! The password is compared with plain equality and a mismatch simply
//! re-prompts; there is no lockout. Browsing shows at most the five most
//! recent submissions per filter and reports how many older ones exist
//! instead of truncating silently.

use gozinesh_core::{ArchiveFilter, InterviewCategory, UserId};

use super::{main_menu, repo_failure, unhandled, Actor, FlowContext, TransitionResult};
use crate::state_machine::effect::{Effect, Notice};
use crate::state_machine::event::{Action, Event};
use crate::state_machine::state::SessionState;

/// Most submissions displayed for one filter; older entries are counted.
pub const MAX_SHOWN: usize = 5;

pub async fn handle(
    ctx: &FlowContext<'_>,
    _actor: &Actor,
    state: SessionState,
    event: Event,
) -> TransitionResult {
    match (state, event) {
        (SessionState::AwaitingPassword, Event::Text(password)) => {
            if password == ctx.config.archive_password {
                list_users(ctx, SessionState::AwaitingPassword).await
            } else {
                TransitionResult::new(
                    SessionState::AwaitingPassword,
                    vec![Effect::reply(Notice::PasswordIncorrect)],
                )
            }
        }

        (SessionState::ListingArchivedUsers, Event::Selected(Action::ViewUser(user))) => {
            category_menu(ctx, user, SessionState::ListingArchivedUsers).await
        }

        (SessionState::ListingArchivedUsers, Event::Selected(Action::BackToMain)) => {
            TransitionResult::new(SessionState::Idle, vec![main_menu()])
        }

        (
            SessionState::ChoosingArchiveCategory { user, user_name },
            Event::Selected(Action::Filter(filter)),
        ) => {
            let submissions = match ctx.repo.list_submissions(user, filter).await {
                Ok(submissions) => submissions,
                Err(error) => {
                    return repo_failure(
                        SessionState::ChoosingArchiveCategory { user, user_name },
                        error,
                    )
                }
            };

            let nav = vec![Action::ViewUser(user), Action::BackToUserList];
            let effect = if submissions.is_empty() {
                Effect::menu(Notice::NoSubmissionsMatched { filter }, nav)
            } else {
                let older = submissions.len().saturating_sub(MAX_SHOWN);
                let shown = submissions.into_iter().take(MAX_SHOWN).collect();
                Effect::menu(Notice::Submissions { shown, older }, nav)
            };
            TransitionResult::new(
                SessionState::ShowingSubmissions { user, user_name },
                vec![effect],
            )
        }

        (
            SessionState::ChoosingArchiveCategory { user, user_name },
            Event::Selected(Action::BackToUserList),
        ) => {
            list_users(
                ctx,
                SessionState::ChoosingArchiveCategory { user, user_name },
            )
            .await
        }

        (
            SessionState::ShowingSubmissions { user, user_name },
            Event::Selected(Action::ViewUser(target)),
        ) => {
            category_menu(
                ctx,
                target,
                SessionState::ShowingSubmissions { user, user_name },
            )
            .await
        }

        (
            SessionState::ShowingSubmissions { user, user_name },
            Event::Selected(Action::BackToUserList),
        ) => {
            list_users(ctx, SessionState::ShowingSubmissions { user, user_name }).await
        }

        (state, event) => unhandled(state, &event),
    }
}

/// Show the archived-user list, or report an empty archive and return to
/// the root menu.
async fn list_users(ctx: &FlowContext<'_>, prior: SessionState) -> TransitionResult {
    let users = match ctx.repo.list_archived_users().await {
        Ok(users) => users,
        Err(error) => return repo_failure(prior, error),
    };

    if users.is_empty() {
        return TransitionResult::new(
            SessionState::Idle,
            vec![Effect::reply(Notice::ArchiveEmpty), main_menu()],
        );
    }

    let mut choices: Vec<Action> = users.iter().map(|u| Action::ViewUser(u.id)).collect();
    choices.push(Action::BackToMain);
    TransitionResult::new(
        SessionState::ListingArchivedUsers,
        vec![Effect::menu(Notice::ArchivedUserList { users }, choices)],
    )
}

/// Show the per-user filter menu, resolving the display name from the
/// archive.
async fn category_menu(
    ctx: &FlowContext<'_>,
    user: UserId,
    prior: SessionState,
) -> TransitionResult {
    let users = match ctx.repo.list_archived_users().await {
        Ok(users) => users,
        Err(error) => return repo_failure(prior, error),
    };
    let user_name = users
        .into_iter()
        .find(|u| u.id == user)
        .map(|u| u.name)
        .unwrap_or_else(|| "unknown".to_string());

    let choices = vec![
        Action::Filter(ArchiveFilter::Kind(InterviewCategory::Personal)),
        Action::Filter(ArchiveFilter::Kind(InterviewCategory::Political)),
        Action::Filter(ArchiveFilter::Kind(InterviewCategory::Career)),
        Action::Filter(ArchiveFilter::All),
        Action::BackToUserList,
    ];
    TransitionResult::new(
        SessionState::ChoosingArchiveCategory {
            user,
            user_name: user_name.clone(),
        },
        vec![Effect::menu(Notice::ArchiveCategoryMenu { user_name }, choices)],
    )
}
