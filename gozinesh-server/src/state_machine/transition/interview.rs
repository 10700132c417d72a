//! Interview flow transitions.
//!
//! Kind selection (with a topic sub-menu for political interviews), one
//! free-text answer per question, then an explicit send/discard decision.
//! A confirmed submission is parked in the handoff registry and delivered
//! to the administrator; the submitter's session is cleared either way.

use gozinesh_core::{report, InterviewCategory, PoliticalTopic};

use super::{
    interview_kind_menu, main_menu, political_topic_menu, repo_failure, unhandled, Actor,
    FlowContext, TransitionResult,
};
use crate::handoff::PendingHandoff;
use crate::state_machine::effect::{Effect, Notice};
use crate::state_machine::event::{Action, Event};
use crate::state_machine::state::SessionState;

pub async fn handle(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    state: SessionState,
    event: Event,
) -> TransitionResult {
    match (state, event) {
        (SessionState::ChoosingInterviewKind, Event::Selected(Action::ChooseKind(category))) => {
            if category.requires_topic() {
                TransitionResult::new(
                    SessionState::ChoosingPoliticalTopic,
                    vec![political_topic_menu()],
                )
            } else {
                begin_questions(ctx, category, None).await
            }
        }

        (SessionState::ChoosingInterviewKind, Event::Selected(Action::BackToMain)) => {
            TransitionResult::new(SessionState::Idle, vec![main_menu()])
        }

        (SessionState::ChoosingPoliticalTopic, Event::Selected(Action::ChooseTopic(topic))) => {
            begin_questions(ctx, InterviewCategory::Political, Some(topic)).await
        }

        (SessionState::ChoosingPoliticalTopic, Event::Selected(Action::BackToInterviewMenu)) => {
            TransitionResult::new(
                SessionState::ChoosingInterviewKind,
                vec![interview_kind_menu()],
            )
        }

        (
            SessionState::AnsweringQuestions {
                category,
                topic,
                questions,
                mut answers,
            },
            Event::Text(answer),
        ) => {
            answers.push(answer);
            if answers.len() < questions.len() {
                let next = &questions[answers.len()];
                let prompt = Effect::reply(Notice::InterviewQuestion {
                    number: answers.len() + 1,
                    total: questions.len(),
                    text: next.text.clone(),
                });
                TransitionResult::new(
                    SessionState::AnsweringQuestions {
                        category,
                        topic,
                        questions,
                        answers,
                    },
                    vec![prompt],
                )
            } else {
                TransitionResult::new(
                    SessionState::ConfirmingSubmission {
                        category,
                        topic,
                        questions,
                        answers,
                    },
                    vec![Effect::menu(
                        Notice::ConfirmSubmission,
                        vec![Action::ConfirmSend, Action::DeclineSend],
                    )],
                )
            }
        }

        (
            SessionState::ConfirmingSubmission {
                category,
                topic,
                questions,
                answers,
            },
            Event::Selected(Action::ConfirmSend),
        ) => {
            let rendered = report::interview_report(
                &actor.identity,
                category,
                topic,
                &questions,
                &answers,
            );
            let token = ctx
                .handoffs
                .register(PendingHandoff {
                    submitter: actor.user(),
                    submitter_name: actor.identity.display_name(),
                    category,
                    report: rendered.clone(),
                })
                .await;

            TransitionResult::new(
                SessionState::Idle,
                vec![
                    Effect::notify_menu(
                        ctx.config.admin,
                        Notice::HandoffReport { report: rendered },
                        vec![
                            Action::AcceptHandoff(token.clone()),
                            Action::IgnoreHandoff(token),
                        ],
                    ),
                    Effect::reply(Notice::SubmissionSent),
                    main_menu(),
                ],
            )
        }

        (SessionState::ConfirmingSubmission { .. }, Event::Selected(Action::DeclineSend)) => {
            TransitionResult::new(
                SessionState::Idle,
                vec![Effect::reply(Notice::SubmissionDiscarded), main_menu()],
            )
        }

        (state, event) => unhandled(state, &event),
    }
}

/// Load the question set for the chosen section and start answering.
///
/// An empty set is not an error: the user is informed and returned to
/// kind selection.
async fn begin_questions(
    ctx: &FlowContext<'_>,
    category: InterviewCategory,
    topic: Option<PoliticalTopic>,
) -> TransitionResult {
    let questions = match ctx.repo.list_interview_questions(category, topic).await {
        Ok(questions) => questions,
        Err(error) => {
            let prior = if topic.is_some() {
                SessionState::ChoosingPoliticalTopic
            } else {
                SessionState::ChoosingInterviewKind
            };
            return repo_failure(prior, error);
        }
    };

    if questions.is_empty() {
        return TransitionResult::new(
            SessionState::ChoosingInterviewKind,
            vec![Effect::reply(Notice::SectionEmpty), interview_kind_menu()],
        );
    }

    let first = Effect::reply(Notice::InterviewQuestion {
        number: 1,
        total: questions.len(),
        text: questions[0].text.clone(),
    });
    TransitionResult::new(
        SessionState::AnsweringQuestions {
            category,
            topic,
            questions,
            answers: Vec::new(),
        },
        vec![first],
    )
}
