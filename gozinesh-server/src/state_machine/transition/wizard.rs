//! Question-design wizard transitions (admin only).
//!
//! Three sub-flows: create an interview question (with an add-another
//! loop), delete an interview question by 1-based ordinal against a
//! cached list, and create a quiz question in five sequential prompts
//! followed by the correct-option choice.

use gozinesh_core::{InterviewCategory, PoliticalTopic, QuizDraft};

use super::{
    create_category_menu, create_topic_menu, delete_category_menu, delete_topic_menu, design_menu,
    main_menu, repo_failure, test_type_menu_for_create, unhandled, Actor, FlowContext,
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
    // Every wizard entry point is admin-guarded; a session can only be in
    // a wizard state if the admin opened it, but the identity is checked
    // on every event anyway.
    if !actor.is_admin(ctx.config) {
        return TransitionResult::new(state, vec![Effect::reply(Notice::NotAuthorized)]);
    }

    match (state, event) {
        // =====================================================================
        // Wizard root
        // =====================================================================
        (SessionState::ChoosingDesignAction, Event::Selected(Action::CreateInterviewQuestion)) => {
            TransitionResult::new(
                SessionState::ChoosingCreateCategory,
                vec![create_category_menu()],
            )
        }

        (SessionState::ChoosingDesignAction, Event::Selected(Action::DeleteInterviewQuestion)) => {
            TransitionResult::new(
                SessionState::ChoosingDeleteCategory,
                vec![delete_category_menu()],
            )
        }

        (SessionState::ChoosingDesignAction, Event::Selected(Action::CreateQuizQuestion)) => {
            TransitionResult::new(
                SessionState::ChoosingTestTypeForCreate,
                vec![test_type_menu_for_create()],
            )
        }

        (SessionState::ChoosingDesignAction, Event::Selected(Action::BackToMain)) => {
            TransitionResult::new(SessionState::Idle, vec![main_menu()])
        }

        // =====================================================================
        // Sub-flow A: create interview question
        // =====================================================================
        (
            SessionState::ChoosingCreateCategory,
            Event::Selected(Action::CreateInCategory(category)),
        ) => {
            if category.requires_topic() {
                TransitionResult::new(SessionState::ChoosingCreateTopic, vec![create_topic_menu()])
            } else {
                prompt_for_text(category, None)
            }
        }

        (SessionState::ChoosingCreateCategory, Event::Selected(Action::BackToDesignMenu)) => {
            TransitionResult::new(SessionState::ChoosingDesignAction, vec![design_menu()])
        }

        (SessionState::ChoosingCreateTopic, Event::Selected(Action::CreateInTopic(topic))) => {
            prompt_for_text(InterviewCategory::Political, Some(topic))
        }

        (SessionState::ChoosingCreateTopic, Event::Selected(Action::BackToCreateMenu)) => {
            TransitionResult::new(
                SessionState::ChoosingCreateCategory,
                vec![create_category_menu()],
            )
        }

        (SessionState::AwaitingQuestionText { category, topic }, Event::Text(text)) => {
            // Duplicate text is a silent no-op in the repository, not an
            // error surfaced here.
            match ctx
                .repo
                .insert_interview_question(category, topic, &text)
                .await
            {
                Ok(()) => TransitionResult::new(
                    SessionState::AskingAddAnother { category, topic },
                    vec![
                        Effect::reply(Notice::QuestionAdded),
                        Effect::menu(
                            Notice::AskAddAnother,
                            vec![Action::AddAnotherYes, Action::AddAnotherNo],
                        ),
                    ],
                ),
                Err(error) => {
                    repo_failure(SessionState::AwaitingQuestionText { category, topic }, error)
                }
            }
        }

        (
            SessionState::AskingAddAnother { category, topic },
            Event::Selected(Action::AddAnotherYes),
        ) => prompt_for_text(category, topic),

        (SessionState::AskingAddAnother { .. }, Event::Selected(Action::AddAnotherNo)) => {
            TransitionResult::new(
                SessionState::Idle,
                vec![Effect::reply(Notice::WizardFinished), main_menu()],
            )
        }

        // =====================================================================
        // Sub-flow B: delete interview question
        // =====================================================================
        (
            SessionState::ChoosingDeleteCategory,
            Event::Selected(Action::DeleteInCategory(category)),
        ) => {
            if category.requires_topic() {
                TransitionResult::new(SessionState::ChoosingDeleteTopic, vec![delete_topic_menu()])
            } else {
                begin_deletion(ctx, category, None).await
            }
        }

        (SessionState::ChoosingDeleteCategory, Event::Selected(Action::BackToDesignMenu)) => {
            TransitionResult::new(SessionState::ChoosingDesignAction, vec![design_menu()])
        }

        (SessionState::ChoosingDeleteTopic, Event::Selected(Action::DeleteInTopic(topic))) => {
            begin_deletion(ctx, InterviewCategory::Political, Some(topic)).await
        }

        (SessionState::ChoosingDeleteTopic, Event::Selected(Action::BackToDeleteMenu)) => {
            TransitionResult::new(
                SessionState::ChoosingDeleteCategory,
                vec![delete_category_menu()],
            )
        }

        (
            SessionState::ListingForDeletion {
                category,
                topic,
                mut questions,
            },
            Event::Text(text),
        ) => {
            let ordinal: usize = match text.trim().parse() {
                Ok(n) => n,
                Err(_) => {
                    // Retry in place; the list is unchanged.
                    return TransitionResult::new(
                        SessionState::ListingForDeletion {
                            category,
                            topic,
                            questions,
                        },
                        vec![Effect::reply(Notice::ExpectedNumber)],
                    );
                }
            };

            if ordinal == 0 || ordinal > questions.len() {
                return TransitionResult::new(
                    SessionState::ListingForDeletion {
                        category,
                        topic,
                        questions,
                    },
                    vec![Effect::reply(Notice::OrdinalOutOfRange)],
                );
            }

            let target = questions[ordinal - 1].clone();
            if let Err(error) = ctx.repo.delete_interview_question(target.id).await {
                return repo_failure(
                    SessionState::ListingForDeletion {
                        category,
                        topic,
                        questions,
                    },
                    error,
                );
            }
            questions.remove(ordinal - 1);

            let deleted = Effect::reply(Notice::QuestionDeleted {
                text: target.text,
            });
            if questions.is_empty() {
                TransitionResult::new(
                    SessionState::ChoosingDeleteCategory,
                    vec![
                        deleted,
                        Effect::reply(Notice::NothingLeftToDelete),
                        delete_category_menu(),
                    ],
                )
            } else {
                let listing = deletion_list(category, topic, &questions);
                TransitionResult::new(
                    SessionState::ListingForDeletion {
                        category,
                        topic,
                        questions,
                    },
                    vec![deleted, listing],
                )
            }
        }

        (SessionState::ListingForDeletion { .. }, Event::Selected(Action::BackToDeleteMenu)) => {
            TransitionResult::new(
                SessionState::ChoosingDeleteCategory,
                vec![delete_category_menu()],
            )
        }

        // =====================================================================
        // Sub-flow C: create quiz question
        // =====================================================================
        (
            SessionState::ChoosingTestTypeForCreate,
            Event::Selected(Action::CreateForTest(test_type)),
        ) => TransitionResult::new(
            SessionState::AwaitingQuizQuestionText { test_type },
            vec![Effect::reply(Notice::PromptQuizQuestionText { test_type })],
        ),

        (SessionState::ChoosingTestTypeForCreate, Event::Selected(Action::BackToDesignMenu)) => {
            TransitionResult::new(SessionState::ChoosingDesignAction, vec![design_menu()])
        }

        (SessionState::AwaitingQuizQuestionText { test_type }, Event::Text(text)) => {
            TransitionResult::new(
                SessionState::AwaitingQuizOption {
                    draft: QuizDraft::new(test_type, text),
                },
                vec![Effect::reply(Notice::PromptQuizOption { number: 1 })],
            )
        }

        (SessionState::AwaitingQuizOption { mut draft }, Event::Text(option)) => {
            draft.options.push(option);
            if draft.is_complete() {
                let choices = (0..draft.options.len()).map(Action::SelectCorrect).collect();
                let preview = Effect::menu(
                    Notice::QuizPreview {
                        text: draft.text.clone(),
                        options: draft.options.clone(),
                    },
                    choices,
                );
                TransitionResult::new(SessionState::ChoosingCorrectOption { draft }, vec![preview])
            } else {
                let next = draft.options.len() + 1;
                TransitionResult::new(
                    SessionState::AwaitingQuizOption { draft },
                    vec![Effect::reply(Notice::PromptQuizOption { number: next })],
                )
            }
        }

        (
            SessionState::ChoosingCorrectOption { draft },
            Event::Selected(Action::SelectCorrect(index)),
        ) => {
            if index >= draft.options.len() {
                return TransitionResult::new(
                    SessionState::ChoosingCorrectOption { draft },
                    vec![Effect::log_warn(format!(
                        "correct-option index {} out of range",
                        index
                    ))],
                );
            }
            match ctx
                .repo
                .insert_quiz_question(draft.clone().into_question(index))
                .await
            {
                Ok(()) => TransitionResult::new(
                    SessionState::Idle,
                    vec![Effect::reply(Notice::QuizQuestionSaved), main_menu()],
                ),
                Err(error) => {
                    repo_failure(SessionState::ChoosingCorrectOption { draft }, error)
                }
            }
        }

        (state, event) => unhandled(state, &event),
    }
}

fn prompt_for_text(
    category: InterviewCategory,
    topic: Option<PoliticalTopic>,
) -> TransitionResult {
    TransitionResult::new(
        SessionState::AwaitingQuestionText { category, topic },
        vec![Effect::reply(Notice::PromptQuestionText { category, topic })],
    )
}

fn deletion_list(
    category: InterviewCategory,
    topic: Option<PoliticalTopic>,
    questions: &[gozinesh_core::InterviewQuestion],
) -> Effect {
    Effect::menu(
        Notice::DeletionList {
            category,
            topic,
            questions: questions.iter().map(|q| q.text.clone()).collect(),
        },
        vec![Action::BackToDeleteMenu],
    )
}

/// Query the section once and cache the list in the session; the list is
/// not re-queried per deletion.
async fn begin_deletion(
    ctx: &FlowContext<'_>,
    category: InterviewCategory,
    topic: Option<PoliticalTopic>,
) -> TransitionResult {
    let questions = match ctx.repo.list_interview_questions(category, topic).await {
        Ok(questions) => questions,
        Err(error) => {
            let prior = if topic.is_some() {
                SessionState::ChoosingDeleteTopic
            } else {
                SessionState::ChoosingDeleteCategory
            };
            return repo_failure(prior, error);
        }
    };

    if questions.is_empty() {
        return TransitionResult::new(
            SessionState::ChoosingDeleteCategory,
            vec![Effect::reply(Notice::SectionEmpty), delete_category_menu()],
        );
    }

    let listing = deletion_list(category, topic, &questions);
    TransitionResult::new(
        SessionState::ListingForDeletion {
            category,
            topic,
            questions,
        },
        vec![listing],
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::state_machine::repository::QuestionRepository;
    use gozinesh_core::TestType;

    #[tokio::test]
    async fn test_non_admin_rejected_in_place() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            SessionState::ChoosingDesignAction,
            Event::Selected(Action::CreateInterviewQuestion),
        )
        .await;

        assert_eq!(result.state, SessionState::ChoosingDesignAction);
        assert!(matches!(
            &result.effects[0],
            Effect::Reply {
                notice: Notice::NotAuthorized,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_inserts_and_offers_another_round() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            SessionState::AwaitingQuestionText {
                category: InterviewCategory::Career,
                topic: None,
            },
            Event::Text("Why this job?".to_string()),
        )
        .await;

        assert_eq!(
            result.state,
            SessionState::AskingAddAnother {
                category: InterviewCategory::Career,
                topic: None,
            }
        );
        let stored = fixture
            .repo
            .list_interview_questions(InterviewCategory::Career, None)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_text_never_errors_or_duplicates() {
        let fixture = Fixture::new();
        let state = SessionState::AwaitingQuestionText {
            category: InterviewCategory::Personal,
            topic: None,
        };

        for _ in 0..2 {
            let result = handle(
                &fixture.ctx(),
                &actor(ADMIN),
                state.clone(),
                Event::Text("Same question?".to_string()),
            )
            .await;
            assert!(matches!(
                result.state,
                SessionState::AskingAddAnother { .. }
            ));
        }

        let stored = fixture
            .repo
            .list_interview_questions(InterviewCategory::Personal, None)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_add_another_loops_back_to_same_section() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            SessionState::AskingAddAnother {
                category: InterviewCategory::Political,
                topic: Some(gozinesh_core::PoliticalTopic::Liberalism),
            },
            Event::Selected(Action::AddAnotherYes),
        )
        .await;

        assert_eq!(
            result.state,
            SessionState::AwaitingQuestionText {
                category: InterviewCategory::Political,
                topic: Some(gozinesh_core::PoliticalTopic::Liberalism),
            }
        );
    }

    #[tokio::test]
    async fn test_add_another_no_finishes() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            SessionState::AskingAddAnother {
                category: InterviewCategory::Personal,
                topic: None,
            },
            Event::Selected(Action::AddAnotherNo),
        )
        .await;
        assert!(result.state.is_idle());
    }

    async fn listing_state(fixture: &Fixture, texts: &[&str]) -> SessionState {
        for text in texts {
            fixture
                .repo
                .insert_interview_question(InterviewCategory::Personal, None, text)
                .await
                .unwrap();
        }
        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            SessionState::ChoosingDeleteCategory,
            Event::Selected(Action::DeleteInCategory(InterviewCategory::Personal)),
        )
        .await;
        result.state
    }

    #[tokio::test]
    async fn test_non_numeric_ordinal_retries_in_place() {
        let fixture = Fixture::new();
        let state = listing_state(&fixture, &["a", "b"]).await;

        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            state.clone(),
            Event::Text("not a number".to_string()),
        )
        .await;

        assert_eq!(result.state, state);
        assert!(matches!(
            &result.effects[0],
            Effect::Reply {
                notice: Notice::ExpectedNumber,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_ordinal_retries_in_place() {
        let fixture = Fixture::new();
        let state = listing_state(&fixture, &["a", "b"]).await;

        for bad in ["0", "3"] {
            let result = handle(
                &fixture.ctx(),
                &actor(ADMIN),
                state.clone(),
                Event::Text(bad.to_string()),
            )
            .await;
            assert_eq!(result.state, state);
            assert!(matches!(
                &result.effects[0],
                Effect::Reply {
                    notice: Notice::OrdinalOutOfRange,
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn test_delete_non_last_renumbers_from_one() {
        let fixture = Fixture::new();
        let state = listing_state(&fixture, &["a", "b", "c"]).await;

        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            state,
            Event::Text("1".to_string()),
        )
        .await;

        // Still listing, with the remaining questions renumbered.
        match &result.state {
            SessionState::ListingForDeletion { questions, .. } => {
                let texts: Vec<_> = questions.iter().map(|q| q.text.as_str()).collect();
                assert_eq!(texts, vec!["b", "c"]);
            }
            other => panic!("expected ListingForDeletion, got {:?}", other),
        }
        assert!(result.effects.iter().any(|e| matches!(
            e,
            Effect::Reply {
                notice: Notice::DeletionList { questions, .. },
                ..
            } if questions == &vec!["b".to_string(), "c".to_string()]
        )));

        // The row really is gone from storage.
        let stored = fixture
            .repo
            .list_interview_questions(InterviewCategory::Personal, None)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_deleting_last_question_exits_listing() {
        let fixture = Fixture::new();
        let state = listing_state(&fixture, &["only one"]).await;

        let result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            state,
            Event::Text("1".to_string()),
        )
        .await;

        assert_eq!(result.state, SessionState::ChoosingDeleteCategory);
        assert!(result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Reply { notice: Notice::NothingLeftToDelete, .. })));
    }

    #[tokio::test]
    async fn test_quiz_creation_five_steps_then_correct_choice() {
        let fixture = Fixture::new();

        let mut result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            SessionState::ChoosingTestTypeForCreate,
            Event::Selected(Action::CreateForTest(TestType::General)),
        )
        .await;
        assert!(matches!(
            result.state,
            SessionState::AwaitingQuizQuestionText { .. }
        ));

        result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            result.state,
            Event::Text("What is rule one?".to_string()),
        )
        .await;

        for (index, option) in ["w", "x", "y", "z"].iter().enumerate() {
            assert!(
                matches!(result.state, SessionState::AwaitingQuizOption { .. }),
                "option {} should still be prompted",
                index + 1
            );
            result = handle(
                &fixture.ctx(),
                &actor(ADMIN),
                result.state,
                Event::Text(option.to_string()),
            )
            .await;
        }

        // Preview offers exactly as many choices as options collected.
        match &result.state {
            SessionState::ChoosingCorrectOption { draft } => {
                assert_eq!(draft.options.len(), 4);
            }
            other => panic!("expected ChoosingCorrectOption, got {:?}", other),
        }
        if let Effect::Reply { choices, .. } = &result.effects[0] {
            assert_eq!(choices.len(), 4);
        }

        result = handle(
            &fixture.ctx(),
            &actor(ADMIN),
            result.state,
            Event::Selected(Action::SelectCorrect(2)),
        )
        .await;
        assert!(result.state.is_idle());

        let stored = fixture
            .repo
            .list_quiz_questions(TestType::General)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].correct, 2);
        assert_eq!(stored[0].options, vec!["w", "x", "y", "z"]);
    }
}
