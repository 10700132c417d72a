//! Regulations-test transitions.
//!
//! Entry is gated by the 24-hour cooldown from the last failed attempt.
//! The question set is reshuffled uniformly per attempt; every question
//! is presented with its options plus a synthetic "I don't know" choice
//! appended last. A wrong answer is revealed immediately on a side
//! channel and never blocks progression.

use std::time::{SystemTime, UNIX_EPOCH};

use gozinesh_core::{report, AnswerRecord, QuizQuestion, Scorecard, TestType};

use super::{main_menu, repo_failure, unhandled, Actor, FlowContext, TransitionResult};
use crate::scoring::{cooldown_remaining, hours_minutes, shuffle_questions};
use crate::state_machine::effect::{Effect, LogLevel, Notice};
use crate::state_machine::event::{Action, Event};
use crate::state_machine::state::SessionState;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn handle(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    state: SessionState,
    event: Event,
) -> TransitionResult {
    match (state, event) {
        (SessionState::ChoosingTestType, Event::Selected(Action::StartTest(test_type))) => {
            start_attempt(ctx, actor, test_type).await
        }

        (SessionState::ChoosingTestType, Event::Selected(Action::BackToMain)) => {
            TransitionResult::new(SessionState::Idle, vec![main_menu()])
        }

        (
            SessionState::AnsweringQuiz {
                test_type,
                questions,
                mut records,
                mut correct,
                mut incorrect,
            },
            Event::Selected(Action::Answer(chosen)),
        ) => {
            let question = &questions[records.len()];
            let mut effects = Vec::new();

            if chosen == question.correct {
                correct += 1;
            } else {
                // The synthetic option and out-of-range indexes count as
                // wrong; the correct answer is revealed immediately.
                incorrect += 1;
                effects.push(Effect::notify(
                    actor.user(),
                    Notice::WrongAnswer {
                        correct_text: question
                            .options
                            .get(question.correct)
                            .cloned()
                            .unwrap_or_default(),
                    },
                ));
            }

            records.push(AnswerRecord {
                question: question.text.clone(),
                options: question.options.clone(),
                chosen,
                correct: question.correct,
            });

            if records.len() < questions.len() {
                effects.push(prompt(test_type, &questions, records.len()));
                return TransitionResult::new(
                    SessionState::AnsweringQuiz {
                        test_type,
                        questions,
                        records,
                        correct,
                        incorrect,
                    },
                    effects,
                );
            }

            finish_attempt(
                ctx,
                actor,
                test_type,
                questions.len() as u32,
                correct,
                incorrect,
                &records,
                effects,
            )
            .await
        }

        (state, event) => unhandled(state, &event),
    }
}

/// Check the cooldown gate, load and shuffle the questions, and present
/// the first one.
async fn start_attempt(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    test_type: TestType,
) -> TransitionResult {
    let last_failure = match ctx.repo.attempt_cooldown(actor.user(), test_type).await {
        Ok(last) => last,
        Err(error) => return repo_failure(SessionState::ChoosingTestType, error),
    };

    if let Some(last) = last_failure {
        if let Some(remaining) = cooldown_remaining(last, now_secs()) {
            let (hours, minutes) = hours_minutes(remaining);
            return TransitionResult::new(
                SessionState::Idle,
                vec![
                    Effect::reply(Notice::CooldownActive {
                        test_type,
                        hours,
                        minutes,
                    }),
                    main_menu(),
                ],
            );
        }
    }

    let mut questions = match ctx.repo.list_quiz_questions(test_type).await {
        Ok(questions) => questions,
        Err(error) => return repo_failure(SessionState::ChoosingTestType, error),
    };

    if questions.is_empty() {
        return TransitionResult::new(
            SessionState::Idle,
            vec![
                Effect::reply(Notice::NoQuestionsForTest { test_type }),
                main_menu(),
            ],
        );
    }

    shuffle_questions(&mut questions);
    let first = prompt(test_type, &questions, 0);
    TransitionResult::new(
        SessionState::AnsweringQuiz {
            test_type,
            questions,
            records: Vec::new(),
            correct: 0,
            incorrect: 0,
        },
        vec![first],
    )
}

/// Score the attempt, settle the cooldown row, and deliver the summary to
/// the taker and the breakdown to the administrator.
#[allow(clippy::too_many_arguments)]
async fn finish_attempt(
    ctx: &FlowContext<'_>,
    actor: &Actor,
    test_type: TestType,
    total: u32,
    correct: u32,
    incorrect: u32,
    records: &[AnswerRecord],
    mut effects: Vec<Effect>,
) -> TransitionResult {
    let card = Scorecard {
        correct,
        incorrect,
        total,
    };

    let settle = if card.passed() {
        ctx.repo.clear_attempt_cooldown(actor.user(), test_type).await
    } else {
        ctx.repo.upsert_attempt_cooldown(actor.user(), test_type).await
    };
    if let Err(error) = settle {
        // The attempt is complete; losing the result over a cooldown
        // write would be worse than a stale cooldown row.
        effects.push(Effect::Log {
            level: LogLevel::Error,
            message: format!("failed to settle attempt cooldown: {}", error),
        });
    }

    effects.push(Effect::reply(Notice::QuizSummary {
        report: report::quiz_summary(test_type, &card),
    }));
    effects.push(Effect::notify(
        ctx.config.admin,
        Notice::QuizAdminReport {
            report: report::quiz_admin_report(&actor.identity, test_type, &card, records),
        },
    ));
    effects.push(main_menu());

    TransitionResult::new(SessionState::Idle, effects)
}

/// Present question `index`, offering one choice per real option plus the
/// synthetic "I don't know" choice last.
fn prompt(test_type: TestType, questions: &[QuizQuestion], index: usize) -> Effect {
    let question = &questions[index];
    let choices = (0..=question.options.len()).map(Action::Answer).collect();
    Effect::menu(
        Notice::QuizPrompt {
            number: index + 1,
            total: questions.len(),
            test_type,
            text: question.text.clone(),
            options: question.options.clone(),
        },
        choices,
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::state_machine::repository::QuestionRepository;
    use gozinesh_core::NewQuizQuestion;

    async fn seed_questions(fixture: &Fixture, count: usize, correct: usize) {
        for index in 0..count {
            fixture
                .repo
                .insert_quiz_question(NewQuizQuestion {
                    test_type: TestType::General,
                    text: format!("question {}", index),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct,
                })
                .await
                .unwrap();
        }
    }

    fn answering_state(count: usize, correct: usize) -> SessionState {
        let questions = (0..count)
            .map(|index| QuizQuestion {
                id: gozinesh_core::QuestionId(index as i64),
                test_type: TestType::General,
                text: format!("question {}", index),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct,
            })
            .collect();
        SessionState::AnsweringQuiz {
            test_type: TestType::General,
            questions,
            records: Vec::new(),
            correct: 0,
            incorrect: 0,
        }
    }

    #[tokio::test]
    async fn test_recent_failure_blocks_entry_with_remaining_time() {
        let fixture = Fixture::new();
        seed_questions(&fixture, 1, 0).await;
        fixture
            .repo
            .upsert_attempt_cooldown(USER, TestType::General)
            .await
            .unwrap();

        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            SessionState::ChoosingTestType,
            Event::Selected(Action::StartTest(TestType::General)),
        )
        .await;

        assert!(result.state.is_idle());
        match &result.effects[0] {
            Effect::Reply {
                notice: Notice::CooldownActive { hours, .. },
                ..
            } => {
                // Failure recorded moments ago: essentially the whole
                // window remains.
                assert!(*hours >= 23, "expected ~24h remaining, got {}h", hours);
            }
            other => panic!("expected CooldownActive, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_question_set_aborts_to_root() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            SessionState::ChoosingTestType,
            Event::Selected(Action::StartTest(TestType::Detailed)),
        )
        .await;

        assert!(result.state.is_idle());
        assert!(matches!(
            &result.effects[0],
            Effect::Reply {
                notice: Notice::NoQuestionsForTest { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_prompt_appends_synthetic_choice_last() {
        let fixture = Fixture::new();
        seed_questions(&fixture, 1, 2).await;

        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            SessionState::ChoosingTestType,
            Event::Selected(Action::StartTest(TestType::General)),
        )
        .await;

        if let Effect::Reply { choices, .. } = &result.effects[0] {
            assert_eq!(choices.len(), 5);
            assert_eq!(choices[4], Action::Answer(4));
        } else {
            panic!("expected quiz prompt");
        }
    }

    #[tokio::test]
    async fn test_correct_answer_advances_silently() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            answering_state(2, 1),
            Event::Selected(Action::Answer(1)),
        )
        .await;

        match &result.state {
            SessionState::AnsweringQuiz {
                correct,
                incorrect,
                records,
                ..
            } => {
                assert_eq!(*correct, 1);
                assert_eq!(*incorrect, 0);
                assert_eq!(records.len(), 1);
            }
            other => panic!("expected AnsweringQuiz, got {:?}", other),
        }
        // No side-channel reveal for a correct answer.
        assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Notify { .. })));
    }

    #[tokio::test]
    async fn test_wrong_answer_reveals_correct_option() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            answering_state(2, 1),
            Event::Selected(Action::Answer(3)),
        )
        .await;

        let reveal = result
            .effects
            .iter()
            .find(|e| matches!(e, Effect::Notify { .. }))
            .expect("wrong answer should be revealed");
        if let Effect::Notify { user, notice, .. } = reveal {
            assert_eq!(*user, USER);
            assert_eq!(
                *notice,
                Notice::WrongAnswer {
                    correct_text: "b".to_string()
                }
            );
        }
        // Progression is not blocked.
        assert!(matches!(result.state, SessionState::AnsweringQuiz { .. }));
    }

    #[tokio::test]
    async fn test_synthetic_option_counts_as_wrong() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            answering_state(2, 0),
            Event::Selected(Action::Answer(4)),
        )
        .await;

        match &result.state {
            SessionState::AnsweringQuiz { incorrect, .. } => assert_eq!(*incorrect, 1),
            other => panic!("expected AnsweringQuiz, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_passing_attempt_clears_cooldown() {
        let fixture = Fixture::new();
        // A stale cooldown row exists from an earlier failure.
        fixture
            .repo
            .upsert_attempt_cooldown(USER, TestType::General)
            .await
            .unwrap();

        let mut state = answering_state(2, 0);
        for _ in 0..2 {
            let result = handle(
                &fixture.ctx(),
                &actor(USER),
                state,
                Event::Selected(Action::Answer(0)),
            )
            .await;
            state = result.state;
        }

        assert!(state.is_idle());
        assert_eq!(
            fixture
                .repo
                .attempt_cooldown(USER, TestType::General)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_failing_attempt_records_cooldown_and_reports() {
        let fixture = Fixture::new();
        let result = handle(
            &fixture.ctx(),
            &actor(USER),
            answering_state(1, 0),
            Event::Selected(Action::Answer(2)),
        )
        .await;

        assert!(result.state.is_idle());
        assert!(fixture
            .repo
            .attempt_cooldown(USER, TestType::General)
            .await
            .unwrap()
            .is_some());

        // Taker gets the summary, administrator gets the breakdown.
        assert!(result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Reply { notice: Notice::QuizSummary { .. }, .. })));
        let admin_report = result.effects.iter().find(|e| {
            matches!(
                e,
                Effect::Notify {
                    notice: Notice::QuizAdminReport { .. },
                    ..
                }
            )
        });
        if let Some(Effect::Notify { user, notice, .. }) = admin_report {
            assert_eq!(*user, ADMIN);
            if let Notice::QuizAdminReport { report } = notice {
                assert!(report.contains("I don't know") || report.contains("Chosen: c"));
            }
        } else {
            panic!("administrator should receive the breakdown");
        }
    }

    #[tokio::test]
    async fn test_stored_correct_index_is_never_the_synthetic_option() {
        let fixture = Fixture::new();
        seed_questions(&fixture, 3, 3).await;

        let questions = fixture
            .repo
            .list_quiz_questions(TestType::General)
            .await
            .unwrap();
        for question in questions {
            assert!(question.correct < question.options.len());
        }
    }
}
