//! End-to-end flow walks through the public engine API, with the
//! in-memory repository and the recording messenger standing in for the
//! external collaborators.

use std::sync::Arc;

use gozinesh_core::{
    ArchiveFilter, InterviewCategory, NewArchivedSubmission, NewQuizQuestion, SubmissionKind,
    SubmitterIdentity, TestType, UserId,
};
use gozinesh_server::state_machine::{InMemoryRepository, Notice, QuestionRepository};
use gozinesh_server::{Command, Config, FlowEngine, Inbound, RecordingMessenger};

const ADMIN: UserId = UserId(1000);
const USER: UserId = UserId(7);

fn identity(user: UserId) -> SubmitterIdentity {
    SubmitterIdentity {
        id: user,
        first_name: "Test".to_string(),
        last_name: Some("User".to_string()),
        username: Some("tester".to_string()),
    }
}

fn build_engine() -> (Arc<RecordingMessenger>, Arc<InMemoryRepository>, FlowEngine) {
    let config = Config {
        admin: ADMIN,
        archive_password: "sesame".to_string(),
        handoff_capacity: 16,
    };
    let repo = Arc::new(InMemoryRepository::new());
    let messenger = Arc::new(RecordingMessenger::new());
    let engine = FlowEngine::new(config, repo.clone(), messenger.clone());
    (messenger, repo, engine)
}

async fn press(engine: &FlowEngine, user: UserId, code: &str) {
    engine
        .handle(identity(user), Inbound::Action(code.to_string()))
        .await;
}

async fn say(engine: &FlowEngine, user: UserId, text: &str) {
    engine
        .handle(identity(user), Inbound::Text(text.to_string()))
        .await;
}

/// Seed quiz questions that all share the same correct index, so an
/// attempt can be driven deterministically despite the shuffle.
async fn seed_quiz(repo: &InMemoryRepository, count: usize, correct: usize) {
    for index in 0..count {
        repo.insert_quiz_question(NewQuizQuestion {
            test_type: TestType::General,
            text: format!("rule {}?", index),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        })
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn quiz_pass_clears_cooldown_and_reports_both_parties() {
    let (messenger, repo, engine) = build_engine();
    seed_quiz(&repo, 2, 0).await;

    press(&engine, USER, "quiz").await;
    press(&engine, USER, "test:general").await;
    press(&engine, USER, "answer:0").await;
    press(&engine, USER, "answer:0").await;

    // Session finished, no cooldown after a pass.
    assert_eq!(engine.store().active_count().await, 0);
    assert_eq!(
        repo.attempt_cooldown(USER, TestType::General).await.unwrap(),
        None
    );

    let summary = messenger
        .deliveries_for(USER)
        .await
        .into_iter()
        .find_map(|d| match d.message.notice {
            Notice::QuizSummary { report } => Some(report),
            _ => None,
        })
        .expect("taker should receive a summary");
    assert!(summary.contains("PASSED"));
    assert!(summary.contains("100.00%"));

    let breakdown = messenger
        .deliveries_for(ADMIN)
        .await
        .into_iter()
        .find_map(|d| match d.message.notice {
            Notice::QuizAdminReport { report } => Some(report),
            _ => None,
        })
        .expect("administrator should receive the breakdown");
    assert!(breakdown.contains("rule"));
}

#[tokio::test]
async fn quiz_failure_sets_cooldown_and_blocks_the_next_attempt() {
    let (messenger, repo, engine) = build_engine();
    seed_quiz(&repo, 1, 0).await;

    press(&engine, USER, "quiz").await;
    press(&engine, USER, "test:general").await;
    // The synthetic "I don't know" option (index 4 on a 4-option question).
    press(&engine, USER, "answer:4").await;

    assert!(repo
        .attempt_cooldown(USER, TestType::General)
        .await
        .unwrap()
        .is_some());

    // The reveal went to the taker on a side channel.
    let revealed = messenger
        .deliveries_for(USER)
        .await
        .into_iter()
        .any(|d| matches!(d.message.notice, Notice::WrongAnswer { .. }));
    assert!(revealed);

    // An immediate retry is blocked with the remaining time.
    messenger.clear().await;
    press(&engine, USER, "quiz").await;
    press(&engine, USER, "test:general").await;

    let blocked = messenger
        .deliveries_for(USER)
        .await
        .into_iter()
        .any(|d| matches!(d.message.notice, Notice::CooldownActive { .. }));
    assert!(blocked);
    assert_eq!(engine.store().active_count().await, 0);
}

#[tokio::test]
async fn wizard_creates_question_through_the_engine() {
    let (_messenger, repo, engine) = build_engine();

    press(&engine, ADMIN, "design").await;
    press(&engine, ADMIN, "design:create").await;
    press(&engine, ADMIN, "create:cat:personal").await;
    say(&engine, ADMIN, "What drives you?").await;
    press(&engine, ADMIN, "another:no").await;

    let stored = repo
        .list_interview_questions(InterviewCategory::Personal, None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "What drives you?");
    assert_eq!(engine.store().active_count().await, 0);
}

#[tokio::test]
async fn wizard_political_create_goes_through_topic_menu() {
    let (_messenger, repo, engine) = build_engine();

    press(&engine, ADMIN, "design").await;
    press(&engine, ADMIN, "design:create").await;
    press(&engine, ADMIN, "create:cat:political").await;
    press(&engine, ADMIN, "create:topic:qajar").await;
    say(&engine, ADMIN, "On the Qajar era?").await;
    press(&engine, ADMIN, "another:no").await;

    let stored = repo
        .list_interview_questions(
            InterviewCategory::Political,
            Some(gozinesh_core::PoliticalTopic::Qajar),
        )
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn archive_browse_shows_recent_submissions() {
    let (messenger, repo, engine) = build_engine();
    for index in 0..7 {
        repo.append_submission(NewArchivedSubmission {
            user: USER,
            user_name: "Test User".to_string(),
            kind: SubmissionKind::Interview(InterviewCategory::Personal),
            full_text: format!("archived interview {}", index),
        })
        .await
        .unwrap();
    }

    press(&engine, ADMIN, "archive").await;
    say(&engine, ADMIN, "sesame").await;
    press(&engine, ADMIN, &format!("view:user:{}", USER)).await;
    press(&engine, ADMIN, "view:cat:all").await;

    let shown = messenger
        .deliveries_for(ADMIN)
        .await
        .into_iter()
        .find_map(|d| match d.message.notice {
            Notice::Submissions { shown, older } => Some((shown, older)),
            _ => None,
        })
        .expect("administrator should see submissions");
    assert_eq!(shown.0.len(), 5);
    assert_eq!(shown.1, 2);
    assert_eq!(shown.0[0], "archived interview 6");
}

#[tokio::test]
async fn archive_wrong_password_keeps_prompting() {
    let (messenger, _repo, engine) = build_engine();

    press(&engine, ADMIN, "archive").await;
    say(&engine, ADMIN, "wrong").await;
    say(&engine, ADMIN, "still wrong").await;

    let rejections = messenger
        .deliveries_for(ADMIN)
        .await
        .into_iter()
        .filter(|d| matches!(d.message.notice, Notice::PasswordIncorrect))
        .count();
    assert_eq!(rejections, 2);
    // Still waiting for the password; /cancel escapes.
    assert_eq!(engine.store().active_count().await, 1);
    engine
        .handle(identity(ADMIN), Inbound::Command(Command::Cancel))
        .await;
    assert_eq!(engine.store().active_count().await, 0);
}

#[tokio::test]
async fn quiz_archive_filter_excludes_interview_rows() {
    let (_messenger, repo, _engine) = build_engine();
    repo.append_submission(NewArchivedSubmission {
        user: USER,
        user_name: "Test User".to_string(),
        kind: SubmissionKind::QuizResult,
        full_text: "a quiz result".to_string(),
    })
    .await
    .unwrap();

    let interviews = repo
        .list_submissions(USER, ArchiveFilter::Kind(InterviewCategory::Personal))
        .await
        .unwrap();
    assert!(interviews.is_empty());

    let all = repo.list_submissions(USER, ArchiveFilter::All).await.unwrap();
    assert_eq!(all, vec!["a quiz result"]);
}
