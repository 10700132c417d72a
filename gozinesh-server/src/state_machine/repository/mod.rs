//! Repository abstraction for durable question and archive storage.
//!
//! The engine only ever talks to [`QuestionRepository`]; the physical
//! schema and connection management belong to the implementing
//! collaborator. An in-memory backend ships for tests and default wiring.

mod memory;

pub use memory::InMemoryRepository;

use std::fmt;

use async_trait::async_trait;

use gozinesh_core::{
    ArchiveFilter, ArchivedUser, InterviewCategory, InterviewQuestion, NewArchivedSubmission,
    NewQuizQuestion, PoliticalTopic, QuestionId, QuizQuestion, TestType, UserId,
};

/// A storage failure. The engine treats these as retry-in-place: the
/// current operation aborts, the session state is left unchanged, and the
/// user sees a generic failure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    Backend { message: String },
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { message } => write!(f, "storage backend error: {}", message),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Typed operations against durable storage.
///
/// All operations are request/response; none stream. Timeout and retry
/// policy belong to the implementation, not the engine.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Ordered question set for a category (and topic, for political
    /// interviews).
    async fn list_interview_questions(
        &self,
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
    ) -> Result<Vec<InterviewQuestion>, RepositoryError>;

    /// Insert a question. Duplicate text (anywhere in the set) is a
    /// silent no-op, not an error.
    async fn insert_interview_question(
        &self,
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        text: &str,
    ) -> Result<(), RepositoryError>;

    async fn delete_interview_question(&self, id: QuestionId) -> Result<(), RepositoryError>;

    async fn list_quiz_questions(
        &self,
        test_type: TestType,
    ) -> Result<Vec<QuizQuestion>, RepositoryError>;

    /// Insert a quiz question. Duplicate text within the same test type
    /// is a silent no-op.
    async fn insert_quiz_question(
        &self,
        question: NewQuizQuestion,
    ) -> Result<(), RepositoryError>;

    /// Append an accepted submission. The archive is append-only.
    async fn append_submission(
        &self,
        submission: NewArchivedSubmission,
    ) -> Result<(), RepositoryError>;

    /// Distinct users with at least one archived submission, ordered by
    /// display name.
    async fn list_archived_users(&self) -> Result<Vec<ArchivedUser>, RepositoryError>;

    /// Full texts of one user's archived submissions, newest first.
    async fn list_submissions(
        &self,
        user: UserId,
        filter: ArchiveFilter,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Unix timestamp (seconds) of the most recent failed attempt, if any.
    async fn attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<Option<u64>, RepositoryError>;

    /// Record a failed attempt now, creating or refreshing the row.
    async fn upsert_attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<(), RepositoryError>;

    /// Remove the cooldown row after a passing attempt.
    async fn clear_attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<(), RepositoryError>;
}
