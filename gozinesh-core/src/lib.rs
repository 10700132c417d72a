//! Shared domain types for the gozinesh vetting bot.
//!
//! This crate holds the vocabulary common to the flow engine and its
//! collaborators: interview categories and questions, quiz questions and
//! scorecards, archive records, and the canonical report formatter.
//! It deliberately contains no I/O.

pub mod archive;
pub mod ids;
pub mod interview;
pub mod quiz;
pub mod report;

pub use archive::{ArchiveFilter, ArchivedUser, NewArchivedSubmission, SubmissionKind};
pub use ids::{QuestionId, SubmitterIdentity, UserId};
pub use interview::{InterviewCategory, InterviewQuestion, PoliticalTopic};
pub use quiz::{AnswerRecord, NewQuizQuestion, QuizDraft, QuizQuestion, Scorecard, TestType};
