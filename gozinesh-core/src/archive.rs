//! Archive records: accepted submissions and the filters used to browse
//! them. Archive rows are append-only; they are never mutated after
//! creation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::UserId;
use crate::interview::InterviewCategory;

/// What kind of submission an archive row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionKind {
    Interview(InterviewCategory),
    QuizResult,
}

impl SubmissionKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Interview(category) => category.code(),
            Self::QuizResult => "quiz-result",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Filter applied when browsing one user's archived submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFilter {
    All,
    Kind(InterviewCategory),
}

impl ArchiveFilter {
    pub fn code(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Kind(category) => category.code(),
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        if code == "all" {
            return Some(Self::All);
        }
        InterviewCategory::parse(code).map(Self::Kind)
    }

    /// Whether a row of the given kind is visible under this filter.
    pub fn matches(&self, kind: SubmissionKind) -> bool {
        match self {
            Self::All => true,
            Self::Kind(category) => kind == SubmissionKind::Interview(*category),
        }
    }
}

impl fmt::Display for ArchiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A user who has at least one archived submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedUser {
    pub id: UserId,
    pub name: String,
}

/// An archive row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArchivedSubmission {
    pub user: UserId,
    pub user_name: String,
    pub kind: SubmissionKind,
    pub full_text: String,
}
