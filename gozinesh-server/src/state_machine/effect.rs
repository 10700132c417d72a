//! Effects (rendering as data).
//!
//! Transitions never talk to the messaging collaborator directly; they
//! return effects describing what should be shown to whom, and the
//! interpreter executes them. This keeps transition logic testable
//! without a transport.

use gozinesh_core::{
    ArchiveFilter, ArchivedUser, InterviewCategory, PoliticalTopic, TestType, UserId,
};

use super::event::Action;

/// All effects a transition can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show something to the acting user, editing their current menu
    /// message in place where the transport supports it.
    Reply {
        notice: Notice,
        choices: Vec<Action>,
    },

    /// Send a fresh message to an arbitrary user (the administrator, or
    /// the test taker's side channel).
    Notify {
        user: UserId,
        notice: Notice,
        choices: Vec<Action>,
    },

    /// Log a message.
    Log { level: LogLevel, message: String },
}

impl Effect {
    pub fn reply(notice: Notice) -> Self {
        Self::Reply {
            notice,
            choices: Vec::new(),
        }
    }

    pub fn menu(notice: Notice, choices: Vec<Action>) -> Self {
        Self::Reply { notice, choices }
    }

    pub fn notify(user: UserId, notice: Notice) -> Self {
        Self::Notify {
            user,
            notice,
            choices: Vec::new(),
        }
    }

    pub fn notify_menu(user: UserId, notice: Notice, choices: Vec<Action>) -> Self {
        Self::Notify {
            user,
            notice,
            choices,
        }
    }

    pub fn log_info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn log_warn(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A render instruction. Variants carry data only; wording, button labels
/// and localization belong to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    // Root
    MainMenu,
    Help,
    Cancelled,
    NotAuthorized,
    OperationFailed,

    // Interview
    InterviewKindMenu,
    PoliticalTopicMenu,
    InterviewQuestion {
        number: usize,
        total: usize,
        text: String,
    },
    SectionEmpty,
    ConfirmSubmission,
    SubmissionSent,
    SubmissionDiscarded,

    // Administrator handoff
    HandoffReport { report: String },
    HandoffArchived,
    HandoffIgnored,
    HandoffAlreadyHandled,

    // Wizard
    DesignMenu,
    CreateCategoryMenu,
    CreateTopicMenu,
    PromptQuestionText {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
    },
    QuestionAdded,
    AskAddAnother,
    WizardFinished,
    DeleteCategoryMenu,
    DeleteTopicMenu,
    DeletionList {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        questions: Vec<String>,
    },
    QuestionDeleted { text: String },
    NothingLeftToDelete,
    OrdinalOutOfRange,
    ExpectedNumber,
    TestTypeMenuForCreate,
    PromptQuizQuestionText { test_type: TestType },
    PromptQuizOption { number: usize },
    QuizPreview {
        text: String,
        options: Vec<String>,
    },
    QuizQuestionSaved,

    // Archive browser
    PasswordPrompt,
    PasswordIncorrect,
    ArchiveEmpty,
    ArchivedUserList { users: Vec<ArchivedUser> },
    ArchiveCategoryMenu { user_name: String },
    Submissions {
        shown: Vec<String>,
        /// Older entries not displayed; reported rather than silently
        /// truncated.
        older: usize,
    },
    NoSubmissionsMatched { filter: ArchiveFilter },

    // Regulations test
    TestTypeMenu,
    CooldownActive {
        test_type: TestType,
        hours: u64,
        minutes: u64,
    },
    NoQuestionsForTest { test_type: TestType },
    QuizPrompt {
        number: usize,
        total: usize,
        test_type: TestType,
        text: String,
        /// Real options only; the final `Answer` choice past these is the
        /// synthetic "I don't know".
        options: Vec<String>,
    },
    WrongAnswer { correct_text: String },
    QuizSummary { report: String },
    QuizAdminReport { report: String },
}
