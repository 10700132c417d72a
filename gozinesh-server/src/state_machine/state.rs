//! Session state for the conversational flows.
//!
//! One user has exactly one session, and the session is exactly one of
//! these variants. Each variant carries the data that is legal in that
//! state and nothing else, so a handler for one flow cannot read another
//! flow's accumulated data: illegal states are unrepresentable.

use gozinesh_core::{
    AnswerRecord, InterviewCategory, InterviewQuestion, PoliticalTopic, QuizDraft, QuizQuestion,
    TestType, UserId,
};

/// Which of the four flows currently owns a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Interview,
    Wizard,
    Archive,
    Quiz,
}

/// The per-user conversational state machine.
///
/// `Idle` is both the initial state and the state every flow returns to
/// on completion or cancellation; an idle session carries no data and is
/// not retained in the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Root menu; no flow active.
    #[default]
    Idle,

    // =========================================================================
    // Interview flow
    // =========================================================================
    /// Picking personal / career / political.
    ChoosingInterviewKind,

    /// Picking one of the eleven political topics.
    ChoosingPoliticalTopic,

    /// Collecting free-text answers. The next question to present is
    /// `questions[answers.len()]`; the flow leaves this state exactly when
    /// `answers.len() == questions.len()`.
    AnsweringQuestions {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        questions: Vec<InterviewQuestion>,
        answers: Vec<String>,
    },

    /// All questions answered; waiting for the send/discard decision.
    ConfirmingSubmission {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        questions: Vec<InterviewQuestion>,
        answers: Vec<String>,
    },

    // =========================================================================
    // Question-design wizard (admin)
    // =========================================================================
    /// Wizard root: create interview question / delete interview question
    /// / create quiz question.
    ChoosingDesignAction,

    ChoosingCreateCategory,
    ChoosingCreateTopic,

    /// Waiting for the text of a new interview question.
    AwaitingQuestionText {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
    },

    /// Question inserted; offering another round in the same section.
    AskingAddAnother {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
    },

    ChoosingDeleteCategory,
    ChoosingDeleteTopic,

    /// Showing a numbered list and waiting for a 1-based ordinal. The
    /// list was queried once on entry and is maintained here; it is not
    /// re-queried per deletion.
    ListingForDeletion {
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        questions: Vec<InterviewQuestion>,
    },

    ChoosingTestTypeForCreate,

    /// Waiting for the text of a new quiz question.
    AwaitingQuizQuestionText { test_type: TestType },

    /// Collecting the four options in fixed order; `draft.options.len()`
    /// says how many have arrived.
    AwaitingQuizOption { draft: QuizDraft },

    /// All options collected; waiting for the correct-option choice.
    ChoosingCorrectOption { draft: QuizDraft },

    // =========================================================================
    // Archive browser
    // =========================================================================
    AwaitingPassword,
    ListingArchivedUsers,

    ChoosingArchiveCategory {
        user: UserId,
        user_name: String,
    },

    ShowingSubmissions {
        user: UserId,
        user_name: String,
    },

    // =========================================================================
    // Regulations test
    // =========================================================================
    ChoosingTestType,

    /// Taking the test. The current question is
    /// `questions[records.len()]`; the attempt finishes exactly when
    /// `records.len() == questions.len()`.
    AnsweringQuiz {
        test_type: TestType,
        questions: Vec<QuizQuestion>,
        records: Vec<AnswerRecord>,
        correct: u32,
        incorrect: u32,
    },
}

impl SessionState {
    /// The flow owning this state, or `None` for `Idle`.
    pub fn flow(&self) -> Option<FlowKind> {
        match self {
            Self::Idle => None,

            Self::ChoosingInterviewKind
            | Self::ChoosingPoliticalTopic
            | Self::AnsweringQuestions { .. }
            | Self::ConfirmingSubmission { .. } => Some(FlowKind::Interview),

            Self::ChoosingDesignAction
            | Self::ChoosingCreateCategory
            | Self::ChoosingCreateTopic
            | Self::AwaitingQuestionText { .. }
            | Self::AskingAddAnother { .. }
            | Self::ChoosingDeleteCategory
            | Self::ChoosingDeleteTopic
            | Self::ListingForDeletion { .. }
            | Self::ChoosingTestTypeForCreate
            | Self::AwaitingQuizQuestionText { .. }
            | Self::AwaitingQuizOption { .. }
            | Self::ChoosingCorrectOption { .. } => Some(FlowKind::Wizard),

            Self::AwaitingPassword
            | Self::ListingArchivedUsers
            | Self::ChoosingArchiveCategory { .. }
            | Self::ShowingSubmissions { .. } => Some(FlowKind::Archive),

            Self::ChoosingTestType | Self::AnsweringQuiz { .. } => Some(FlowKind::Quiz),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// A short tag for logging; never includes accumulated data.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::ChoosingInterviewKind => "ChoosingInterviewKind",
            Self::ChoosingPoliticalTopic => "ChoosingPoliticalTopic",
            Self::AnsweringQuestions { .. } => "AnsweringQuestions",
            Self::ConfirmingSubmission { .. } => "ConfirmingSubmission",
            Self::ChoosingDesignAction => "ChoosingDesignAction",
            Self::ChoosingCreateCategory => "ChoosingCreateCategory",
            Self::ChoosingCreateTopic => "ChoosingCreateTopic",
            Self::AwaitingQuestionText { .. } => "AwaitingQuestionText",
            Self::AskingAddAnother { .. } => "AskingAddAnother",
            Self::ChoosingDeleteCategory => "ChoosingDeleteCategory",
            Self::ChoosingDeleteTopic => "ChoosingDeleteTopic",
            Self::ListingForDeletion { .. } => "ListingForDeletion",
            Self::ChoosingTestTypeForCreate => "ChoosingTestTypeForCreate",
            Self::AwaitingQuizQuestionText { .. } => "AwaitingQuizQuestionText",
            Self::AwaitingQuizOption { .. } => "AwaitingQuizOption",
            Self::ChoosingCorrectOption { .. } => "ChoosingCorrectOption",
            Self::AwaitingPassword => "AwaitingPassword",
            Self::ListingArchivedUsers => "ListingArchivedUsers",
            Self::ChoosingArchiveCategory { .. } => "ChoosingArchiveCategory",
            Self::ShowingSubmissions { .. } => "ShowingSubmissions",
            Self::ChoosingTestType => "ChoosingTestType",
            Self::AnsweringQuiz { .. } => "AnsweringQuiz",
        }
    }
}
