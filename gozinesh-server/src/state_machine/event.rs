//! Events that drive session transitions.
//!
//! An inbound update arrives tagged with the acting user and is parsed
//! into an [`Event`] before dispatch. Button presses carry opaque action
//! codes; [`Action::parse`] turns them into typed values and
//! [`Action::code`] produces the string the transport attaches to a
//! button.

use gozinesh_core::{ArchiveFilter, InterviewCategory, PoliticalTopic, TestType, UserId};

use crate::handoff::HandoffToken;

/// All events that can drive a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user opened (or re-opened) the root menu.
    Started,

    /// Global cancellation; legal in every state, always returns to the
    /// root menu and discards accumulated data.
    Cancelled,

    /// A free-text message.
    Text(String),

    /// A button press, already parsed.
    Selected(Action),
}

impl Event {
    /// A summary suitable for logging. Free-text bodies are elided: they
    /// may hold interview answers or the archive password.
    pub fn log_summary(&self) -> String {
        match self {
            Event::Started => "Started".to_string(),
            Event::Cancelled => "Cancelled".to_string(),
            Event::Text(text) => format!("Text {{ len: {} }}", text.len()),
            Event::Selected(action) => format!("Selected {{ {} }}", action.code()),
        }
    }
}

/// A typed action code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Root menu
    EnterInterview,
    EnterDesign,
    EnterArchive,
    EnterQuiz,

    // Navigation
    BackToMain,
    BackToInterviewMenu,
    BackToDesignMenu,
    BackToCreateMenu,
    BackToDeleteMenu,
    BackToUserList,

    // Interview flow
    ChooseKind(InterviewCategory),
    ChooseTopic(PoliticalTopic),
    ConfirmSend,
    DeclineSend,

    // Wizard
    CreateInterviewQuestion,
    DeleteInterviewQuestion,
    CreateQuizQuestion,
    CreateInCategory(InterviewCategory),
    CreateInTopic(PoliticalTopic),
    AddAnotherYes,
    AddAnotherNo,
    DeleteInCategory(InterviewCategory),
    DeleteInTopic(PoliticalTopic),
    CreateForTest(TestType),
    SelectCorrect(usize),

    // Quiz
    StartTest(TestType),
    Answer(usize),

    // Archive browser
    ViewUser(UserId),
    Filter(ArchiveFilter),

    // Administrator handoff decision; handled outside any session.
    AcceptHandoff(HandoffToken),
    IgnoreHandoff(HandoffToken),
}

impl Action {
    /// The opaque code attached to a button for this action.
    pub fn code(&self) -> String {
        match self {
            Action::EnterInterview => "interview".to_string(),
            Action::EnterDesign => "design".to_string(),
            Action::EnterArchive => "archive".to_string(),
            Action::EnterQuiz => "quiz".to_string(),
            Action::BackToMain => "back:main".to_string(),
            Action::BackToInterviewMenu => "back:interview".to_string(),
            Action::BackToDesignMenu => "back:design".to_string(),
            Action::BackToCreateMenu => "back:create".to_string(),
            Action::BackToDeleteMenu => "back:delete".to_string(),
            Action::BackToUserList => "back:users".to_string(),
            Action::ChooseKind(category) => format!("kind:{}", category.code()),
            Action::ChooseTopic(topic) => format!("topic:{}", topic.code()),
            Action::ConfirmSend => "confirm:yes".to_string(),
            Action::DeclineSend => "confirm:no".to_string(),
            Action::CreateInterviewQuestion => "design:create".to_string(),
            Action::DeleteInterviewQuestion => "design:delete".to_string(),
            Action::CreateQuizQuestion => "design:quiz".to_string(),
            Action::CreateInCategory(category) => format!("create:cat:{}", category.code()),
            Action::CreateInTopic(topic) => format!("create:topic:{}", topic.code()),
            Action::AddAnotherYes => "another:yes".to_string(),
            Action::AddAnotherNo => "another:no".to_string(),
            Action::DeleteInCategory(category) => format!("delete:cat:{}", category.code()),
            Action::DeleteInTopic(topic) => format!("delete:topic:{}", topic.code()),
            Action::CreateForTest(test_type) => format!("quizadd:{}", test_type.code()),
            Action::SelectCorrect(index) => format!("correct:{}", index),
            Action::StartTest(test_type) => format!("test:{}", test_type.code()),
            Action::Answer(index) => format!("answer:{}", index),
            Action::ViewUser(user) => format!("view:user:{}", user),
            Action::Filter(filter) => format!("view:cat:{}", filter.code()),
            Action::AcceptHandoff(token) => format!("handoff:accept:{}", token),
            Action::IgnoreHandoff(token) => format!("handoff:ignore:{}", token),
        }
    }

    /// Parse an action code. Unknown or malformed codes yield `None`;
    /// the engine logs and ignores them.
    pub fn parse(code: &str) -> Option<Action> {
        match code {
            "interview" => return Some(Action::EnterInterview),
            "design" => return Some(Action::EnterDesign),
            "archive" => return Some(Action::EnterArchive),
            "quiz" => return Some(Action::EnterQuiz),
            "back:main" => return Some(Action::BackToMain),
            "back:interview" => return Some(Action::BackToInterviewMenu),
            "back:design" => return Some(Action::BackToDesignMenu),
            "back:create" => return Some(Action::BackToCreateMenu),
            "back:delete" => return Some(Action::BackToDeleteMenu),
            "back:users" => return Some(Action::BackToUserList),
            "confirm:yes" => return Some(Action::ConfirmSend),
            "confirm:no" => return Some(Action::DeclineSend),
            "design:create" => return Some(Action::CreateInterviewQuestion),
            "design:delete" => return Some(Action::DeleteInterviewQuestion),
            "design:quiz" => return Some(Action::CreateQuizQuestion),
            "another:yes" => return Some(Action::AddAnotherYes),
            "another:no" => return Some(Action::AddAnotherNo),
            _ => {}
        }

        if let Some(rest) = code.strip_prefix("kind:") {
            return InterviewCategory::parse(rest).map(Action::ChooseKind);
        }
        if let Some(rest) = code.strip_prefix("topic:") {
            return PoliticalTopic::parse(rest).map(Action::ChooseTopic);
        }
        if let Some(rest) = code.strip_prefix("create:cat:") {
            return InterviewCategory::parse(rest).map(Action::CreateInCategory);
        }
        if let Some(rest) = code.strip_prefix("create:topic:") {
            return PoliticalTopic::parse(rest).map(Action::CreateInTopic);
        }
        if let Some(rest) = code.strip_prefix("delete:cat:") {
            return InterviewCategory::parse(rest).map(Action::DeleteInCategory);
        }
        if let Some(rest) = code.strip_prefix("delete:topic:") {
            return PoliticalTopic::parse(rest).map(Action::DeleteInTopic);
        }
        if let Some(rest) = code.strip_prefix("quizadd:") {
            return TestType::parse(rest).map(Action::CreateForTest);
        }
        if let Some(rest) = code.strip_prefix("correct:") {
            return rest.parse().ok().map(Action::SelectCorrect);
        }
        if let Some(rest) = code.strip_prefix("test:") {
            return TestType::parse(rest).map(Action::StartTest);
        }
        if let Some(rest) = code.strip_prefix("answer:") {
            return rest.parse().ok().map(Action::Answer);
        }
        if let Some(rest) = code.strip_prefix("view:user:") {
            return rest.parse().ok().map(|id: u64| Action::ViewUser(UserId(id)));
        }
        if let Some(rest) = code.strip_prefix("view:cat:") {
            return ArchiveFilter::parse(rest).map(Action::Filter);
        }
        if let Some(rest) = code.strip_prefix("handoff:accept:") {
            return Some(Action::AcceptHandoff(HandoffToken::from(rest)));
        }
        if let Some(rest) = code.strip_prefix("handoff:ignore:") {
            return Some(Action::IgnoreHandoff(HandoffToken::from(rest)));
        }

        None
    }
}
