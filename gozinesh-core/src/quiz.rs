//! Regulations-test questions, drafts and scoring arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::QuestionId;

/// Number of real options on every quiz question. The synthetic
/// "I don't know" option presented to the test taker is not stored.
pub const OPTION_COUNT: usize = 4;

/// Minimum final score (percent) required to pass.
pub const PASS_THRESHOLD_PERCENT: f64 = 90.0;

/// Which of the two regulations tests a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    General,
    Detailed,
}

impl TestType {
    pub const ALL: [TestType; 2] = [Self::General, Self::Detailed];

    pub fn code(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Detailed => "detailed",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "general" => Some(Self::General),
            "detailed" => Some(Self::Detailed),
            _ => None,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A stored quiz question. Text is unique per test type; quiz questions
/// are never updated or deleted through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub test_type: TestType,
    pub text: String,
    /// Exactly [`OPTION_COUNT`] entries, in presentation order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct: usize,
}

/// A quiz question ready for insertion (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuizQuestion {
    pub test_type: TestType,
    pub text: String,
    pub options: Vec<String>,
    pub correct: usize,
}

/// The wizard's in-progress quiz question, filled in five sequential
/// steps: test type, question text, then the four options in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub test_type: TestType,
    pub text: String,
    pub options: Vec<String>,
}

impl QuizDraft {
    pub fn new(test_type: TestType, text: String) -> Self {
        Self {
            test_type,
            text,
            options: Vec::new(),
        }
    }

    /// True once all four options have been collected.
    pub fn is_complete(&self) -> bool {
        self.options.len() >= OPTION_COUNT
    }

    /// Finalize the draft with the chosen correct-option index.
    pub fn into_question(self, correct: usize) -> NewQuizQuestion {
        NewQuizQuestion {
            test_type: self.test_type,
            text: self.text,
            options: self.options,
            correct,
        }
    }
}

/// One answered question, recorded for the admin breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub options: Vec<String>,
    /// The index the taker chose. Equal to `options.len()` for the
    /// synthetic "I don't know" option.
    pub chosen: usize,
    pub correct: usize,
}

impl AnswerRecord {
    /// Text of the chosen option, or `None` for the synthetic option or
    /// an out-of-range index.
    pub fn chosen_text(&self) -> Option<&str> {
        self.options.get(self.chosen).map(String::as_str)
    }

    pub fn correct_text(&self) -> &str {
        self.options
            .get(self.correct)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

/// Tally of a completed attempt, with the negative-marking arithmetic.
///
/// Every three wrong or skipped answers cancel one correct answer; the
/// raw score never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorecard {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
}

impl Scorecard {
    /// Whole correct answers deducted: `incorrect / 3`, floor division.
    pub fn negative_points(&self) -> u32 {
        self.incorrect / 3
    }

    pub fn raw_score(&self) -> u32 {
        self.correct.saturating_sub(self.negative_points())
    }

    /// Final score as a percentage of the question count.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.raw_score() as f64 / self.total as f64) * 100.0
    }

    pub fn passed(&self) -> bool {
        self.percent() >= PASS_THRESHOLD_PERCENT
    }
}
