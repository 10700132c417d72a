//! Interview categories, political topics and question records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::QuestionId;

/// Top-level interview category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewCategory {
    Personal,
    Career,
    Political,
}

impl InterviewCategory {
    pub const ALL: [InterviewCategory; 3] = [Self::Personal, Self::Career, Self::Political];

    /// Stable code used in action strings and storage.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Career => "career",
            Self::Political => "political",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "personal" => Some(Self::Personal),
            "career" => Some(Self::Career),
            "political" => Some(Self::Political),
            _ => None,
        }
    }

    /// A political interview always carries a topic; the other categories
    /// never do.
    pub fn requires_topic(&self) -> bool {
        matches!(self, Self::Political)
    }
}

impl fmt::Display for InterviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sub-topic of a political interview. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoliticalTopic {
    IslamicRepublic,
    Pahlavi,
    Qajar,
    AncientPersia,
    PostIslamicIran,
    Nazism,
    Communism,
    Liberalism,
    Judaism,
    Wokeism,
    Capitalism,
}

impl PoliticalTopic {
    pub const ALL: [PoliticalTopic; 11] = [
        Self::IslamicRepublic,
        Self::Pahlavi,
        Self::Qajar,
        Self::AncientPersia,
        Self::PostIslamicIran,
        Self::Nazism,
        Self::Communism,
        Self::Liberalism,
        Self::Judaism,
        Self::Wokeism,
        Self::Capitalism,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::IslamicRepublic => "islamic-republic",
            Self::Pahlavi => "pahlavi",
            Self::Qajar => "qajar",
            Self::AncientPersia => "ancient-persia",
            Self::PostIslamicIran => "post-islamic-iran",
            Self::Nazism => "nazism",
            Self::Communism => "communism",
            Self::Liberalism => "liberalism",
            Self::Judaism => "judaism",
            Self::Wokeism => "wokeism",
            Self::Capitalism => "capitalism",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

impl fmt::Display for PoliticalTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A stored interview question.
///
/// Question text is unique across the whole set; questions are created by
/// the admin wizard and deleted by id, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub id: QuestionId,
    pub category: InterviewCategory,
    pub topic: Option<PoliticalTopic>,
    pub text: String,
}
