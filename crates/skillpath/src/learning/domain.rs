use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for gateway user rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuizId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AchievementId(pub String);

macro_rules! display_as_inner {
    ($($id:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )+
    };
}

display_as_inner!(UserId, QuizId, QuestionId, ResultId, AchievementId);

fn default_points() -> u32 {
    1
}

/// A single quiz question together with its answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default, alias = "question")]
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Question type and the shape of its answer key. The `type` tag uses the
/// gateway's names; anything else lands in `Unsupported`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "single", rename_all = "camelCase")]
    SingleChoice {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        correct_answers: Vec<usize>,
    },
    #[serde(rename = "multiple", rename_all = "camelCase")]
    MultipleChoice {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        correct_answers: Vec<usize>,
    },
    #[serde(rename = "textInput", rename_all = "camelCase")]
    FreeText {
        #[serde(default)]
        correct_answers: Vec<String>,
    },
    #[serde(rename = "trueFalse", rename_all = "camelCase")]
    TrueFalse {
        #[serde(default)]
        correct_answer: Option<bool>,
    },
    #[serde(rename = "ordering", rename_all = "camelCase")]
    Ordering {
        #[serde(default)]
        order_items: Vec<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single",
            QuestionKind::MultipleChoice { .. } => "multiple",
            QuestionKind::FreeText { .. } => "textInput",
            QuestionKind::TrueFalse { .. } => "trueFalse",
            QuestionKind::Ordering { .. } => "ordering",
            QuestionKind::Unsupported => "unsupported",
        }
    }
}

/// Learner input as stored by the gateway. Values that fit none of the known
/// shapes are kept verbatim and always grade as incorrect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Flag(bool),
    Text(String),
    Sequence(Vec<String>),
    Unrecognized(serde_json::Value),
}

/// Answers keyed by question id.
pub type AnswerSheet = BTreeMap<QuestionId, SubmittedAnswer>;

/// Live quiz definition. Editable after attempts exist, so stored results
/// never grade against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(rename = "timeLimit", default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(rename = "shuffleQuestions", default)]
    pub shuffle_questions: bool,
    #[serde(rename = "shuffleOptions", default)]
    pub shuffle_options: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attempt_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Completed,
    PendingReview,
}

impl ResultStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ResultStatus::Completed => "completed",
            ResultStatus::PendingReview => "pending_review",
        }
    }
}

/// Stored attempt. `question_order` is the snapshot presented to the learner
/// and carries the answer key used for every later grading pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: ResultId,
    pub user_id: UserId,
    #[serde(rename = "quizId")]
    pub quiz_id: QuizId,
    pub status: ResultStatus,
    #[serde(rename = "questionOrder", default)]
    pub question_order: Vec<Question>,
    #[serde(rename = "userAnswers", default)]
    pub user_answers: AnswerSheet,
    #[serde(default)]
    pub score: u32,
    #[serde(rename = "totalPoints", default)]
    pub total_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl QuizResult {
    pub fn is_completed(&self) -> bool {
        self.status == ResultStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub experience_points: Option<u64>,
    #[serde(default)]
    pub daily_streak: u32,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Profile {
    pub fn experience(&self) -> u64 {
        self.experience_points.unwrap_or(0)
    }

    /// First and last name joined, or `None` when both are blank.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub badge_color: Option<String>,
}

/// Row of the user/achievement join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedAchievement {
    pub user_id: UserId,
    pub achievement_id: AchievementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<DateTime<Utc>>,
}
