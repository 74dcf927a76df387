use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::ScoreSummary;
use crate::learning::domain::{
    AnswerSheet, Question, QuestionId, Quiz, QuizId, QuizResult, ResultId, ResultStatus, UserId,
};

/// Payload sent by a learner when finishing a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub user_id: UserId,
    #[serde(rename = "quizId")]
    pub quiz_id: QuizId,
    #[serde(rename = "userAnswers", default)]
    pub answers: AnswerSheet,
    /// Question ids in the order they were shown.
    #[serde(rename = "questionOrder", default)]
    pub presented_order: Option<Vec<QuestionId>>,
    #[serde(default)]
    pub passcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("quiz opens at {opens_at}")]
    NotYetOpen { opens_at: DateTime<Utc> },
    #[error("quiz closed at {closed_at}")]
    Closed { closed_at: DateTime<Utc> },
    #[error("attempt limit of {limit} reached")]
    AttemptsExhausted { limit: u32 },
    #[error("passcode does not match")]
    PasscodeMismatch,
}

/// Availability window, attempt limit and passcode checks.
pub fn check_access(
    quiz: &Quiz,
    passcode: Option<&str>,
    prior_attempts: usize,
    now: DateTime<Utc>,
) -> Result<(), SubmissionError> {
    if let Some(opens_at) = quiz.start_time {
        if now < opens_at {
            return Err(SubmissionError::NotYetOpen { opens_at });
        }
    }
    if let Some(closed_at) = quiz.end_time {
        if now > closed_at {
            return Err(SubmissionError::Closed { closed_at });
        }
    }
    if let Some(limit) = quiz.attempt_limit {
        if limit > 0 && prior_attempts >= limit as usize {
            return Err(SubmissionError::AttemptsExhausted { limit });
        }
    }
    match quiz.passcode.as_deref().filter(|code| !code.is_empty()) {
        Some(expected) if passcode.map(str::trim) != Some(expected) => {
            Err(SubmissionError::PasscodeMismatch)
        }
        _ => Ok(()),
    }
}

/// Freeze the questions in presented order. Unknown ids are dropped and any
/// question the client did not echo is appended in quiz order.
pub fn snapshot_questions(quiz: &Quiz, presented: Option<&[QuestionId]>) -> Vec<Question> {
    let Some(presented) = presented else {
        return quiz.questions.clone();
    };

    let mut snapshot: Vec<Question> = Vec::with_capacity(quiz.questions.len());
    for id in presented {
        if snapshot.iter().any(|question| &question.id == id) {
            continue;
        }
        if let Some(question) = quiz.questions.iter().find(|question| &question.id == id) {
            snapshot.push(question.clone());
        }
    }
    for question in &quiz.questions {
        if !snapshot.iter().any(|taken| taken.id == question.id) {
            snapshot.push(question.clone());
        }
    }
    snapshot
}

/// Validate and score a submission, producing the record to persist.
pub fn build_result(
    quiz: &Quiz,
    submission: QuizSubmission,
    prior_attempts: usize,
    result_id: ResultId,
    now: DateTime<Utc>,
) -> Result<QuizResult, SubmissionError> {
    check_access(quiz, submission.passcode.as_deref(), prior_attempts, now)?;

    let question_order = snapshot_questions(quiz, submission.presented_order.as_deref());
    let summary = ScoreSummary::tally(&question_order, &submission.answers);

    Ok(QuizResult {
        id: result_id,
        user_id: submission.user_id,
        quiz_id: quiz.id.clone(),
        status: ResultStatus::Completed,
        question_order,
        user_answers: submission.answers,
        score: summary.score,
        total_points: summary.total_points,
        submitted_at: Some(now),
    })
}
