use serde::Serialize;

use super::grading::grade_answer;
use crate::learning::domain::{AnswerSheet, Question, QuestionId, QuizResult};

/// Totals for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub score: u32,
    pub total_points: u32,
    pub correct_answers_count: usize,
    pub total_questions: usize,
    pub percentage: u8,
}

impl ScoreSummary {
    pub fn tally(questions: &[Question], answers: &AnswerSheet) -> Self {
        questions
            .iter()
            .fold(Self::default(), |mut summary, question| {
                summary.total_questions += 1;
                summary.total_points = summary.total_points.saturating_add(question.points);
                if grade_answer(question, answers.get(&question.id)) {
                    summary.correct_answers_count += 1;
                    summary.score = summary.score.saturating_add(question.points);
                }
                summary
            })
            .with_percentage()
    }

    fn with_percentage(mut self) -> Self {
        self.percentage = percentage(self.score, self.total_points);
        self
    }
}

pub(crate) fn percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let ratio = (f64::from(part) / f64::from(whole) * 100.0).round();
    ratio.clamp(0.0, 100.0) as u8
}

/// Per-question line of an answer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuestion {
    pub question_id: QuestionId,
    pub question_type: &'static str,
    pub correct: bool,
    pub answered: bool,
    pub points_awarded: u32,
    pub points_possible: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptGrade {
    pub summary: ScoreSummary,
    pub questions: Vec<GradedQuestion>,
}

impl AttemptGrade {
    pub fn grade(questions: &[Question], answers: &AnswerSheet) -> Self {
        let graded = questions
            .iter()
            .map(|question| {
                let answer = answers.get(&question.id);
                let correct = grade_answer(question, answer);
                GradedQuestion {
                    question_id: question.id.clone(),
                    question_type: question.kind.label(),
                    correct,
                    answered: answer.is_some(),
                    points_awarded: if correct { question.points } else { 0 },
                    points_possible: question.points,
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        Self {
            summary: ScoreSummary::tally(questions, answers),
            questions: graded,
        }
    }
}

impl QuizResult {
    /// Re-grade against the snapshot stored with the result.
    pub fn grade(&self) -> AttemptGrade {
        AttemptGrade::grade(&self.question_order, &self.user_answers)
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::tally(&self.question_order, &self.user_answers)
    }
}
