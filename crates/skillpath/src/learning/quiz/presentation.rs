use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::learning::domain::{Question, QuestionId, QuestionKind, Quiz, QuizId};

/// Learner-facing copy of a quiz with all answer keys removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPresentation {
    pub quiz_id: QuizId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub requires_passcode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_limit: Option<u32>,
    pub questions: Vec<PresentedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedQuestion {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: &'static str,
    pub points: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl QuizPresentation {
    /// Ordering items are always shuffled, otherwise the key would be the
    /// prompt. Questions and options follow the quiz flags.
    pub fn prepare<G: Rng + ?Sized>(quiz: &Quiz, rng: &mut G) -> Self {
        let mut questions: Vec<PresentedQuestion> = quiz
            .questions
            .iter()
            .map(|question| present_question(question, quiz.shuffle_options, rng))
            .collect();

        if quiz.shuffle_questions {
            questions.shuffle(rng);
        }

        Self {
            quiz_id: quiz.id.clone(),
            title: quiz.title.clone(),
            category: quiz.category.clone(),
            time_limit_minutes: quiz.time_limit_minutes,
            requires_passcode: quiz
                .passcode
                .as_deref()
                .is_some_and(|code| !code.is_empty()),
            attempt_limit: quiz.attempt_limit,
            questions,
        }
    }

    /// Presented order, suitable for echoing back on submission.
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions
            .iter()
            .map(|question| question.id.clone())
            .collect()
    }
}

fn present_question<G: Rng + ?Sized>(
    question: &Question,
    shuffle_options: bool,
    rng: &mut G,
) -> PresentedQuestion {
    let (mut options, mut order_items) = match &question.kind {
        QuestionKind::SingleChoice { options, .. }
        | QuestionKind::MultipleChoice { options, .. } => (options.clone(), Vec::new()),
        QuestionKind::Ordering { order_items } => (Vec::new(), order_items.clone()),
        QuestionKind::FreeText { .. }
        | QuestionKind::TrueFalse { .. }
        | QuestionKind::Unsupported => (Vec::new(), Vec::new()),
    };

    if shuffle_options {
        options.shuffle(rng);
    }
    order_items.shuffle(rng);

    PresentedQuestion {
        id: question.id.clone(),
        text: question.text.clone(),
        question_type: question.kind.label(),
        points: question.points,
        options,
        order_items,
        tags: question.tags.clone(),
    }
}
