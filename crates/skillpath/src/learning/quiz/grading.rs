use crate::learning::domain::{Question, QuestionKind, SubmittedAnswer};

/// Grade an answer when either side may be missing. Missing data is never
/// correct.
pub fn is_correct(question: Option<&Question>, answer: Option<&SubmittedAnswer>) -> bool {
    question.is_some_and(|question| grade_answer(question, answer))
}

/// Grade a submitted answer against the question's own answer key.
pub fn grade_answer(question: &Question, answer: Option<&SubmittedAnswer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (&question.kind, answer) {
        (
            QuestionKind::SingleChoice {
                options,
                correct_answers,
            },
            SubmittedAnswer::Text(value),
        ) => correct_answers
            .first()
            .and_then(|index| options.get(*index))
            .is_some_and(|expected| expected == value),
        (
            QuestionKind::MultipleChoice {
                options,
                correct_answers,
            },
            SubmittedAnswer::Sequence(values),
        ) => {
            let Some(mut expected) = correct_answers
                .iter()
                .map(|index| options.get(*index))
                .collect::<Option<Vec<&String>>>()
            else {
                return false;
            };
            let mut submitted: Vec<&String> = values.iter().collect();
            expected.sort();
            submitted.sort();
            expected == submitted
        }
        (QuestionKind::FreeText { correct_answers }, SubmittedAnswer::Text(value)) => {
            correct_answers
                .first()
                .is_some_and(|expected| normalize_text(expected) == normalize_text(value))
        }
        (QuestionKind::TrueFalse { correct_answer }, SubmittedAnswer::Flag(value)) => {
            correct_answer.is_some_and(|expected| expected == *value)
        }
        (QuestionKind::Ordering { order_items }, SubmittedAnswer::Sequence(values)) => {
            order_items == values
        }
        _ => false,
    }
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}
