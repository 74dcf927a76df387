//! Grading, scoring and the attempt lifecycle of a single quiz.

pub mod grading;
pub mod presentation;
pub mod scoring;
pub mod submission;

pub use grading::{grade_answer, is_correct};
pub use presentation::{PresentedQuestion, QuizPresentation};
pub use scoring::{AttemptGrade, GradedQuestion, ScoreSummary};
pub use submission::{build_result, check_access, QuizSubmission, SubmissionError};
