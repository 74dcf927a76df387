//! Quiz grading, progress analytics and gamification for the learning platform.
//!
//! Everything under `quiz` and `progress` is a pure reduction over records
//! already fetched from the hosted backend. `service` and `router` wire those
//! reductions to a [`LearningRepository`] and expose them over HTTP.

pub mod certificate;
pub mod dataset;
pub mod domain;
pub mod import;
pub mod progress;
pub mod quiz;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use certificate::{CertificateDocument, CertificateRequest};
pub use dataset::{DatasetError, LearningDataset};
pub use domain::{
    Achievement, AchievementId, AnswerSheet, EarnedAchievement, Profile, Question, QuestionId,
    QuestionKind, Quiz, QuizId, QuizResult, ResultId, ResultStatus, SubmittedAnswer, UserId,
};
pub use import::{QuestionCsvImporter, QuestionImportError};
pub use repository::{LearningRepository, RepositoryError};
pub use router::{learning_router, SubmissionReceipt};
pub use service::{LearningService, LearningServiceError};
