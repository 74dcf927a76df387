use super::domain::{
    Achievement, EarnedAchievement, Profile, Quiz, QuizId, QuizResult, ResultId, UserId,
};

/// Read/write seam over the hosted backend so the service can be exercised
/// in isolation.
pub trait LearningRepository: Send + Sync {
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError>;
    fn quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, RepositoryError>;
    fn quizzes(&self) -> Result<Vec<Quiz>, RepositoryError>;
    fn results_for_user(&self, user_id: &UserId) -> Result<Vec<QuizResult>, RepositoryError>;
    fn result(&self, result_id: &ResultId) -> Result<Option<QuizResult>, RepositoryError>;
    /// Store an attempt unless the user already holds `attempt_limit` results
    /// for the same quiz. Counting and inserting happen as one step.
    fn insert_attempt(
        &self,
        result: QuizResult,
        attempt_limit: Option<u32>,
    ) -> Result<QuizResult, RepositoryError>;
    fn achievements(&self) -> Result<Vec<Achievement>, RepositoryError>;
    fn earned_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedAchievement>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("attempt limit of {limit} reached")]
    LimitReached { limit: u32 },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
