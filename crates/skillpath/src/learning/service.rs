use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use tracing::{info, warn};

use super::certificate::{CertificateDocument, CertificateRequest};
use super::domain::{QuizId, QuizResult, ResultId, UserId};
use super::progress::{
    leaderboard, weak_topics, LeaderboardEntry, ProgressInputs, ProgressOverview, TopicAccuracy,
};
use super::quiz::{build_result, AttemptGrade, QuizPresentation, QuizSubmission, SubmissionError};
use super::repository::{LearningRepository, RepositoryError};

/// Service composing the gateway repository with the pure learning core.
pub struct LearningService<R> {
    repository: Arc<R>,
}

static RESULT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_result_id(now: DateTime<Utc>) -> ResultId {
    let id = RESULT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResultId(format!("res-{}-{id:06}", now.timestamp_millis()))
}

impl<R> LearningService<R>
where
    R: LearningRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Dashboard view for one learner.
    pub fn progress_overview(
        &self,
        user_id: &UserId,
    ) -> Result<ProgressOverview, LearningServiceError> {
        let profile = self
            .repository
            .profile(user_id)?
            .ok_or_else(|| LearningServiceError::UnknownUser(user_id.clone()))?;
        let results = self.repository.results_for_user(user_id)?;
        let quizzes = self.repository.quizzes()?;
        let achievements = self.repository.achievements()?;
        let earned = self.repository.earned_achievements(user_id)?;

        Ok(ProgressOverview::build(ProgressInputs {
            profile: &profile,
            results: &results,
            quizzes: &quizzes,
            achievements: &achievements,
            earned: &earned,
        }))
    }

    /// Weakest topics; unknown users simply have none.
    pub fn weak_topics(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TopicAccuracy>, LearningServiceError> {
        let Some(profile) = self.repository.profile(user_id)? else {
            return Ok(Vec::new());
        };
        let results = self.repository.results_for_user(user_id)?;
        let quizzes = self.repository.quizzes()?;
        Ok(weak_topics(Some(&profile), &results, &quizzes))
    }

    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LearningServiceError> {
        let profiles = self.repository.profiles()?;
        Ok(leaderboard(&profiles, limit))
    }

    pub fn present_quiz<G: Rng + ?Sized>(
        &self,
        quiz_id: &QuizId,
        rng: &mut G,
    ) -> Result<QuizPresentation, LearningServiceError> {
        let quiz = self
            .repository
            .quiz(quiz_id)?
            .ok_or_else(|| LearningServiceError::UnknownQuiz(quiz_id.clone()))?;
        Ok(QuizPresentation::prepare(&quiz, rng))
    }

    /// Validate, score and persist a finished attempt.
    pub fn submit(
        &self,
        submission: QuizSubmission,
        now: DateTime<Utc>,
    ) -> Result<QuizResult, LearningServiceError> {
        if self.repository.profile(&submission.user_id)?.is_none() {
            return Err(LearningServiceError::UnknownUser(submission.user_id));
        }
        let quiz = self
            .repository
            .quiz(&submission.quiz_id)?
            .ok_or_else(|| LearningServiceError::UnknownQuiz(submission.quiz_id.clone()))?;

        let prior_attempts = self
            .repository
            .results_for_user(&submission.user_id)?
            .iter()
            .filter(|result| result.quiz_id == quiz.id)
            .count();

        let user_id = submission.user_id.clone();
        let result = build_result(&quiz, submission, prior_attempts, next_result_id(now), now)
            .map_err(|err| {
                warn!(user = %user_id, quiz = %quiz.id, error = %err, "submission rejected");
                err
            })?;

        let attempt_limit = quiz.attempt_limit.filter(|limit| *limit > 0);
        let stored = match self.repository.insert_attempt(result, attempt_limit) {
            Ok(stored) => stored,
            Err(RepositoryError::LimitReached { limit }) => {
                warn!(user = %user_id, quiz = %quiz.id, limit, "submission rejected at insert");
                return Err(SubmissionError::AttemptsExhausted { limit }.into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            user = %stored.user_id,
            quiz = %stored.quiz_id,
            score = stored.score,
            total_points = stored.total_points,
            "quiz result recorded"
        );
        Ok(stored)
    }

    /// Answer review for a stored result, graded against its snapshot.
    pub fn review(&self, result_id: &ResultId) -> Result<AttemptGrade, LearningServiceError> {
        let result = self
            .repository
            .result(result_id)?
            .ok_or_else(|| LearningServiceError::UnknownResult(result_id.clone()))?;
        Ok(result.grade())
    }

    pub fn certificate(
        &self,
        user_id: &UserId,
        course_title: &str,
        issued_on: NaiveDate,
        issuer: Option<String>,
    ) -> Result<CertificateDocument, LearningServiceError> {
        let profile = self
            .repository
            .profile(user_id)?
            .ok_or_else(|| LearningServiceError::UnknownUser(user_id.clone()))?;

        Ok(CertificateDocument::compose(&CertificateRequest {
            recipient_name: profile.display_name().unwrap_or_default(),
            course_title: course_title.to_string(),
            issued_on,
            issuer,
        }))
    }
}

/// Error raised by the learning service.
#[derive(Debug, thiserror::Error)]
pub enum LearningServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("unknown user '{0}'")]
    UnknownUser(UserId),
    #[error("unknown quiz '{0}'")]
    UnknownQuiz(QuizId),
    #[error("unknown result '{0}'")]
    UnknownResult(ResultId),
}
