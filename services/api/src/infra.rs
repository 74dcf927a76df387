use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use skillpath::learning::{
    Achievement, EarnedAchievement, LearningDataset, LearningRepository, Profile, Quiz, QuizId,
    QuizResult, RepositoryError, ResultId, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    quizzes: Vec<Quiz>,
    results: HashMap<ResultId, QuizResult>,
    achievements: Vec<Achievement>,
    earned: Vec<EarnedAchievement>,
}

/// Gateway stand-in backed by a dataset snapshot. Submissions only live for
/// the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLearningRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryLearningRepository {
    pub(crate) fn from_dataset(dataset: LearningDataset) -> Self {
        let LearningDataset {
            profiles,
            quizzes,
            results,
            achievements,
            earned_achievements,
        } = dataset;

        let tables = Tables {
            profiles,
            quizzes,
            results: results
                .into_iter()
                .map(|result| (result.id.clone(), result))
                .collect(),
            achievements,
            earned: earned_achievements,
        };

        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl LearningRepository for InMemoryLearningRepository {
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.tables()?;
        Ok(guard
            .profiles
            .iter()
            .find(|profile| &profile.id == user_id)
            .cloned())
    }

    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.tables()?.profiles.clone())
    }

    fn quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        let guard = self.tables()?;
        Ok(guard.quizzes.iter().find(|quiz| &quiz.id == quiz_id).cloned())
    }

    fn quizzes(&self) -> Result<Vec<Quiz>, RepositoryError> {
        Ok(self.tables()?.quizzes.clone())
    }

    fn results_for_user(&self, user_id: &UserId) -> Result<Vec<QuizResult>, RepositoryError> {
        let guard = self.tables()?;
        let mut results: Vec<QuizResult> = guard
            .results
            .values()
            .filter(|result| &result.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|left, right| {
            left.submitted_at
                .cmp(&right.submitted_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(results)
    }

    fn result(&self, result_id: &ResultId) -> Result<Option<QuizResult>, RepositoryError> {
        Ok(self.tables()?.results.get(result_id).cloned())
    }

    fn insert_attempt(
        &self,
        result: QuizResult,
        attempt_limit: Option<u32>,
    ) -> Result<QuizResult, RepositoryError> {
        let mut guard = self.tables()?;
        if guard.results.contains_key(&result.id) {
            return Err(RepositoryError::Conflict);
        }
        if let Some(limit) = attempt_limit {
            let attempts = guard
                .results
                .values()
                .filter(|stored| {
                    stored.user_id == result.user_id && stored.quiz_id == result.quiz_id
                })
                .count();
            if attempts >= limit as usize {
                return Err(RepositoryError::LimitReached { limit });
            }
        }
        guard.results.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    fn achievements(&self) -> Result<Vec<Achievement>, RepositoryError> {
        Ok(self.tables()?.achievements.clone())
    }

    fn earned_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedAchievement>, RepositoryError> {
        let guard = self.tables()?;
        Ok(guard
            .earned
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
