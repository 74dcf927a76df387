use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::learning::domain::{
    Achievement, AchievementId, AnswerSheet, EarnedAchievement, Profile, Question, QuestionId,
    QuestionKind, Quiz, QuizId, QuizResult, ResultId, ResultStatus, SubmittedAnswer, UserId,
};
use crate::learning::repository::{LearningRepository, RepositoryError};
use crate::learning::{learning_router, LearningService};

pub(super) fn learner() -> Profile {
    Profile {
        id: UserId("learner-1".into()),
        experience_points: Some(250),
        daily_streak: 4,
        first_name: Some("Maya".into()),
        last_name: Some("Okafor".into()),
    }
}

pub(super) fn true_false(id: &str, key: bool, tags: &[&str]) -> Question {
    Question {
        id: QuestionId(id.into()),
        text: format!("Statement {id}"),
        kind: QuestionKind::TrueFalse {
            correct_answer: Some(key),
        },
        explanation: None,
        points: 1,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

pub(super) fn quiz(id: &str, category: Option<&str>, questions: Vec<Question>) -> Quiz {
    Quiz {
        id: QuizId(id.into()),
        title: format!("Quiz {id}"),
        category: category.map(str::to_string),
        questions,
        time_limit_minutes: None,
        shuffle_questions: false,
        shuffle_options: false,
        start_time: None,
        end_time: None,
        attempt_limit: None,
        passcode: None,
    }
}

/// Answer every question with `true`; keys decide what counts as correct.
pub(super) fn all_true(questions: &[Question]) -> AnswerSheet {
    questions
        .iter()
        .map(|question| (question.id.clone(), SubmittedAnswer::Flag(true)))
        .collect()
}

pub(super) fn result(
    id: &str,
    user: &UserId,
    quiz: &Quiz,
    status: ResultStatus,
    answers: AnswerSheet,
) -> QuizResult {
    QuizResult {
        id: ResultId(id.into()),
        user_id: user.clone(),
        quiz_id: quiz.id.clone(),
        status,
        question_order: quiz.questions.clone(),
        user_answers: answers,
        score: 0,
        total_points: quiz.questions.iter().map(|question| question.points).sum(),
        submitted_at: None,
    }
}

pub(super) fn achievement(id: &str) -> Achievement {
    Achievement {
        id: AchievementId(id.into()),
        name: format!("Achievement {id}"),
        description: "Earned by trying".into(),
        icon_name: Some("trophy".into()),
        badge_color: Some("gold".into()),
    }
}

#[derive(Default, Clone)]
pub(super) struct TestRepository {
    profiles: Arc<Mutex<Vec<Profile>>>,
    quizzes: Arc<Mutex<Vec<Quiz>>>,
    results: Arc<Mutex<HashMap<ResultId, QuizResult>>>,
    achievements: Arc<Mutex<Vec<Achievement>>>,
    earned: Arc<Mutex<Vec<EarnedAchievement>>>,
}

impl TestRepository {
    pub(super) fn with_profile(self, profile: Profile) -> Self {
        self.profiles.lock().expect("profiles mutex").push(profile);
        self
    }

    pub(super) fn with_quiz(self, quiz: Quiz) -> Self {
        self.quizzes.lock().expect("quizzes mutex").push(quiz);
        self
    }

    pub(super) fn with_result(self, result: QuizResult) -> Self {
        self.results
            .lock()
            .expect("results mutex")
            .insert(result.id.clone(), result);
        self
    }

    pub(super) fn with_achievement(
        self,
        achievement: Achievement,
        earned_by: Option<&UserId>,
    ) -> Self {
        if let Some(user_id) = earned_by {
            self.earned.lock().expect("earned mutex").push(EarnedAchievement {
                user_id: user_id.clone(),
                achievement_id: achievement.id.clone(),
                earned_at: None,
            });
        }
        self.achievements
            .lock()
            .expect("achievements mutex")
            .push(achievement);
        self
    }

    pub(super) fn stored_results(&self) -> Vec<QuizResult> {
        self.results
            .lock()
            .expect("results mutex")
            .values()
            .cloned()
            .collect()
    }
}

impl LearningRepository for TestRepository {
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex");
        Ok(guard.iter().find(|profile| &profile.id == user_id).cloned())
    }

    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.profiles.lock().expect("profiles mutex").clone())
    }

    fn quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        let guard = self.quizzes.lock().expect("quizzes mutex");
        Ok(guard.iter().find(|quiz| &quiz.id == quiz_id).cloned())
    }

    fn quizzes(&self) -> Result<Vec<Quiz>, RepositoryError> {
        Ok(self.quizzes.lock().expect("quizzes mutex").clone())
    }

    fn results_for_user(&self, user_id: &UserId) -> Result<Vec<QuizResult>, RepositoryError> {
        let guard = self.results.lock().expect("results mutex");
        let mut results: Vec<QuizResult> = guard
            .values()
            .filter(|result| &result.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(results)
    }

    fn result(&self, result_id: &ResultId) -> Result<Option<QuizResult>, RepositoryError> {
        Ok(self.results.lock().expect("results mutex").get(result_id).cloned())
    }

    fn insert_attempt(
        &self,
        result: QuizResult,
        attempt_limit: Option<u32>,
    ) -> Result<QuizResult, RepositoryError> {
        let mut guard = self.results.lock().expect("results mutex");
        if guard.contains_key(&result.id) {
            return Err(RepositoryError::Conflict);
        }
        if let Some(limit) = attempt_limit {
            let attempts = guard
                .values()
                .filter(|stored| {
                    stored.user_id == result.user_id && stored.quiz_id == result.quiz_id
                })
                .count();
            if attempts >= limit as usize {
                return Err(RepositoryError::LimitReached { limit });
            }
        }
        guard.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    fn achievements(&self) -> Result<Vec<Achievement>, RepositoryError> {
        Ok(self.achievements.lock().expect("achievements mutex").clone())
    }

    fn earned_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedAchievement>, RepositoryError> {
        let guard = self.earned.lock().expect("earned mutex");
        Ok(guard
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("gateway offline".to_string()))
}

impl LearningRepository for UnavailableRepository {
    fn profile(&self, _user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        offline()
    }

    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        offline()
    }

    fn quiz(&self, _quiz_id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        offline()
    }

    fn quizzes(&self) -> Result<Vec<Quiz>, RepositoryError> {
        offline()
    }

    fn results_for_user(&self, _user_id: &UserId) -> Result<Vec<QuizResult>, RepositoryError> {
        offline()
    }

    fn result(&self, _result_id: &ResultId) -> Result<Option<QuizResult>, RepositoryError> {
        offline()
    }

    fn insert_attempt(
        &self,
        _result: QuizResult,
        _attempt_limit: Option<u32>,
    ) -> Result<QuizResult, RepositoryError> {
        offline()
    }

    fn achievements(&self) -> Result<Vec<Achievement>, RepositoryError> {
        offline()
    }

    fn earned_achievements(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<EarnedAchievement>, RepositoryError> {
        offline()
    }
}

pub(super) fn service(repository: TestRepository) -> LearningService<TestRepository> {
    LearningService::new(Arc::new(repository))
}

pub(super) fn router(repository: TestRepository) -> axum::Router {
    learning_router(Arc::new(service(repository)))
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}
