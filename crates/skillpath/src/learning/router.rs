use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{AnswerSheet, Question, QuizId, ResultId, ResultStatus, UserId};
use super::progress::DEFAULT_LEADERBOARD_SIZE;
use super::quiz::{AttemptGrade, QuizSubmission, ScoreSummary};
use super::repository::{LearningRepository, RepositoryError};
use super::service::{LearningService, LearningServiceError};

const MAX_LEADERBOARD_SIZE: usize = 100;

/// Router builder exposing the learning endpoints.
pub fn learning_router<R>(service: Arc<LearningService<R>>) -> Router
where
    R: LearningRepository + 'static,
{
    Router::new()
        .route("/api/v1/users/:user_id/progress", get(progress_handler::<R>))
        .route("/api/v1/users/:user_id/weak-topics", get(weak_topics_handler::<R>))
        .route("/api/v1/users/:user_id/certificates", post(certificate_handler::<R>))
        .route("/api/v1/quizzes/:quiz_id/presentation", get(presentation_handler::<R>))
        .route("/api/v1/results", post(submit_handler::<R>))
        .route("/api/v1/results/:result_id/review", get(review_handler::<R>))
        .route("/api/v1/leaderboard", get(leaderboard_handler::<R>))
        .route("/api/v1/grade", post(grade_handler))
        .with_state(service)
}

/// Receipt returned after a submission is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub result_id: ResultId,
    pub quiz_id: QuizId,
    pub status: ResultStatus,
    pub score: u32,
    pub total_points: u32,
    pub correct_answers_count: usize,
    pub total_questions: usize,
    pub percentage: u8,
}

impl SubmissionReceipt {
    fn new(
        result_id: ResultId,
        quiz_id: QuizId,
        status: ResultStatus,
        summary: ScoreSummary,
    ) -> Self {
        Self {
            result_id,
            quiz_id,
            status,
            score: summary.score,
            total_points: summary.total_points,
            correct_answers_count: summary.correct_answers_count,
            total_questions: summary.total_questions,
            percentage: summary.percentage,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CertificateBody {
    pub(crate) course_title: String,
    #[serde(default)]
    pub(crate) issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) issuer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeRequest {
    pub(crate) questions: Vec<Question>,
    #[serde(rename = "userAnswers", alias = "answers", default)]
    pub(crate) answers: AnswerSheet,
}

fn error_response(error: LearningServiceError) -> Response {
    let status = match &error {
        LearningServiceError::UnknownUser(_)
        | LearningServiceError::UnknownQuiz(_)
        | LearningServiceError::UnknownResult(_)
        | LearningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LearningServiceError::Submission(_)
        | LearningServiceError::Repository(RepositoryError::LimitReached { .. }) => {
            StatusCode::FORBIDDEN
        }
        LearningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LearningServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
{
    match service.progress_overview(&UserId(user_id)) {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn weak_topics_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
{
    match service.weak_topics(&UserId(user_id)) {
        Ok(topics) => (StatusCode::OK, Json(topics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn certificate_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Path(user_id): Path<String>,
    Json(body): Json<CertificateBody>,
) -> Response
where
    R: LearningRepository + 'static,
{
    let issued_on = body.issued_on.unwrap_or_else(|| Utc::now().date_naive());
    match service.certificate(&UserId(user_id), &body.course_title, issued_on, body.issuer) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn presentation_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Path(quiz_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
{
    let presentation = {
        let mut rng = rand::thread_rng();
        service.present_quiz(&QuizId(quiz_id), &mut rng)
    };
    match presentation {
        Ok(presentation) => (StatusCode::OK, Json(presentation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Json(submission): Json<QuizSubmission>,
) -> Response
where
    R: LearningRepository + 'static,
{
    match service.submit(submission, Utc::now()) {
        Ok(result) => {
            let receipt = SubmissionReceipt::new(
                result.id.clone(),
                result.quiz_id.clone(),
                result.status,
                result.summary(),
            );
            (StatusCode::CREATED, Json(receipt)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Path(result_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
{
    match service.review(&ResultId(result_id)) {
        Ok(grade) => (StatusCode::OK, Json(grade)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<R>(
    State(service): State<Arc<LearningService<R>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: LearningRepository + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .min(MAX_LEADERBOARD_SIZE);
    match service.leaderboard(limit) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn grade_handler(Json(request): Json<GradeRequest>) -> Json<AttemptGrade> {
    Json(AttemptGrade::grade(&request.questions, &request.answers))
}
