use std::sync::Arc;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::LearnerId,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{PaginationParams, SubmitQuizAttemptRequest},
        response::PublicQuizDto,
    },
};

#[get("/api/quizzes")]
async fn list_quizzes(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let response = state.quiz_service.list_quizzes(&pagination).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Learner view of a chapter quiz, answer key stripped.
#[get("/api/quizzes/{chapter_id}")]
async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    chapter_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz_by_chapter(&chapter_id).await?;
    Ok(HttpResponse::Ok().json(PublicQuizDto::from(quiz)))
}

#[post("/api/quizzes/{chapter_id}/attempts")]
async fn submit_attempt(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    chapter_id: web::Path<String>,
    request: web::Json<SubmitQuizAttemptRequest>,
    learner: LearnerId,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "Submission for '{}' by '{}' (request {})",
        chapter_id,
        learner.0,
        get_request_id(&req).unwrap_or_default()
    );

    let attempt = state
        .attempt_service
        .submit_attempt(&learner.0, &chapter_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[get("/api/quizzes/{chapter_id}/attempts")]
async fn list_attempts(
    state: web::Data<Arc<AppState>>,
    chapter_id: web::Path<String>,
    query: web::Query<PaginationParams>,
    learner: LearnerId,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let response = state
        .attempt_service
        .list_attempts(&learner.0, &chapter_id, &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/attempts/{attempt_id}")]
async fn get_attempt(
    state: web::Data<Arc<AppState>>,
    attempt_id: web::Path<String>,
    learner: LearnerId,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .attempt_service
        .get_attempt(&learner.0, &attempt_id)
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}
