use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::notify::ReportNotifier;
use super::service::{QuizService, ServiceError};
use super::session::SessionError;
use super::store::{SessionStore, SessionToken, StoreError};

/// Router builder exposing the presentation-facing quiz operations.
pub fn quiz_router<S, N>(service: Arc<QuizService<S, N>>) -> Router
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    Router::new()
        .route("/api/v1/quiz/questions", get(questions_handler::<S, N>))
        .route("/api/v1/quiz/sessions", post(start_handler::<S, N>))
        .route(
            "/api/v1/quiz/sessions/:token",
            get(session_handler::<S, N>),
        )
        .route(
            "/api/v1/quiz/sessions/:token/answers",
            put(answer_handler::<S, N>),
        )
        .route(
            "/api/v1/quiz/sessions/:token/submit",
            post(submit_handler::<S, N>),
        )
        .route(
            "/api/v1/quiz/sessions/:token/reset",
            post(reset_handler::<S, N>),
        )
        .route(
            "/api/v1/quiz/sessions/:token/report",
            get(report_handler::<S, N>),
        )
        .route(
            "/api/v1/quiz/sessions/:token/export",
            get(export_handler::<S, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartSessionRequest {
    pub(crate) respondent_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordAnswerRequest {
    pub(crate) question_index: usize,
    pub(crate) selected_option: String,
}

pub(crate) async fn questions_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    (StatusCode::OK, axum::Json(service.questions())).into_response()
}

pub(crate) async fn start_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    axum::Json(request): axum::Json<StartSessionRequest>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    match service.start(&request.respondent_name) {
        Ok(snapshot) => (StatusCode::CREATED, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    match service.session(&SessionToken(token)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
    axum::Json(request): axum::Json<RecordAnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    let token = SessionToken(token);
    match service.record_answer(&token, request.question_index, &request.selected_option) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    let token = SessionToken(token);
    match service.submit(&token, Local::now().naive_local()) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    let token = SessionToken(token);
    match service.reset(&token) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    let token = SessionToken(token);
    match service.report(&token, Local::now().naive_local()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<S, N>(
    State(service): State<Arc<QuizService<S, N>>>,
    Path(token): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    let token = SessionToken(token);
    match service.export_csv(&token, Local::now().naive_local()) {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Maps the error taxonomy onto HTTP statuses: validation problems are 422,
/// state conflicts 409, unknown sessions 404, everything else 500.
fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::UnknownSession(_) => StatusCode::NOT_FOUND,
        ServiceError::Session(
            SessionError::EmptyRespondentName
            | SessionError::QuestionOutOfRange { .. }
            | SessionError::UnknownOption { .. },
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Session(
            SessionError::IncompleteSubmission { .. }
            | SessionError::AlreadySubmitted
            | SessionError::NotStarted,
        ) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Store(_) | ServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
