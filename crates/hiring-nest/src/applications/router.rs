use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus};
use super::repository::{ApplicationRepository, EventPublisher};
use super::service::{ApplicationService, ApplicationServiceError};
use crate::domain::JobId;
use crate::identity::{Actor, IdentityError};
use crate::jobs::JobRepository;

type SharedService<A, J, E> = Arc<ApplicationService<A, J, E>>;

/// Router builder exposing HTTP endpoints for the application lifecycle.
pub fn application_router<A, J, E>(service: SharedService<A, J, E>) -> Router
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            get(list_handler::<A, J, E>).post(create_handler::<A, J, E>),
        )
        .route("/api/applications/summary", get(summary_handler::<A, J, E>))
        .route(
            "/api/applications/:application_id",
            get(get_handler::<A, J, E>),
        )
        .route(
            "/api/applications/:application_id/status",
            post(transition_handler::<A, J, E>),
        )
        .route(
            "/api/jobs/:job_id/applications",
            get(posting_applications_handler::<A, J, E>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateApplicationRequest {
    pub(crate) job_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) status: String,
}

fn unauthorized(error: IdentityError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn bad_request(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ApplicationServiceError::Conflict | ApplicationServiceError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        ApplicationServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        ApplicationServiceError::Infrastructure(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": error.to_string(),
        "retryable": error.is_retryable(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };

    match service.list(&actor.user_id, &actor).await {
        Ok(applications) => {
            (StatusCode::OK, axum::Json(json!({ "applications": applications }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };

    match service.summary(&actor.user_id, &actor).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
    request: Result<axum::Json<CreateApplicationRequest>, JsonRejection>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return bad_request(rejection),
    };

    match service.create(&actor, &JobId(request.job_id)).await {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };

    match service.get(&ApplicationId(application_id), &actor).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn transition_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    request: Result<axum::Json<TransitionRequest>, JsonRejection>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return bad_request(rejection),
    };

    let Some(next) = ApplicationStatus::parse_lenient(&request.status) else {
        let payload = json!({
            "error": format!("unknown application status '{}'", request.status),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service
        .transition(&ApplicationId(application_id), &actor, next)
        .await
    {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn posting_applications_handler<A, J, E>(
    State(service): State<SharedService<A, J, E>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    let actor = match Actor::from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return unauthorized(error),
    };

    match service.list_for_posting(&JobId(job_id), &actor).await {
        Ok(applications) => {
            (StatusCode::OK, axum::Json(json!({ "applications": applications }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
