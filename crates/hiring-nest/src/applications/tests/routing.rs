use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::applications::router::{get_handler, CreateApplicationRequest};
use crate::applications::{application_router, ApplicationService};
use crate::config::StoreConfig;
use crate::identity::{Actor, ActorRole, COMPANY_ID_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::seed::{demo_recruiter, demo_seeker};
use crate::store::MemoryStore;

const SENIOR: &str = "Senior Full Stack Developer";

fn request(
    method: &str,
    uri: &str,
    actor: Option<&Actor>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(USER_ID_HEADER, actor.user_id.0.as_str());
        builder = match &actor.role {
            ActorRole::JobSeeker => builder.header(USER_ROLE_HEADER, "JOB_SEEKER"),
            ActorRole::Admin => builder.header(USER_ROLE_HEADER, "ADMIN"),
            ActorRole::Employer { company_id } => builder
                .header(USER_ROLE_HEADER, "EMPLOYER")
                .header(COMPANY_ID_HEADER, company_id.0.as_str()),
        };
    }
    let body = match body {
        Some(payload) => {
            builder = builder.header(axum::http::header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).expect("serialize"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

fn router(fixture: &Fixture) -> Router {
    application_router(fixture.service.clone())
}

async fn apply(fixture: &Fixture, actor: &Actor, title: &str) -> axum::response::Response {
    let body = json!({ "jobId": fixture.job(title).0 });
    router(fixture)
        .oneshot(request("POST", "/api/applications", Some(actor), Some(body)))
        .await
        .expect("route executes")
}

#[tokio::test]
async fn create_route_returns_created_application() {
    let fixture = build_service();
    let response = apply(&fixture, &demo_seeker(), SENIOR).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "Applied");
    assert_eq!(payload["seekerId"], demo_seeker().user_id.0);
    assert_eq!(payload["jobId"], fixture.job(SENIOR).0);
}

#[tokio::test]
async fn create_route_maps_domain_errors() {
    let fixture = build_service();
    assert_eq!(
        apply(&fixture, &demo_seeker(), SENIOR).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        apply(&fixture, &demo_seeker(), SENIOR).await.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        apply(&fixture, &demo_recruiter(), SENIOR).await.status(),
        StatusCode::FORBIDDEN
    );

    let missing = router(&fixture)
        .oneshot(request(
            "POST",
            "/api/applications",
            Some(&demo_seeker()),
            Some(json!({ "jobId": PAUSED_JOB_ID })),
        ))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let fixture = build_service();
    let body = json!({ "jobId": fixture.job(SENIOR).0 });
    let response = router(&fixture)
        .oneshot(request("POST", "/api/applications", None, Some(body)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "missing x-user-id header");
}

#[tokio::test]
async fn malformed_bodies_get_a_json_bad_request() {
    let fixture = build_service();

    let response = router(&fixture)
        .oneshot(request(
            "POST",
            "/api/applications",
            Some(&demo_seeker()),
            Some(json!({ "posting": "senior" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some_and(|error| !error.is_empty()));

    // No content type and no body.
    let response = router(&fixture)
        .oneshot(request(
            "POST",
            "/api/applications/app-000001/status",
            Some(&demo_recruiter()),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
    assert_eq!(fixture.store.application_count().expect("count"), 0);
}

#[tokio::test]
async fn status_route_enforces_the_state_machine() {
    let fixture = build_service();
    let created = read_json_body(apply(&fixture, &demo_seeker(), SENIOR).await).await;
    let id = created["id"].as_str().expect("id").to_string();
    let uri = format!("/api/applications/{id}/status");

    let transition = |actor: Actor, status: &str| {
        request("POST", &uri, Some(&actor), Some(json!({ "status": status })))
    };

    let response = router(&fixture)
        .oneshot(transition(demo_recruiter(), "shortlisted"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["status"], "Shortlisted");

    let response = router(&fixture)
        .oneshot(transition(demo_seeker(), "Offered"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router(&fixture)
        .oneshot(transition(demo_recruiter(), "Hired"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router(&fixture)
        .oneshot(transition(demo_seeker(), "Withdrawn"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(&fixture)
        .oneshot(transition(demo_recruiter(), "Interview"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["retryable"], false);
}

#[tokio::test]
async fn listing_routes_return_views_and_summary() {
    let fixture = build_service();
    apply(&fixture, &demo_seeker(), SENIOR).await;

    let response = router(&fixture)
        .oneshot(request("GET", "/api/applications", Some(&demo_seeker()), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let applications = payload["applications"].as_array().expect("array");
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["postingTitle"], SENIOR);
    assert_eq!(applications[0]["company"]["name"], "Tech Innovations Pvt Ltd");

    let response = router(&fixture)
        .oneshot(request(
            "GET",
            "/api/applications/summary",
            Some(&demo_seeker()),
            None,
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["active"], 1);

    let uri = format!("/api/jobs/{}/applications", fixture.job(SENIOR).0);
    let response = router(&fixture)
        .oneshot(request("GET", &uri, Some(&rival_recruiter()), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router(&fixture)
        .oneshot(request("GET", &uri, Some(&demo_recruiter()), None))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["applications"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn get_handler_reports_missing_applications() {
    let fixture = build_service();
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from_static("admin@hiringnest.com"));
    headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("ADMIN"));

    let response = get_handler::<MemoryStore, MemoryStore, RecordingEvents>(
        State(fixture.service.clone()),
        headers,
        Path("app-999999".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_handler_returns_service_unavailable_on_store_outage() {
    let (store, catalogue) = seeded_store();
    let service = Arc::new(ApplicationService::new(
        Arc::new(UnavailableApplications),
        store,
        Arc::new(RecordingEvents::default()),
        StoreConfig::default(),
    ));
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from_static("seeker@example.com"));
    headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("JOB_SEEKER"));

    let response = crate::applications::router::create_handler::<
        UnavailableApplications,
        MemoryStore,
        RecordingEvents,
    >(
        State(service),
        headers,
        Ok(axum::Json(CreateApplicationRequest {
            job_id: catalogue.job_id(SENIOR).expect("seeded posting").0,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["retryable"], true);
}
