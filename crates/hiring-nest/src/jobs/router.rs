use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::query::SearchParams;
use super::repository::JobRepository;
use super::service::{JobSearchError, JobSearchService};

/// Router exposing the public job search endpoint.
pub fn job_router<J>(service: Arc<JobSearchService<J>>) -> Router
where
    J: JobRepository + 'static,
{
    Router::new()
        .route("/api/jobs", get(search_handler::<J>))
        .with_state(service)
}

pub(crate) async fn search_handler<J>(
    State(service): State<Arc<JobSearchService<J>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    J: JobRepository + 'static,
{
    let params = SearchParams::from_pairs(pairs);
    match service.search(&params).await {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(JobSearchError::Infrastructure(error)) => {
            let payload = json!({
                "error": "failed to fetch jobs",
                "retryable": error.is_transient(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SearchConfig, StoreConfig};
    use crate::seed;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let store = Arc::new(MemoryStore::default());
        seed::seed_store(&store, Utc::now()).expect("seed succeeds");
        job_router(Arc::new(JobSearchService::new(
            store,
            SearchConfig::default(),
            StoreConfig::default(),
        )))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn search_route_filters_seed_catalogue() {
        let (status, payload) = get_json(
            router(),
            "/api/jobs?search=Developer&location=Bangalore&jobType=FULL_TIME&page=1&limit=20",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let jobs = payload["jobs"].as_array().expect("jobs array");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["title"], "Senior Full Stack Developer");
        assert_eq!(jobs[0]["company"]["slug"], "tech-innovations");
        assert_eq!(
            payload["pagination"],
            serde_json::json!({ "page": 1, "limit": 20, "total": 1, "pages": 1 })
        );
    }

    #[tokio::test]
    async fn malformed_query_values_degrade_instead_of_failing() {
        let (status, payload) =
            get_json(router(), "/api/jobs?page=abc&limit=-5&jobType=ASTRONAUT").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["jobs"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["pagination"]["page"], 1);
        assert_eq!(payload["pagination"]["limit"], 20);
        assert_eq!(payload["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn repeated_query_keys_use_the_first_value() {
        let (status, payload) = get_json(
            router(),
            "/api/jobs?page=abc&page=2&jobType=FULL_TIME&jobType=CONTRACT",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["pagination"]["page"], 1);
        assert_eq!(payload["pagination"]["total"], 3);
        assert_eq!(payload["jobs"].as_array().map(Vec::len), Some(3));
    }
}
