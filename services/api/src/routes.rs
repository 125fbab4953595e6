use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use jobboard::board::credentials::Credentials;
use jobboard::board::router::board_router;
use jobboard::board::service::JobBoardService;
use jobboard::board::store::Storage;

pub(crate) fn with_board_routes<S, C>(service: Arc<JobBoardService<S, C>>) -> axum::Router
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    board_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use metrics_exporter_prometheus::PrometheusHandle;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::OnceLock;
    use tower::ServiceExt;

    use crate::infra::HmacCredentials;
    use jobboard::board::store::MemoryStore;
    use jobboard::config::AuthConfig;

    // `PrometheusMetricLayer::pair()` installs the process-global metrics
    // recorder, which panics on a second installation; share one handle
    // across every test in the binary.
    fn metrics_handle() -> Arc<PrometheusHandle> {
        static HANDLE: OnceLock<Arc<PrometheusHandle>> = OnceLock::new();
        HANDLE
            .get_or_init(|| {
                let (_layer, handle) = PrometheusMetricLayer::pair();
                Arc::new(handle)
            })
            .clone()
    }

    fn build_app(ready: bool) -> axum::Router {
        let readiness = Arc::new(AtomicBool::new(false));
        readiness.store(ready, Ordering::Release);
        let state = AppState {
            readiness,
            metrics: metrics_handle(),
        };

        let credentials = HmacCredentials::new(&AuthConfig {
            token_secret: "route-test-secret".to_string(),
            token_ttl_hours: 1,
        });
        let service = Arc::new(JobBoardService::new(
            Arc::new(MemoryStore::default()),
            Arc::new(credentials),
        ));

        with_board_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn healthcheck_is_always_ok() {
        let response = build_app(false)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let waiting = build_app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(waiting.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = build_app(true)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn board_routes_are_mounted() {
        let response = build_app(true)
            .oneshot(
                Request::builder()
                    .uri("/api/jobs")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
