use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use roi_quote::quoting::insights::InsightGenerator;
use roi_quote::quoting::rates::RateStore;
use roi_quote::quoting::{quote_router, QuoteService, QuoteStore};

use crate::infra::AppState;

pub(crate) fn with_quote_routes<R, Q, I>(service: Arc<QuoteService<R, Q, I>>) -> axum::Router
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    quote_router(service)
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
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use roi_quote::quoting::insights::HeuristicInsightGenerator;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    use crate::infra::{demo_price_book, InMemoryQuoteStore};

    fn build_app(ready: bool) -> axum::Router {
        // The Prometheus recorder is process-global; install it once and
        // share the handle across tests.
        static METRICS: std::sync::OnceLock<
            Arc<metrics_exporter_prometheus::PrometheusHandle>,
        > = std::sync::OnceLock::new();
        let handle = METRICS
            .get_or_init(|| Arc::new(PrometheusMetricLayer::pair().1))
            .clone();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: handle,
        };
        let service = Arc::new(QuoteService::new(
            Arc::new(demo_price_book()),
            Arc::new(InMemoryQuoteStore::default()),
            Arc::new(HeuristicInsightGenerator),
        ));
        with_quote_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = build_app(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let response = build_app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn quote_routes_are_mounted() {
        let response = build_app(true)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/estimates/internal?turnover_band=%C2%A31M%20-%20%C2%A35M")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload["monthly_estimate"].is_number());
    }
}
