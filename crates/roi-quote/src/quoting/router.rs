use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::BusinessProfile;
use super::estimate;
use super::insights::InsightGenerator;
use super::rates::RateStore;
use super::service::QuoteService;
use super::store::{QuoteId, QuoteStore, QuoteStoreError};
use super::QuoteError;

/// Router builder exposing HTTP endpoints for quote creation, retrieval,
/// recalculation, and the internal-team estimate.
pub fn quote_router<R, Q, I>(service: Arc<QuoteService<R, Q, I>>) -> Router
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    Router::new()
        .route("/api/v1/quotes", post(submit_handler::<R, Q, I>))
        .route("/api/v1/quotes/:quote_id", get(fetch_handler::<R, Q, I>))
        .route(
            "/api/v1/quotes/:quote_id",
            put(recalculate_handler::<R, Q, I>),
        )
        .route(
            "/api/v1/estimates/internal",
            get(estimate_handler::<R, Q, I>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, Q, I>(
    State(service): State<Arc<QuoteService<R, Q, I>>>,
    axum::Json(profile): axum::Json<BusinessProfile>,
) -> Response
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    match service.submit(profile) {
        Ok(quote) => (StatusCode::CREATED, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<R, Q, I>(
    State(service): State<Arc<QuoteService<R, Q, I>>>,
    Path(quote_id): Path<String>,
) -> Response
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    match service.get(&QuoteId(quote_id)) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recalculate_handler<R, Q, I>(
    State(service): State<Arc<QuoteService<R, Q, I>>>,
    Path(quote_id): Path<String>,
    axum::Json(profile): axum::Json<BusinessProfile>,
) -> Response
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    match service.recalculate(&QuoteId(quote_id), profile) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EstimateParams {
    pub(crate) turnover_band: String,
}

pub(crate) async fn estimate_handler<R, Q, I>(
    State(service): State<Arc<QuoteService<R, Q, I>>>,
    Query(params): Query<EstimateParams>,
) -> Response
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    match estimate::internal_monthly_estimate(&params.turnover_band, service.rates()) {
        Ok(monthly) => {
            let payload = json!({
                "turnover_band": params.turnover_band,
                "monthly_estimate": monthly,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: QuoteError) -> Response {
    let status = match &err {
        QuoteError::Validation(_) => StatusCode::BAD_REQUEST,
        QuoteError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuoteError::Store(QuoteStoreError::NotFound) => StatusCode::NOT_FOUND,
        QuoteError::Store(QuoteStoreError::Conflict) => StatusCode::CONFLICT,
        QuoteError::Rates(_) | QuoteError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
