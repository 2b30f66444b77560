use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use roi_quote::config::AppConfig;
use roi_quote::error::AppError;
use roi_quote::quoting::insights::HeuristicInsightGenerator;
use roi_quote::quoting::QuoteService;
use roi_quote::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{build_rate_store, AppState, InMemoryQuoteStore};
use crate::routes::with_quote_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let rates = Arc::new(build_rate_store(&config.rates)?);
    let quotes = Arc::new(InMemoryQuoteStore::default());
    let quote_service = Arc::new(QuoteService::new(
        rates,
        quotes,
        Arc::new(HeuristicInsightGenerator),
    ));

    let app = with_quote_routes(quote_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quote service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
