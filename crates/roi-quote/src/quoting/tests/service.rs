use std::sync::Arc;

use crate::quoting::domain::BusinessProfile;
use crate::quoting::insights::HeuristicInsightGenerator;
use crate::quoting::service::QuoteService;
use crate::quoting::store::{QuoteId, QuoteStoreError};
use crate::quoting::{ConfigurationError, QuoteError};

use super::common::{
    base_profile, build_service, external_profile, internal_profile, rate_store, FailingInsights,
    MemoryQuoteStore, UnavailableRateStore,
};

#[test]
fn calculate_runs_the_full_pipeline() {
    let (service, _) = build_service();

    let computation = service.calculate(&base_profile()).unwrap();

    assert_eq!(computation.vendor_cost_monthly, 600.0);
    assert_eq!(computation.vendor_cost_annual, 7_200.0);
    assert_eq!(computation.current_setup_cost_annual, 10_800.0);
    assert_eq!(computation.comparison.savings_annual, 3_600.0);
    assert_eq!(computation.breakdown.bookkeeping, 150.0);
}

#[test]
fn calculate_is_deterministic_for_an_unchanged_profile() {
    let (service, _) = build_service();
    let profile = base_profile();

    let first = service.calculate(&profile).unwrap();
    let second = service.calculate(&profile).unwrap();
    assert_eq!(first, second);
}

#[test]
fn calculate_rejects_invalid_profiles() {
    let (service, _) = build_service();
    let profile = BusinessProfile {
        company_name: "  ".to_string(),
        ..base_profile()
    };

    let err = service.calculate(&profile).unwrap_err();
    assert!(matches!(err, QuoteError::Validation(_)));
}

#[test]
fn calculate_propagates_rate_store_failures() {
    let service = QuoteService::new(
        Arc::new(UnavailableRateStore),
        Arc::new(MemoryQuoteStore::default()),
        Arc::new(HeuristicInsightGenerator),
    );

    let err = service.calculate(&base_profile()).unwrap_err();
    assert!(matches!(err, QuoteError::Rates(_)));
}

#[test]
fn submit_persists_a_fully_populated_quote() {
    let (service, quotes) = build_service();

    let quote = service.submit(base_profile()).unwrap();

    assert!(quote.id.0.starts_with("quote-"));
    assert_eq!(quote.vendor_cost_monthly, 600.0);
    assert_eq!(quote.savings_monthly, 300.0);
    assert!(quote.insights.is_some());
    assert_eq!(quote.created_at, quote.updated_at);

    let stored = quotes.records.lock().unwrap();
    assert_eq!(stored.get(&quote.id), Some(&quote));
}

#[test]
fn submitted_quotes_get_distinct_ids() {
    let (service, _) = build_service();

    let first = service.submit(base_profile()).unwrap();
    let second = service.submit(base_profile()).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn submit_refuses_an_unresolved_current_setup_cost() {
    let (service, quotes) = build_service();
    // No owner hourly assumption exists for this band, so the current cost
    // resolves to zero.
    let profile = BusinessProfile {
        turnover_band: "£500k - £1M".to_string(),
        ..base_profile()
    };

    let err = service.submit(profile).unwrap_err();
    assert!(matches!(
        err,
        QuoteError::Configuration(ConfigurationError::CurrentSetupCostUnresolved { .. })
    ));
    assert!(quotes.records.lock().unwrap().is_empty());
}

#[test]
fn insight_failure_does_not_block_persistence() {
    let service = QuoteService::new(
        Arc::new(rate_store()),
        Arc::new(MemoryQuoteStore::default()),
        Arc::new(FailingInsights),
    );

    let quote = service.submit(base_profile()).unwrap();
    assert!(quote.insights.is_none());
    assert_eq!(quote.vendor_cost_monthly, 600.0);
}

#[test]
fn recalculate_replaces_every_computed_field() {
    let (service, _) = build_service();

    let original = service.submit(base_profile()).unwrap();
    let updated = service
        .recalculate(&original.id, internal_profile())
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
    assert_eq!(updated.current_setup_cost_annual, 12_000.0);
    assert_eq!(updated.savings_annual, 4_800.0);

    let fetched = service.get(&original.id).unwrap();
    assert_eq!(fetched, updated);
}

#[test]
fn recalculate_requires_an_existing_quote() {
    let (service, _) = build_service();

    let err = service
        .recalculate(&QuoteId("quote-999999".to_string()), external_profile())
        .unwrap_err();
    assert!(matches!(err, QuoteError::Store(QuoteStoreError::NotFound)));
}

#[test]
fn get_reports_missing_quotes_as_not_found() {
    let (service, _) = build_service();

    let err = service.get(&QuoteId("quote-999999".to_string())).unwrap_err();
    assert!(matches!(err, QuoteError::Store(QuoteStoreError::NotFound)));
}
