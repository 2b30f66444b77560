use std::collections::BTreeSet;

use crate::quoting::domain::{ReportingFrequency, ServiceCode};
use crate::quoting::rates::InMemoryRateStore;
use crate::quoting::vendor::bundle_cost;
use crate::quoting::{ConfigurationError, QuoteError};

use super::common::{base_profile, rate_store};

#[test]
fn bundle_prices_bookkeeping_uplift_payroll_and_add_ons() {
    let profile = base_profile();
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.bookkeeping, 150.0);
    assert_eq!(breakdown.reporting_uplift, Some(100.0));
    // Base 200 plus three staff beyond the five included.
    assert_eq!(breakdown.payroll, Some(230.0));
    assert_eq!(breakdown.vat_returns, Some(120.0));
    assert_eq!(breakdown.total, 600.0);
}

#[test]
fn uplift_requires_monthly_reporting() {
    let profile = base_profile();
    let profile = crate::quoting::domain::BusinessProfile {
        reporting_frequency: ReportingFrequency::Quarterly,
        ..profile
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.reporting_uplift, None);
    assert_eq!(breakdown.total, 500.0);
}

#[test]
fn uplift_requires_low_transaction_volume() {
    let profile = crate::quoting::domain::BusinessProfile {
        monthly_transactions: 150,
        ..base_profile()
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.bookkeeping, 300.0);
    assert_eq!(breakdown.reporting_uplift, None);
}

#[test]
fn payroll_prices_below_base_for_small_headcount() {
    let profile = crate::quoting::domain::BusinessProfile {
        staff_count: 3,
        ..base_profile()
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.payroll, Some(180.0));
}

#[test]
fn unselected_services_produce_no_line() {
    let profile = crate::quoting::domain::BusinessProfile {
        selected_services: BTreeSet::new(),
        ..base_profile()
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.payroll, None);
    assert_eq!(breakdown.vat_returns, None);
    assert_eq!(breakdown.total, 250.0);
}

#[test]
fn add_on_without_matching_rule_is_silently_omitted() {
    let profile = crate::quoting::domain::BusinessProfile {
        turnover_band: "£0 - £100k".to_string(),
        selected_services: BTreeSet::from([ServiceCode::ManagementAccounts]),
        ..base_profile()
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    assert_eq!(breakdown.management_accounts, None);
    // Bookkeeping plus uplift only.
    assert_eq!(breakdown.total, 250.0);
}

#[test]
fn missing_payroll_rate_drops_the_line_without_failing() {
    // Bookkeeping only: no flat payroll rule configured.
    let store = InMemoryRateStore::default().with_pricing_rule(crate::quoting::rates::PricingRule {
        service: ServiceCode::Bookkeeping,
        monthly_price: 150.0,
        volume_band: Some(crate::quoting::rates::VolumeBand { min: 1, max: 100 }),
        turnover_band: None,
    });

    let breakdown = bundle_cost(&base_profile(), &store).unwrap();
    assert_eq!(breakdown.payroll, None);
    assert_eq!(breakdown.total, 250.0);
}

#[test]
fn missing_bookkeeping_rule_is_fatal() {
    let profile = base_profile();
    let err = bundle_cost(&profile, &InMemoryRateStore::default()).unwrap_err();

    assert!(matches!(
        err,
        QuoteError::Configuration(ConfigurationError::BookkeepingRuleMissing {
            monthly_transactions: 80
        })
    ));
}

#[test]
fn breakdown_serializes_without_absent_lines() {
    let profile = crate::quoting::domain::BusinessProfile {
        selected_services: BTreeSet::new(),
        ..base_profile()
    };
    let breakdown = bundle_cost(&profile, &rate_store()).unwrap();

    let json = serde_json::to_value(&breakdown).unwrap();
    assert!(json.get("payroll").is_none());
    assert!(json.get("vat_returns").is_none());
    assert_eq!(json["bookkeeping"], 150.0);
}
