use crate::quoting::band::BandRange;
use crate::quoting::estimate::internal_monthly_estimate;
use crate::quoting::rates::{FinanceRole, InMemoryRateStore, RateStore, RoleMixRule};

use super::common::rate_store;

fn solo_bookkeeper_mix(fte: f64) -> RoleMixRule {
    RoleMixRule {
        revenue_band: BandRange::new(0.0, 125_000.0),
        bookkeeper_fte: fte,
        accountant_fte: 0.0,
        financial_controller_fte: 0.0,
        finance_director_fte: 0.0,
        cfo_fte: 0.0,
        credit_controller_fte: 0.0,
    }
}

#[test]
fn estimates_mid_market_band_from_role_mix() {
    let monthly = internal_monthly_estimate("£1M - £5M", &rate_store()).unwrap();
    // 84,000 base salary bill, 30% loading, divided over twelve months.
    assert_eq!(monthly, Some(9_100.0));
}

#[test]
fn band_with_no_role_mix_rule_yields_no_estimate() {
    let monthly = internal_monthly_estimate("£20M+", &rate_store()).unwrap();
    assert_eq!(monthly, None);
}

#[test]
fn missing_percentage_assumptions_read_as_zero_loading() {
    let base = rate_store();
    let mid_market_mix = base
        .role_mix_rule(&BandRange::new(1_000_000.0, 5_000_000.0))
        .unwrap()
        .unwrap();

    let store = InMemoryRateStore::default()
        .with_role_mix_rule(mid_market_mix)
        .with_salary(FinanceRole::Bookkeeper, 30_000.0)
        .with_salary(FinanceRole::Accountant, 40_000.0)
        .with_salary(FinanceRole::FinancialController, 60_000.0)
        .with_salary(FinanceRole::Cfo, 120_000.0)
        .with_salary(FinanceRole::CreditController, 28_000.0);

    let monthly = internal_monthly_estimate("£1M - £5M", &store).unwrap();
    assert_eq!(monthly, Some(7_000.0));
}

#[test]
fn unsalaried_fractional_role_contributes_nothing() {
    // A mix with a staffed role missing from the salary table falls back to
    // a zero salary rather than failing.
    let store = InMemoryRateStore::default().with_role_mix_rule(solo_bookkeeper_mix(1.0));

    let monthly = internal_monthly_estimate("£0 - £125k", &store).unwrap();
    assert_eq!(monthly, Some(0.0));
}

#[test]
fn estimate_rounds_to_pennies() {
    let store = InMemoryRateStore::default()
        .with_role_mix_rule(solo_bookkeeper_mix(1.0))
        .with_salary(FinanceRole::Bookkeeper, 29_999.0);

    let monthly = internal_monthly_estimate("£0 - £125k", &store).unwrap();
    // 29,999 / 12 = 2,499.9166...
    assert_eq!(monthly, Some(2_499.92));
}
