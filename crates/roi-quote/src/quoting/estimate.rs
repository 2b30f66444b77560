//! Role-mix estimate of what a fully staffed internal finance function would
//! cost each month.
//!
//! This is a guidance figure shown alongside the form while a business fills
//! in its internal spend. The authoritative current-setup calculation uses
//! only the user-supplied override; the two deliberately stay separate.

use super::band::parse_turnover_band;
use super::rates::RateStore;
use super::QuoteError;

pub const EMPLOYEE_ONCOST_KEY: &str = "employee_oncost_pct";
pub const INTERNAL_INEFFICIENCY_KEY: &str = "inefficiency_pct_internal";
pub const MGMT_OVERHEAD_KEY: &str = "mgmt_overhead_pct_internal";

/// Estimated monthly cost of an internal team for a turnover band, rounded
/// to pennies, or `None` when no role-mix rule covers the band.
pub fn internal_monthly_estimate<R: RateStore>(
    turnover_band: &str,
    rates: &R,
) -> Result<Option<f64>, QuoteError> {
    let range = parse_turnover_band(turnover_band);
    let Some(rule) = rates.role_mix_rule(&range)? else {
        return Ok(None);
    };

    let mut base_annual = 0.0;
    for (role, fte) in rule.allocations() {
        if fte > 0.0 {
            base_annual += fte * rates.salary(role)?;
        }
    }

    let percentage = |key: &str| -> Result<f64, QuoteError> {
        Ok(rates
            .assumption(key)?
            .map(|value| value.amount())
            .unwrap_or(0.0))
    };

    let multiplier = 1.0
        + percentage(EMPLOYEE_ONCOST_KEY)?
        + percentage(INTERNAL_INEFFICIENCY_KEY)?
        + percentage(MGMT_OVERHEAD_KEY)?;

    let monthly = base_annual * multiplier / 12.0;
    Ok(Some((monthly * 100.0).round() / 100.0))
}
