use tracing::warn;

use super::band::{parse_turnover_band, TurnoverBracket};
use super::domain::{BusinessProfile, SetupMode};
use super::rates::RateStore;
use super::{ConfigurationError, QuoteError};

/// Assumption key for the hours an owner spends overseeing an external
/// provider each month.
pub const OVERSIGHT_HOURS_KEY: &str = "oversight_hours_per_month_external";
/// Assumption key for the external provider inefficiency percentage.
pub const INEFFICIENCY_PCT_KEY: &str = "inefficiency_pct_external";

pub const DEFAULT_OVERSIGHT_HOURS: f64 = 8.0;
pub const DEFAULT_INEFFICIENCY_PCT: f64 = 0.05;

/// Blend weights for a hybrid setup with both cost sides available. Fixed,
/// not user-configurable.
pub const HYBRID_INTERNAL_WEIGHT: f64 = 0.4;
pub const HYBRID_EXTERNAL_WEIGHT: f64 = 0.6;

/// Annualized cost of the business's existing arrangement. Dispatches on the
/// setup mode; each branch is independently callable for testing.
pub fn annual_cost<R: RateStore>(
    profile: &BusinessProfile,
    rates: &R,
) -> Result<f64, QuoteError> {
    match profile.setup_mode {
        SetupMode::OwnerLed => owner_led_annual(profile, rates),
        SetupMode::Internal => Ok(internal_annual(profile)),
        SetupMode::External => external_annual(profile, rates),
        SetupMode::Hybrid => hybrid_annual(profile, rates),
    }
}

/// Owner-led: hourly value times hours per month, annualized. The profile's
/// override wins when present and nonzero; otherwise the default for the
/// business's turnover bracket is read from the assumptions. A missing
/// assumption is a safe zero, not an error.
pub fn owner_led_annual<R: RateStore>(
    profile: &BusinessProfile,
    rates: &R,
) -> Result<f64, QuoteError> {
    let hours = profile.owner_hours_per_month.unwrap_or(0.0);

    let hourly_value = match profile.owner_hourly_value.filter(|value| *value > 0.0) {
        Some(value) => value,
        None => {
            let range = parse_turnover_band(&profile.turnover_band);
            let key = TurnoverBracket::for_range(range).assumption_key();
            match rates.assumption(key)? {
                Some(value) => value.amount(),
                None => {
                    warn!(key, "owner hourly value assumption missing, defaulting cost to zero");
                    return Ok(0.0);
                }
            }
        }
    };

    Ok(hourly_value * hours * 12.0)
}

/// Internal team: the user-supplied monthly spend annualized, or zero when
/// none was given. The role-mix derivation stays a display-only estimate and
/// deliberately does not back-fill this figure.
pub fn internal_annual(profile: &BusinessProfile) -> f64 {
    profile
        .internal_monthly_spend
        .filter(|spend| *spend > 0.0)
        .map(|spend| spend * 12.0)
        .unwrap_or(0.0)
}

/// External provider: the provider fee plus the hidden costs of outsourcing,
/// owner oversight time and provider inefficiency.
pub fn external_annual<R: RateStore>(
    profile: &BusinessProfile,
    rates: &R,
) -> Result<f64, QuoteError> {
    let Some(monthly_spend) = profile.external_monthly_spend.filter(|spend| *spend > 0.0) else {
        return Ok(0.0);
    };

    let provider_fee = monthly_spend * 12.0;

    let oversight_hours = rates
        .assumption(OVERSIGHT_HOURS_KEY)?
        .map(|value| value.amount())
        .unwrap_or(DEFAULT_OVERSIGHT_HOURS);
    let inefficiency_pct = rates
        .assumption(INEFFICIENCY_PCT_KEY)?
        .map(|value| value.amount())
        .unwrap_or(DEFAULT_INEFFICIENCY_PCT);

    let oversight_value = oversight_hours * profile.owner_hourly_value.unwrap_or(0.0) * 12.0;
    let inefficiency_cost = inefficiency_pct * provider_fee;

    Ok(provider_fee + oversight_value + inefficiency_cost)
}

/// Hybrid: both sides computed independently, then blended 40/60. A single
/// valid side carries full weight; neither side resolvable is a
/// configuration error, since a zero-cost current setup would make every
/// downstream comparison meaningless.
pub fn hybrid_annual<R: RateStore>(
    profile: &BusinessProfile,
    rates: &R,
) -> Result<f64, QuoteError> {
    let internal = internal_annual(profile);
    let external = external_annual(profile, rates)?;

    match (internal > 0.0, external > 0.0) {
        (false, false) => Err(ConfigurationError::HybridCostUnresolvable.into()),
        (true, false) => Ok(internal),
        (false, true) => Ok(external),
        (true, true) => {
            Ok(internal * HYBRID_INTERNAL_WEIGHT + external * HYBRID_EXTERNAL_WEIGHT)
        }
    }
}
