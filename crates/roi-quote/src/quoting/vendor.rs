use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::band::parse_turnover_band;
use super::domain::{BusinessProfile, ReportingFrequency, ServiceCode};
use super::rates::{PricingSelector, RateStore};
use super::{ConfigurationError, QuoteError};

/// Surcharge applied when monthly reporting is requested at low transaction
/// volume.
pub const MONTHLY_REPORTING_UPLIFT: f64 = 100.0;
/// Transaction count at or below which the reporting uplift applies.
pub const LOW_VOLUME_THRESHOLD: u32 = 100;
/// Headcount included in the payroll base price.
pub const PAYROLL_INCLUDED_STAFF: u32 = 5;
/// Per-head payroll surcharge beyond the included headcount. Unfloored, so
/// fewer than five staff prices below the quoted base.
pub const PAYROLL_PER_HEAD: f64 = 10.0;

/// Itemized monthly cost of the vendor bundle. A `None` line item means the
/// service was not selected or had no applicable rate, which is distinct
/// from a zero cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: f64,
    pub bookkeeping: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_uplift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_returns: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_accounts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_analysis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecasting: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_control: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfo_advisory: Option<f64>,
}

impl CostBreakdown {
    fn new(bookkeeping: f64) -> Self {
        Self {
            total: 0.0,
            bookkeeping,
            reporting_uplift: None,
            payroll: None,
            vat_returns: None,
            management_accounts: None,
            financial_analysis: None,
            forecasting: None,
            credit_control: None,
            cfo_advisory: None,
        }
    }

    fn set_add_on(&mut self, service: ServiceCode, monthly_price: f64) {
        let slot = match service {
            ServiceCode::VatReturns => &mut self.vat_returns,
            ServiceCode::ManagementAccounts => &mut self.management_accounts,
            ServiceCode::FinancialAnalysis => &mut self.financial_analysis,
            ServiceCode::Forecasting => &mut self.forecasting,
            ServiceCode::CreditControl => &mut self.credit_control,
            ServiceCode::CfoAdvisory => &mut self.cfo_advisory,
            ServiceCode::Bookkeeping | ServiceCode::Payroll => return,
        };
        *slot = Some(monthly_price);
    }

    fn line_total(&self) -> f64 {
        self.bookkeeping
            + [
                self.reporting_uplift,
                self.payroll,
                self.vat_returns,
                self.management_accounts,
                self.financial_analysis,
                self.forecasting,
                self.credit_control,
                self.cfo_advisory,
            ]
            .iter()
            .flatten()
            .sum::<f64>()
    }
}

/// Computes the monthly cost of the vendor bundle for a profile.
///
/// Bookkeeping is the bundle floor: a missing bookkeeping rule is the only
/// fatal line item. Everything else degrades to an absent line.
pub fn bundle_cost<R: RateStore>(
    profile: &BusinessProfile,
    rates: &R,
) -> Result<CostBreakdown, QuoteError> {
    let bookkeeping = rates
        .pricing_rule(
            ServiceCode::Bookkeeping,
            &PricingSelector::Volume(profile.monthly_transactions),
        )?
        .ok_or(ConfigurationError::BookkeepingRuleMissing {
            monthly_transactions: profile.monthly_transactions,
        })?;

    let mut breakdown = CostBreakdown::new(bookkeeping.monthly_price);

    if profile.reporting_frequency == ReportingFrequency::Monthly
        && profile.monthly_transactions <= LOW_VOLUME_THRESHOLD
    {
        breakdown.reporting_uplift = Some(MONTHLY_REPORTING_UPLIFT);
    }

    if profile.selected_services.contains(&ServiceCode::Payroll) {
        match rates.pricing_rule(ServiceCode::Payroll, &PricingSelector::Flat)? {
            Some(rule) => {
                let additional = profile.staff_count as f64 - PAYROLL_INCLUDED_STAFF as f64;
                breakdown.payroll = Some(rule.monthly_price + additional * PAYROLL_PER_HEAD);
            }
            None => {
                warn!("no payroll base rate configured, omitting payroll line");
            }
        }
    }

    let turnover = parse_turnover_band(&profile.turnover_band);
    for service in ServiceCode::ADD_ONS {
        if !profile.selected_services.contains(&service) {
            continue;
        }
        match rates.pricing_rule(service, &PricingSelector::Turnover(turnover))? {
            Some(rule) => breakdown.set_add_on(service, rule.monthly_price),
            None => {
                debug!(
                    service = service.code(),
                    "no pricing rule for selected add-on, omitting line"
                );
            }
        }
    }

    breakdown.total = breakdown.line_total();
    Ok(breakdown)
}
