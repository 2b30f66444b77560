//! The quote calculation core: turnover band parsing, rate lookups, vendor
//! bundle pricing, current-setup costing, and the comparison engine that
//! turns the two cost figures into savings and an efficiency index.

pub mod band;
pub mod comparison;
pub mod current_setup;
pub mod domain;
pub mod estimate;
pub mod insights;
pub mod rates;
pub mod router;
pub mod service;
pub mod store;
pub mod tables;
pub mod vendor;

#[cfg(test)]
mod tests;

pub use band::{parse_turnover_band, BandRange, TurnoverBracket};
pub use comparison::{compare, efficiency_index, CostComparison};
pub use domain::{
    BusinessProfile, ProfileValidationError, ReportingFrequency, ServiceCode, SetupMode,
};
pub use insights::{CostFigures, InsightError, InsightGenerator, QuoteInsights};
pub use rates::{
    AssumptionValue, FinanceRole, InMemoryRateStore, PricingRule, PricingSelector, RateStore,
    RateStoreError, RoleMixRule,
};
pub use router::quote_router;
pub use service::{QuoteComputation, QuoteService};
pub use store::{Quote, QuoteId, QuoteStore, QuoteStoreError};
pub use vendor::CostBreakdown;

use domain::SetupMode as Setup;

/// Fatal pricing configuration problems that must stop quote creation.
///
/// Everything else in the calculators degrades to a documented default; these
/// two leave the comparison meaningless and are surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no bookkeeping pricing rule covers {monthly_transactions} monthly transactions")]
    BookkeepingRuleMissing { monthly_transactions: u32 },
    #[error("hybrid setup requires a derivable internal or external cost; provide a monthly spend")]
    HybridCostUnresolvable,
    #[error("current setup cost could not be derived for the {} setup", .setup.label())]
    CurrentSetupCostUnresolved { setup: Setup },
}

/// Error raised by the quote calculation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] domain::ProfileValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Rates(#[from] rates::RateStoreError),
    #[error(transparent)]
    Store(#[from] store::QuoteStoreError),
}
