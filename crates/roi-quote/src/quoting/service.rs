use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::comparison::{self, CostComparison};
use super::current_setup;
use super::domain::BusinessProfile;
use super::insights::{CostFigures, InsightGenerator, QuoteInsights};
use super::rates::RateStore;
use super::store::{Quote, QuoteId, QuoteStore, QuoteStoreError};
use super::vendor::{self, CostBreakdown};
use super::{ConfigurationError, QuoteError};

/// Service composing the rate store, quote store, and insight generator into
/// the full quote pipeline.
pub struct QuoteService<R, Q, I> {
    rates: Arc<R>,
    quotes: Arc<Q>,
    insights: Arc<I>,
}

static QUOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_quote_id() -> QuoteId {
    let id = QUOTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuoteId(format!("quote-{id:06}"))
}

/// The pure numeric result of one calculation, before persistence and
/// narrative. Recomputing from an unchanged profile and unchanged reference
/// data yields bit-identical figures.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteComputation {
    pub vendor_cost_monthly: f64,
    pub vendor_cost_annual: f64,
    pub current_setup_cost_annual: f64,
    pub comparison: CostComparison,
    pub breakdown: CostBreakdown,
}

impl<R, Q, I> QuoteService<R, Q, I>
where
    R: RateStore + 'static,
    Q: QuoteStore + 'static,
    I: InsightGenerator + 'static,
{
    pub fn new(rates: Arc<R>, quotes: Arc<Q>, insights: Arc<I>) -> Self {
        Self {
            rates,
            quotes,
            insights,
        }
    }

    pub fn rates(&self) -> &R {
        self.rates.as_ref()
    }

    /// Runs the calculation pipeline without touching storage: validation,
    /// vendor bundle pricing, current-setup costing, comparison.
    pub fn calculate(&self, profile: &BusinessProfile) -> Result<QuoteComputation, QuoteError> {
        profile.validate()?;

        let breakdown = vendor::bundle_cost(profile, self.rates.as_ref())?;
        let vendor_cost_monthly = breakdown.total;
        let vendor_cost_annual = vendor_cost_monthly * 12.0;

        let current_setup_cost_annual = current_setup::annual_cost(profile, self.rates.as_ref())?;

        let comparison = comparison::compare(vendor_cost_annual, current_setup_cost_annual);

        Ok(QuoteComputation {
            vendor_cost_monthly,
            vendor_cost_annual,
            current_setup_cost_annual,
            comparison,
            breakdown,
        })
    }

    /// Calculates and persists a new quote for a profile submission.
    ///
    /// A current-setup cost that resolves to zero stops persistence: a quote
    /// built on it would compare against nothing.
    pub fn submit(&self, profile: BusinessProfile) -> Result<Quote, QuoteError> {
        let computation = self.calculate(&profile)?;
        self.guard_current_cost(&profile, &computation)?;

        let insights = self.generate_insights(&profile, &computation);
        let now = Utc::now();
        let quote = build_quote(next_quote_id(), profile, computation, insights, now, now);

        let stored = self.quotes.create(quote)?;
        Ok(stored)
    }

    /// Recomputes an existing quote from an edited profile, replacing every
    /// computed field. No partial merge: old and new pricing assumptions
    /// never mix in one record.
    pub fn recalculate(&self, id: &QuoteId, profile: BusinessProfile) -> Result<Quote, QuoteError> {
        let existing = self
            .quotes
            .fetch(id)?
            .ok_or(QuoteStoreError::NotFound)?;

        let computation = self.calculate(&profile)?;
        self.guard_current_cost(&profile, &computation)?;

        let insights = self.generate_insights(&profile, &computation);
        let quote = build_quote(
            existing.id.clone(),
            profile,
            computation,
            insights,
            existing.created_at,
            Utc::now(),
        );

        self.quotes.update(quote.clone())?;
        Ok(quote)
    }

    pub fn get(&self, id: &QuoteId) -> Result<Quote, QuoteError> {
        let quote = self
            .quotes
            .fetch(id)?
            .ok_or(QuoteStoreError::NotFound)?;
        Ok(quote)
    }

    fn guard_current_cost(
        &self,
        profile: &BusinessProfile,
        computation: &QuoteComputation,
    ) -> Result<(), QuoteError> {
        if computation.current_setup_cost_annual <= 0.0 {
            return Err(ConfigurationError::CurrentSetupCostUnresolved {
                setup: profile.setup_mode,
            }
            .into());
        }
        Ok(())
    }

    /// Best effort: a generator failure is logged and the quote stores no
    /// narrative.
    fn generate_insights(
        &self,
        profile: &BusinessProfile,
        computation: &QuoteComputation,
    ) -> Option<QuoteInsights> {
        let figures = CostFigures {
            vendor_cost_monthly: computation.vendor_cost_monthly,
            vendor_cost_annual: computation.vendor_cost_annual,
            current_setup_cost_annual: computation.current_setup_cost_annual,
        };

        match self.insights.generate(profile, &figures) {
            Ok(insights) => Some(insights),
            Err(err) => {
                warn!(error = %err, "insight generation failed, storing quote without narrative");
                None
            }
        }
    }
}

fn build_quote(
    id: QuoteId,
    profile: BusinessProfile,
    computation: QuoteComputation,
    insights: Option<QuoteInsights>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Quote {
    Quote {
        id,
        profile,
        vendor_cost_monthly: computation.vendor_cost_monthly,
        vendor_cost_annual: computation.vendor_cost_annual,
        current_setup_cost_annual: computation.current_setup_cost_annual,
        savings_monthly: computation.comparison.savings_monthly,
        savings_annual: computation.comparison.savings_annual,
        efficiency_index: computation.comparison.efficiency_index,
        breakdown: computation.breakdown,
        insights,
        created_at,
        updated_at,
    }
}
