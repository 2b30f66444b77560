use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::quoting::band::BandRange;
use crate::quoting::domain::{
    BusinessProfile, ReportingFrequency, ServiceCode, SetupMode,
};
use crate::quoting::insights::{
    CostFigures, HeuristicInsightGenerator, InsightError, InsightGenerator, QuoteInsights,
};
use crate::quoting::rates::{
    AssumptionValue, FinanceRole, InMemoryRateStore, PricingRule, PricingSelector, RateStore,
    RateStoreError, RoleMixRule, VolumeBand,
};
use crate::quoting::service::QuoteService;
use crate::quoting::store::{Quote, QuoteId, QuoteStore, QuoteStoreError};

fn volume_rule(service: ServiceCode, min: u32, max: u32, price: f64) -> PricingRule {
    PricingRule {
        service,
        monthly_price: price,
        volume_band: Some(VolumeBand { min, max }),
        turnover_band: None,
    }
}

fn turnover_rule(service: ServiceCode, min: f64, max: f64, price: f64) -> PricingRule {
    PricingRule {
        service,
        monthly_price: price,
        volume_band: None,
        turnover_band: Some(BandRange::new(min, max)),
    }
}

fn flat_rule(service: ServiceCode, price: f64) -> PricingRule {
    PricingRule {
        service,
        monthly_price: price,
        volume_band: None,
        turnover_band: None,
    }
}

/// The price book the scenarios below assume. Bookkeeping is banded by
/// transaction volume, payroll is flat, add-ons are banded by turnover.
pub(super) fn rate_store() -> InMemoryRateStore {
    InMemoryRateStore::default()
        .with_pricing_rule(volume_rule(ServiceCode::Bookkeeping, 1, 100, 150.0))
        .with_pricing_rule(volume_rule(ServiceCode::Bookkeeping, 101, 500, 300.0))
        .with_pricing_rule(volume_rule(ServiceCode::Bookkeeping, 501, 2000, 600.0))
        .with_pricing_rule(flat_rule(ServiceCode::Payroll, 200.0))
        .with_pricing_rule(turnover_rule(ServiceCode::VatReturns, 0.0, 125_000.0, 60.0))
        .with_pricing_rule(turnover_rule(
            ServiceCode::VatReturns,
            125_000.0,
            1_000_000.0,
            90.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::VatReturns,
            1_000_000.0,
            5_000_000.0,
            120.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::ManagementAccounts,
            1_000_000.0,
            5_000_000.0,
            150.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::FinancialAnalysis,
            1_000_000.0,
            5_000_000.0,
            175.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::Forecasting,
            1_000_000.0,
            5_000_000.0,
            140.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::CreditControl,
            1_000_000.0,
            5_000_000.0,
            130.0,
        ))
        .with_pricing_rule(turnover_rule(
            ServiceCode::CfoAdvisory,
            5_000_000.0,
            f64::INFINITY,
            400.0,
        ))
        .with_assumption("owner_hourly_value_under_125k", AssumptionValue::Number(25.0))
        .with_assumption(
            "owner_hourly_value_1m_5m",
            AssumptionValue::Structured {
                amount: 45.0,
                description: Some("Mid-market owner hourly value".to_string()),
            },
        )
        .with_assumption(
            "oversight_hours_per_month_external",
            AssumptionValue::Number(8.0),
        )
        .with_assumption("inefficiency_pct_external", AssumptionValue::Number(0.05))
        .with_assumption("employee_oncost_pct", AssumptionValue::Number(0.15))
        .with_assumption("inefficiency_pct_internal", AssumptionValue::Number(0.10))
        .with_assumption("mgmt_overhead_pct_internal", AssumptionValue::Number(0.05))
        .with_role_mix_rule(RoleMixRule {
            revenue_band: BandRange::new(1_000_000.0, 5_000_000.0),
            bookkeeper_fte: 1.0,
            accountant_fte: 0.5,
            financial_controller_fte: 0.25,
            finance_director_fte: 0.0,
            cfo_fte: 0.1,
            credit_controller_fte: 0.25,
        })
        .with_salary(FinanceRole::Bookkeeper, 30_000.0)
        .with_salary(FinanceRole::Accountant, 40_000.0)
        .with_salary(FinanceRole::FinancialController, 60_000.0)
        .with_salary(FinanceRole::FinanceDirector, 90_000.0)
        .with_salary(FinanceRole::Cfo, 120_000.0)
        .with_salary(FinanceRole::CreditController, 28_000.0)
}

pub(super) fn base_profile() -> BusinessProfile {
    BusinessProfile {
        company_name: "Brightline Joinery".to_string(),
        industry: Some("Construction".to_string()),
        turnover_band: "£1M - £5M".to_string(),
        staff_count: 8,
        monthly_transactions: 80,
        setup_mode: SetupMode::OwnerLed,
        reporting_frequency: ReportingFrequency::Monthly,
        selected_services: BTreeSet::from([ServiceCode::Payroll, ServiceCode::VatReturns]),
        owner_hourly_value: None,
        owner_hours_per_month: Some(20.0),
        internal_monthly_spend: None,
        external_monthly_spend: None,
    }
}

pub(super) fn internal_profile() -> BusinessProfile {
    BusinessProfile {
        setup_mode: SetupMode::Internal,
        owner_hours_per_month: None,
        internal_monthly_spend: Some(1_000.0),
        ..base_profile()
    }
}

pub(super) fn external_profile() -> BusinessProfile {
    BusinessProfile {
        setup_mode: SetupMode::External,
        owner_hours_per_month: None,
        owner_hourly_value: Some(50.0),
        external_monthly_spend: Some(2_000.0),
        ..base_profile()
    }
}

pub(super) fn hybrid_profile() -> BusinessProfile {
    BusinessProfile {
        setup_mode: SetupMode::Hybrid,
        owner_hours_per_month: None,
        owner_hourly_value: Some(50.0),
        internal_monthly_spend: Some(1_000.0),
        external_monthly_spend: Some(2_000.0),
        ..base_profile()
    }
}

pub(super) fn build_service() -> (
    QuoteService<InMemoryRateStore, MemoryQuoteStore, HeuristicInsightGenerator>,
    Arc<MemoryQuoteStore>,
) {
    let quotes = Arc::new(MemoryQuoteStore::default());
    let service = QuoteService::new(
        Arc::new(rate_store()),
        quotes.clone(),
        Arc::new(HeuristicInsightGenerator),
    );
    (service, quotes)
}

#[derive(Default, Clone)]
pub(super) struct MemoryQuoteStore {
    pub(super) records: Arc<Mutex<HashMap<QuoteId, Quote>>>,
}

impl QuoteStore for MemoryQuoteStore {
    fn create(&self, quote: Quote) -> Result<Quote, QuoteStoreError> {
        let mut guard = self.records.lock().expect("quote store mutex poisoned");
        if guard.contains_key(&quote.id) {
            return Err(QuoteStoreError::Conflict);
        }
        guard.insert(quote.id.clone(), quote.clone());
        Ok(quote)
    }

    fn update(&self, quote: Quote) -> Result<(), QuoteStoreError> {
        let mut guard = self.records.lock().expect("quote store mutex poisoned");
        if guard.contains_key(&quote.id) {
            guard.insert(quote.id.clone(), quote);
            Ok(())
        } else {
            Err(QuoteStoreError::NotFound)
        }
    }

    fn fetch(&self, id: &QuoteId) -> Result<Option<Quote>, QuoteStoreError> {
        let guard = self.records.lock().expect("quote store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Rate store whose every lookup fails, for error propagation scenarios.
pub(super) struct UnavailableRateStore;

impl RateStore for UnavailableRateStore {
    fn pricing_rule(
        &self,
        _service: ServiceCode,
        _selector: &PricingSelector,
    ) -> Result<Option<PricingRule>, RateStoreError> {
        Err(RateStoreError::Unavailable("rates offline".to_string()))
    }

    fn assumption(&self, _key: &str) -> Result<Option<AssumptionValue>, RateStoreError> {
        Err(RateStoreError::Unavailable("rates offline".to_string()))
    }

    fn role_mix_rule(&self, _band: &BandRange) -> Result<Option<RoleMixRule>, RateStoreError> {
        Err(RateStoreError::Unavailable("rates offline".to_string()))
    }

    fn salary(&self, _role: FinanceRole) -> Result<f64, RateStoreError> {
        Err(RateStoreError::Unavailable("rates offline".to_string()))
    }
}

/// Insight generator that always fails, for best-effort scenarios.
pub(super) struct FailingInsights;

impl InsightGenerator for FailingInsights {
    fn generate(
        &self,
        _profile: &BusinessProfile,
        _figures: &CostFigures,
    ) -> Result<QuoteInsights, InsightError> {
        Err(InsightError::Unavailable("model offline".to_string()))
    }
}
