use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use roi_quote::config::RatesConfig;
use roi_quote::error::AppError;
use roi_quote::quoting::band::BandRange;
use roi_quote::quoting::rates::{
    AssumptionValue, FinanceRole, InMemoryRateStore, PricingRule, RoleMixRule, VolumeBand,
};
use roi_quote::quoting::tables;
use roi_quote::quoting::{Quote, QuoteId, QuoteStore, QuoteStoreError, ServiceCode};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryQuoteStore {
    records: Arc<Mutex<HashMap<QuoteId, Quote>>>,
}

impl QuoteStore for InMemoryQuoteStore {
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

/// Builds the pricing reference data the service runs against: CSV tables
/// when a data directory is configured, the built-in demo price book
/// otherwise.
pub(crate) fn build_rate_store(config: &RatesConfig) -> Result<InMemoryRateStore, AppError> {
    match &config.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading rate tables");
            Ok(tables::load_rate_store(dir)?)
        }
        None => {
            info!("no rates directory configured, using the built-in demo price book");
            Ok(demo_price_book())
        }
    }
}

/// The seven catalogue turnover bands, smallest first.
const TURNOVER_BANDS: [(f64, f64); 7] = [
    (0.0, 125_000.0),
    (125_000.0, 500_000.0),
    (500_000.0, 1_000_000.0),
    (1_000_000.0, 5_000_000.0),
    (5_000_000.0, 10_000_000.0),
    (10_000_000.0, 20_000_000.0),
    (20_000_000.0, f64::INFINITY),
];

/// Demo reference data with a rule for every service across every catalogue
/// band, so any well-formed profile prices end to end.
pub(crate) fn demo_price_book() -> InMemoryRateStore {
    let mut store = InMemoryRateStore::default()
        .with_pricing_rule(bookkeeping_rule(1, 100, 150.0))
        .with_pricing_rule(bookkeeping_rule(101, 500, 300.0))
        .with_pricing_rule(bookkeeping_rule(501, 2_000, 600.0))
        .with_pricing_rule(bookkeeping_rule(2_001, 10_000, 950.0))
        .with_pricing_rule(PricingRule {
            service: ServiceCode::Payroll,
            monthly_price: 200.0,
            volume_band: None,
            turnover_band: None,
        });

    let add_on_prices: [(ServiceCode, [f64; 7]); 6] = [
        (
            ServiceCode::VatReturns,
            [60.0, 75.0, 90.0, 120.0, 150.0, 180.0, 220.0],
        ),
        (
            ServiceCode::ManagementAccounts,
            [90.0, 110.0, 130.0, 150.0, 190.0, 230.0, 280.0],
        ),
        (
            ServiceCode::FinancialAnalysis,
            [110.0, 130.0, 150.0, 175.0, 210.0, 250.0, 300.0],
        ),
        (
            ServiceCode::Forecasting,
            [100.0, 115.0, 130.0, 140.0, 170.0, 200.0, 240.0],
        ),
        (
            ServiceCode::CreditControl,
            [80.0, 95.0, 110.0, 130.0, 160.0, 190.0, 230.0],
        ),
        (
            ServiceCode::CfoAdvisory,
            [250.0, 280.0, 320.0, 360.0, 400.0, 450.0, 520.0],
        ),
    ];
    for (service, prices) in add_on_prices {
        for ((min, max), price) in TURNOVER_BANDS.into_iter().zip(prices) {
            store = store.with_pricing_rule(PricingRule {
                service,
                monthly_price: price,
                volume_band: None,
                turnover_band: Some(BandRange::new(min, max)),
            });
        }
    }

    let owner_hourly: [(&str, f64); 7] = [
        ("owner_hourly_value_under_125k", 25.0),
        ("owner_hourly_value_125k_500k", 32.0),
        ("owner_hourly_value_500k_1m", 38.0),
        ("owner_hourly_value_1m_5m", 45.0),
        ("owner_hourly_value_5m_10m", 55.0),
        ("owner_hourly_value_10m_20m", 70.0),
        ("owner_hourly_value_over_20m", 90.0),
    ];
    for (key, amount) in owner_hourly {
        store = store.with_assumption(
            key,
            AssumptionValue::Structured {
                amount,
                description: Some("Default owner hourly value for the bracket".to_string()),
            },
        );
    }

    store = store
        .with_assumption(
            "oversight_hours_per_month_external",
            AssumptionValue::Number(8.0),
        )
        .with_assumption("inefficiency_pct_external", AssumptionValue::Number(0.05))
        .with_assumption("employee_oncost_pct", AssumptionValue::Number(0.15))
        .with_assumption("inefficiency_pct_internal", AssumptionValue::Number(0.10))
        .with_assumption("mgmt_overhead_pct_internal", AssumptionValue::Number(0.05));

    // fte per role: bookkeeper, accountant, controller, director, cfo, credit.
    let role_mixes: [[f64; 6]; 7] = [
        [0.25, 0.0, 0.0, 0.0, 0.0, 0.0],
        [0.5, 0.25, 0.0, 0.0, 0.0, 0.0],
        [1.0, 0.25, 0.1, 0.0, 0.0, 0.1],
        [1.0, 0.5, 0.25, 0.0, 0.1, 0.25],
        [1.5, 1.0, 0.5, 0.25, 0.1, 0.5],
        [2.0, 1.5, 1.0, 0.5, 0.25, 0.5],
        [3.0, 2.0, 1.0, 1.0, 0.5, 1.0],
    ];
    for ((min, max), fte) in TURNOVER_BANDS.into_iter().zip(role_mixes) {
        store = store.with_role_mix_rule(RoleMixRule {
            revenue_band: BandRange::new(min, max),
            bookkeeper_fte: fte[0],
            accountant_fte: fte[1],
            financial_controller_fte: fte[2],
            finance_director_fte: fte[3],
            cfo_fte: fte[4],
            credit_controller_fte: fte[5],
        });
    }

    store
        .with_salary(FinanceRole::Bookkeeper, 30_000.0)
        .with_salary(FinanceRole::Accountant, 40_000.0)
        .with_salary(FinanceRole::FinancialController, 60_000.0)
        .with_salary(FinanceRole::FinanceDirector, 90_000.0)
        .with_salary(FinanceRole::Cfo, 120_000.0)
        .with_salary(FinanceRole::CreditController, 28_000.0)
}

fn bookkeeping_rule(min: u32, max: u32, price: f64) -> PricingRule {
    PricingRule {
        service: ServiceCode::Bookkeeping,
        monthly_price: price,
        volume_band: Some(VolumeBand { min, max }),
        turnover_band: None,
    }
}
