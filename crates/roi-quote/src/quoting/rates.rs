use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::band::BandRange;
use super::domain::ServiceCode;

/// Volume interval a transaction-banded pricing rule covers, inclusive on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBand {
    pub min: u32,
    pub max: u32,
}

impl VolumeBand {
    pub fn contains(&self, volume: u32) -> bool {
        self.min <= volume && volume <= self.max
    }
}

/// One priced entry in the service catalogue. A rule is banded by either
/// transaction volume or turnover, or by neither (a flat base price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub service: ServiceCode,
    pub monthly_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_band: Option<VolumeBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_band: Option<BandRange>,
}

/// Which axis a pricing lookup filters on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingSelector {
    /// Rules whose volume band contains the monthly transaction count.
    Volume(u32),
    /// Rules whose turnover band overlaps the parsed revenue interval.
    Turnover(BandRange),
    /// The unbanded base price (payroll).
    Flat,
}

/// Finance roles appearing in the role-mix and salary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FinanceRole {
    Bookkeeper,
    Accountant,
    FinancialController,
    FinanceDirector,
    Cfo,
    CreditController,
}

impl FinanceRole {
    pub const fn label(self) -> &'static str {
        match self {
            FinanceRole::Bookkeeper => "Bookkeeper",
            FinanceRole::Accountant => "Accountant",
            FinanceRole::FinancialController => "Financial Controller",
            FinanceRole::FinanceDirector => "Finance Director",
            FinanceRole::Cfo => "CFO",
            FinanceRole::CreditController => "Credit Controller",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Bookkeeper" => Some(FinanceRole::Bookkeeper),
            "Accountant" => Some(FinanceRole::Accountant),
            "Financial Controller" => Some(FinanceRole::FinancialController),
            "Finance Director" => Some(FinanceRole::FinanceDirector),
            "CFO" => Some(FinanceRole::Cfo),
            "Credit Controller" => Some(FinanceRole::CreditController),
            _ => None,
        }
    }
}

/// Fractional headcount per role for a revenue band. Feeds the internal-team
/// estimate only, never the authoritative annual cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMixRule {
    pub revenue_band: BandRange,
    pub bookkeeper_fte: f64,
    pub accountant_fte: f64,
    pub financial_controller_fte: f64,
    pub finance_director_fte: f64,
    pub cfo_fte: f64,
    pub credit_controller_fte: f64,
}

impl RoleMixRule {
    pub fn allocations(&self) -> [(FinanceRole, f64); 6] {
        [
            (FinanceRole::Bookkeeper, self.bookkeeper_fte),
            (FinanceRole::Accountant, self.accountant_fte),
            (FinanceRole::FinancialController, self.financial_controller_fte),
            (FinanceRole::FinanceDirector, self.finance_director_fte),
            (FinanceRole::Cfo, self.cfo_fte),
            (FinanceRole::CreditController, self.credit_controller_fte),
        ]
    }
}

/// A named reference value. Source data stores either a bare number or a
/// `{amount, description}` object; the shape is resolved here, once, and
/// downstream code only ever reads [`AssumptionValue::amount`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssumptionValue {
    Number(f64),
    Structured {
        amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl AssumptionValue {
    pub fn amount(&self) -> f64 {
        match self {
            AssumptionValue::Number(value) => *value,
            AssumptionValue::Structured { amount, .. } => *amount,
        }
    }
}

/// Read-only reference data contract the calculators run against. Loaded
/// fresh per calculation; nothing in the core mutates it.
pub trait RateStore: Send + Sync {
    /// The best-matching pricing rule for a service, or none. When several
    /// rules match, the one with the highest upper band bound wins.
    fn pricing_rule(
        &self,
        service: ServiceCode,
        selector: &PricingSelector,
    ) -> Result<Option<PricingRule>, RateStoreError>;

    fn assumption(&self, key: &str) -> Result<Option<AssumptionValue>, RateStoreError>;

    /// The role-mix rule whose revenue band overlaps the query, widest upper
    /// bound first.
    fn role_mix_rule(&self, band: &BandRange) -> Result<Option<RoleMixRule>, RateStoreError>;

    /// Annual salary for a role; 0 when the table has no entry.
    fn salary(&self, role: FinanceRole) -> Result<f64, RateStoreError>;
}

/// Rate store failures. These propagate as computation errors rather than
/// silently defaulting.
#[derive(Debug, thiserror::Error)]
pub enum RateStoreError {
    #[error("rate store unavailable: {0}")]
    Unavailable(String),
}

/// Reference data held in memory, seeded from CSV tables or test fixtures.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRateStore {
    pricing_rules: Vec<PricingRule>,
    assumptions: BTreeMap<String, AssumptionValue>,
    role_mix_rules: Vec<RoleMixRule>,
    salaries: BTreeMap<FinanceRole, f64>,
}

impl InMemoryRateStore {
    pub fn new(
        pricing_rules: Vec<PricingRule>,
        assumptions: BTreeMap<String, AssumptionValue>,
        role_mix_rules: Vec<RoleMixRule>,
        salaries: BTreeMap<FinanceRole, f64>,
    ) -> Self {
        Self {
            pricing_rules,
            assumptions,
            role_mix_rules,
            salaries,
        }
    }

    pub fn with_pricing_rule(mut self, rule: PricingRule) -> Self {
        self.pricing_rules.push(rule);
        self
    }

    pub fn with_assumption(mut self, key: impl Into<String>, value: AssumptionValue) -> Self {
        self.assumptions.insert(key.into(), value);
        self
    }

    pub fn with_role_mix_rule(mut self, rule: RoleMixRule) -> Self {
        self.role_mix_rules.push(rule);
        self
    }

    pub fn with_salary(mut self, role: FinanceRole, annual_salary: f64) -> Self {
        self.salaries.insert(role, annual_salary);
        self
    }
}

impl RateStore for InMemoryRateStore {
    fn pricing_rule(
        &self,
        service: ServiceCode,
        selector: &PricingSelector,
    ) -> Result<Option<PricingRule>, RateStoreError> {
        let mut candidates: Vec<&PricingRule> = self
            .pricing_rules
            .iter()
            .filter(|rule| rule.service == service)
            .filter(|rule| match selector {
                PricingSelector::Volume(volume) => rule
                    .volume_band
                    .map(|band| band.contains(*volume))
                    .unwrap_or(false),
                PricingSelector::Turnover(query) => {
                    // An unconstrained query skips band filtering entirely,
                    // mirroring the lookup contract for {0, +inf}.
                    query.is_unbounded()
                        || rule
                            .turnover_band
                            .map(|band| band.overlaps(query))
                            .unwrap_or(false)
                }
                PricingSelector::Flat => rule.volume_band.is_none() && rule.turnover_band.is_none(),
            })
            .collect();

        // Most specific wins by upper bound: descending sort, first match.
        candidates.sort_by(|a, b| {
            let upper = |rule: &PricingRule| match selector {
                PricingSelector::Volume(_) => rule
                    .volume_band
                    .map(|band| band.max as f64)
                    .unwrap_or(f64::NEG_INFINITY),
                _ => rule
                    .turnover_band
                    .map(|band| band.max)
                    .unwrap_or(f64::NEG_INFINITY),
            };
            upper(b).total_cmp(&upper(a))
        });

        Ok(candidates.first().map(|rule| (*rule).clone()))
    }

    fn assumption(&self, key: &str) -> Result<Option<AssumptionValue>, RateStoreError> {
        Ok(self.assumptions.get(key).cloned())
    }

    fn role_mix_rule(&self, band: &BandRange) -> Result<Option<RoleMixRule>, RateStoreError> {
        let mut candidates: Vec<&RoleMixRule> = self
            .role_mix_rules
            .iter()
            .filter(|rule| rule.revenue_band.overlaps(band))
            .collect();

        candidates.sort_by(|a, b| b.revenue_band.max.total_cmp(&a.revenue_band.max));

        Ok(candidates.first().map(|rule| (*rule).clone()))
    }

    fn salary(&self, role: FinanceRole) -> Result<f64, RateStoreError> {
        Ok(self.salaries.get(&role).copied().unwrap_or(0.0))
    }
}
