//! Narrative insight generation for a computed quote.
//!
//! The numeric core never depends on this succeeding: generators sit behind
//! [`InsightGenerator`], their output is stored verbatim on the quote, and a
//! failure leaves the insight fields empty. A remote text-generation adapter
//! would send [`insight_prompt`] and feed the reply through
//! [`parse_insight_payload`]; the shipped [`HeuristicInsightGenerator`]
//! produces deterministic local text in the same shape.

use serde::{Deserialize, Serialize};

use super::domain::{BusinessProfile, SetupMode};

/// The computed figures an insight generator narrates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostFigures {
    pub vendor_cost_monthly: f64,
    pub vendor_cost_annual: f64,
    pub current_setup_cost_annual: f64,
}

impl CostFigures {
    pub fn savings_annual(&self) -> f64 {
        self.current_setup_cost_annual - self.vendor_cost_annual
    }

    pub fn savings_monthly(&self) -> f64 {
        self.savings_annual() / 12.0
    }

    /// True when the current setup is the cheaper option.
    pub fn current_is_cheaper(&self) -> bool {
        self.current_setup_cost_annual < self.vendor_cost_annual
    }
}

/// Narrative fields stored on a quote. `extra_tips` only appears when the
/// current setup is cheaper than the bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteInsights {
    pub summary: String,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_tips: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight generator unavailable: {0}")]
    Unavailable(String),
}

/// Pluggable narrative generation capability.
pub trait InsightGenerator: Send + Sync {
    fn generate(
        &self,
        profile: &BusinessProfile,
        figures: &CostFigures,
    ) -> Result<QuoteInsights, InsightError>;
}

/// Builds the advisor prompt a remote text-generation service would receive.
pub fn insight_prompt(profile: &BusinessProfile, figures: &CostFigures) -> String {
    let services = if profile.selected_services.is_empty() {
        "Bookkeeping only".to_string()
    } else {
        profile
            .selected_services
            .iter()
            .map(|service| service.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let savings_line = if figures.savings_annual() > 0.0 {
        format!(
            "Annual savings with the bundle: £{:.0}",
            figures.savings_annual()
        )
    } else {
        format!(
            "Additional annual cost of the bundle: £{:.0}",
            figures.savings_annual().abs()
        )
    };

    format!(
        "You are a financial advisor comparing a business's current finance \
         setup against an outsourced service bundle.\n\
         \n\
         BUSINESS PROFILE:\n\
         - Company: {company}\n\
         - Industry: {industry}\n\
         - Annual turnover: {turnover}\n\
         - Staff: {staff}\n\
         - Monthly transactions: {transactions}\n\
         - Current setup: {setup}\n\
         - Selected services: {services}\n\
         \n\
         FINANCIAL COMPARISON:\n\
         - Current annual cost: £{current:.0}\n\
         - Bundle annual cost: £{vendor:.0}\n\
         - {savings_line}\n\
         \n\
         Respond with ONLY a JSON object: {{\"summary\": two professional \
         lines, \"tips\": three actionable efficiency tips, \"extra_tips\": \
         two tips or null (only when the current setup is cheaper), \
         \"advisor_tips\": three service recommendations}}.",
        company = profile.company_name,
        industry = profile.industry.as_deref().unwrap_or("Not specified"),
        turnover = profile.turnover_band,
        staff = profile.staff_count,
        transactions = profile.monthly_transactions,
        setup = profile.setup_mode.label(),
        services = services,
        current = figures.current_setup_cost_annual,
        vendor = figures.vendor_cost_annual,
        savings_line = savings_line,
    )
}

/// Parses a generator reply, falling back to empty insights on malformed
/// JSON rather than failing the quote.
pub fn parse_insight_payload(raw: &str) -> QuoteInsights {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Deterministic generator used by the demo wiring and anywhere no remote
/// service is configured.
#[derive(Debug, Default, Clone)]
pub struct HeuristicInsightGenerator;

impl InsightGenerator for HeuristicInsightGenerator {
    fn generate(
        &self,
        profile: &BusinessProfile,
        figures: &CostFigures,
    ) -> Result<QuoteInsights, InsightError> {
        let savings = figures.savings_annual();

        let first_line = format!(
            "{} runs a {} finance setup handling {} transactions a month.",
            profile.company_name,
            profile.setup_mode.label(),
            profile.monthly_transactions
        );
        let second_line = if savings > 0.0 {
            format!(
                "Moving to the bundle would free up around £{:.0} a year at {} turnover.",
                savings, profile.turnover_band
            )
        } else {
            format!(
                "The bundle costs £{:.0} more a year, an investment in reliability and \
                 reporting quality at {} turnover.",
                savings.abs(),
                profile.turnover_band
            )
        };

        let mut tips = vec![match profile.setup_mode {
            SetupMode::OwnerLed => {
                "Track the hours you spend on finance admin and delegate the routine half first"
                    .to_string()
            }
            SetupMode::Internal => {
                "Map your team's month-end close and remove duplicated approval steps".to_string()
            }
            SetupMode::External => {
                "Agree a fixed monthly deliverables list with your provider to cap oversight time"
                    .to_string()
            }
            SetupMode::Hybrid => {
                "Draw a hard line between in-house and outsourced tasks to avoid double handling"
                    .to_string()
            }
        }];
        tips.push(format!(
            "Batch-process your {} monthly transactions weekly instead of daily",
            profile.monthly_transactions
        ));
        tips.push(match profile.industry.as_deref() {
            Some(industry) => format!(
                "Benchmark finance spend against other {industry} businesses of your size"
            ),
            None => "Benchmark finance spend against businesses of a similar size".to_string(),
        });

        let extra_tips = figures.current_is_cheaper().then(|| {
            vec![
                format!(
                    "Your {} setup looks cost-effective on paper; include owner time and \
                     error-correction costs before concluding it is",
                    profile.setup_mode.label()
                ),
                "Document your current processes so the cost advantage survives staff changes"
                    .to_string(),
            ]
        });

        let advisor_tips = vec![
            "Bundled bookkeeping keeps reporting consistent as transaction volume grows"
                .to_string(),
            format!(
                "A fixed monthly fee of £{:.0} replaces unpredictable internal costs",
                figures.vendor_cost_monthly
            ),
            format!(
                "Professional preparation reduces compliance risk for a {} staff business",
                profile.staff_count
            ),
        ];

        Ok(QuoteInsights {
            summary: format!("{first_line}\n{second_line}"),
            tips,
            extra_tips,
            advisor_tips: Some(advisor_tips),
        })
    }
}
