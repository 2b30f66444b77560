use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use roi_quote::config::RatesConfig;
use roi_quote::error::AppError;
use roi_quote::quoting::estimate::internal_monthly_estimate;
use roi_quote::quoting::insights::HeuristicInsightGenerator;
use roi_quote::quoting::{
    BusinessProfile, CostBreakdown, Quote, QuoteService, ReportingFrequency, ServiceCode,
    SetupMode,
};

use crate::infra::{build_rate_store, InMemoryQuoteStore};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Turnover band to estimate for, e.g. "£1M - £5M"
    #[arg(long)]
    pub(crate) turnover_band: String,
    /// Directory holding the CSV rate tables (defaults to the demo price book)
    #[arg(long)]
    pub(crate) rates_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory holding the CSV rate tables (defaults to the demo price book)
    #[arg(long)]
    pub(crate) rates_dir: Option<PathBuf>,
    /// Path to a business profile JSON file to quote instead of the sample
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    /// Print the advisor prompt the insight layer would send to a remote model
    #[arg(long)]
    pub(crate) show_prompt: bool,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let rates = build_rate_store(&RatesConfig {
        data_dir: args.rates_dir,
    })?;

    match internal_monthly_estimate(&args.turnover_band, &rates).map_err(AppError::Quote)? {
        Some(monthly) => {
            println!(
                "Estimated internal finance team cost for {}: £{monthly:.2}/month",
                args.turnover_band
            );
        }
        None => {
            println!(
                "No role-mix rule covers the turnover band {}",
                args.turnover_band
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        rates_dir,
        profile,
        show_prompt,
    } = args;

    let rates = Arc::new(build_rate_store(&RatesConfig {
        data_dir: rates_dir,
    })?);
    let quotes = Arc::new(InMemoryQuoteStore::default());
    let service = QuoteService::new(rates.clone(), quotes, Arc::new(HeuristicInsightGenerator));

    let profile = match profile {
        Some(path) => load_profile(&path)?,
        None => sample_profile(),
    };

    println!("Quote demo");
    println!(
        "Profile: {} | {} | {} staff | {} transactions/month | {} setup",
        profile.company_name,
        profile.turnover_band,
        profile.staff_count,
        profile.monthly_transactions,
        profile.setup_mode.label()
    );

    let quote = match service.submit(profile.clone()) {
        Ok(quote) => quote,
        Err(err) => {
            println!("Quote rejected: {err}");
            return Ok(());
        }
    };

    render_quote(&quote);

    if let Some(monthly) = internal_monthly_estimate(&profile.turnover_band, rates.as_ref())
        .map_err(AppError::Quote)?
    {
        println!("\nInternal team guidance figure: £{monthly:.2}/month");
    }

    if show_prompt {
        let figures = roi_quote::quoting::CostFigures {
            vendor_cost_monthly: quote.vendor_cost_monthly,
            vendor_cost_annual: quote.vendor_cost_annual,
            current_setup_cost_annual: quote.current_setup_cost_annual,
        };
        println!("\nAdvisor prompt");
        println!(
            "{}",
            roi_quote::quoting::insights::insight_prompt(&profile, &figures)
        );
    }

    Ok(())
}

fn render_quote(quote: &Quote) {
    println!("\nQuote {}", quote.id.0);
    render_breakdown(&quote.breakdown);
    println!(
        "Bundle: £{:.2}/month (£{:.2}/year)",
        quote.vendor_cost_monthly, quote.vendor_cost_annual
    );
    println!(
        "Current setup: £{:.2}/year",
        quote.current_setup_cost_annual
    );
    println!(
        "Savings: £{:.2}/month (£{:.2}/year) | efficiency index {:.1}",
        quote.savings_monthly, quote.savings_annual, quote.efficiency_index
    );

    if let Some(insights) = &quote.insights {
        println!("\nSummary");
        println!("{}", insights.summary);
        println!("\nEfficiency tips");
        for tip in &insights.tips {
            println!("- {tip}");
        }
        if let Some(extra) = &insights.extra_tips {
            println!("\nWorth checking before deciding");
            for tip in extra {
                println!("- {tip}");
            }
        }
        if let Some(advisor) = &insights.advisor_tips {
            println!("\nAdvisor notes");
            for tip in advisor {
                println!("- {tip}");
            }
        }
    }
}

fn render_breakdown(breakdown: &CostBreakdown) {
    println!("Monthly breakdown");
    println!("- Bookkeeping: £{:.2}", breakdown.bookkeeping);
    let lines = [
        ("Monthly reporting uplift", breakdown.reporting_uplift),
        ("Payroll", breakdown.payroll),
        ("VAT Returns", breakdown.vat_returns),
        ("Management Accounts", breakdown.management_accounts),
        ("Financial Analysis", breakdown.financial_analysis),
        ("Budgeting & Forecasting", breakdown.forecasting),
        ("Credit Control", breakdown.credit_control),
        ("CFO Advisory", breakdown.cfo_advisory),
    ];
    for (label, amount) in lines {
        if let Some(amount) = amount {
            println!("- {label}: £{amount:.2}");
        }
    }
}

fn load_profile(path: &PathBuf) -> Result<BusinessProfile, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse {} as a business profile: {err}", path.display()),
        ))
    })
}

fn sample_profile() -> BusinessProfile {
    BusinessProfile {
        company_name: "Brightline Joinery".to_string(),
        industry: Some("Construction".to_string()),
        turnover_band: "£1M - £5M".to_string(),
        staff_count: 8,
        monthly_transactions: 80,
        setup_mode: SetupMode::OwnerLed,
        reporting_frequency: ReportingFrequency::Monthly,
        selected_services: BTreeSet::from([
            ServiceCode::Payroll,
            ServiceCode::VatReturns,
            ServiceCode::ManagementAccounts,
        ]),
        owner_hourly_value: None,
        owner_hours_per_month: Some(20.0),
        internal_monthly_spend: None,
        external_monthly_spend: None,
    }
}
