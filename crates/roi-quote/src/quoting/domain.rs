use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How the business currently runs its finance function. Selected once per
/// calculation; the current-setup calculator dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupMode {
    OwnerLed,
    Internal,
    External,
    Hybrid,
}

impl SetupMode {
    pub const fn label(self) -> &'static str {
        match self {
            SetupMode::OwnerLed => "owner-led",
            SetupMode::Internal => "internal team",
            SetupMode::External => "external provider",
            SetupMode::Hybrid => "hybrid",
        }
    }
}

/// How often the business wants management reporting from the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingFrequency {
    Monthly,
    Quarterly,
}

/// Service catalogue codes. Bookkeeping is mandatory; the rest are add-ons
/// priced independently of the bookkeeping base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCode {
    Bookkeeping,
    Payroll,
    VatReturns,
    ManagementAccounts,
    FinancialAnalysis,
    Forecasting,
    CreditControl,
    CfoAdvisory,
}

impl ServiceCode {
    /// Add-on services priced by turnover band, in the deterministic order
    /// the vendor calculator resolves them.
    pub const ADD_ONS: [ServiceCode; 6] = [
        ServiceCode::VatReturns,
        ServiceCode::ManagementAccounts,
        ServiceCode::FinancialAnalysis,
        ServiceCode::Forecasting,
        ServiceCode::CreditControl,
        ServiceCode::CfoAdvisory,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            ServiceCode::Bookkeeping => "BK",
            ServiceCode::Payroll => "PR",
            ServiceCode::VatReturns => "VAT",
            ServiceCode::ManagementAccounts => "MA",
            ServiceCode::FinancialAnalysis => "FA",
            ServiceCode::Forecasting => "FCF",
            ServiceCode::CreditControl => "CC",
            ServiceCode::CfoAdvisory => "CFO",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ServiceCode::Bookkeeping => "Bookkeeping",
            ServiceCode::Payroll => "Payroll",
            ServiceCode::VatReturns => "VAT Returns",
            ServiceCode::ManagementAccounts => "Management Accounts",
            ServiceCode::FinancialAnalysis => "Financial Analysis",
            ServiceCode::Forecasting => "Budgeting & Cashflow Forecasting",
            ServiceCode::CreditControl => "Credit Control",
            ServiceCode::CfoAdvisory => "CFO Advisory",
        }
    }

    /// Accepts either the short code ("VAT") or the catalogue slug
    /// ("vat-returns"), the two spellings intake forms have historically sent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "BK" | "bookkeeping" => Some(ServiceCode::Bookkeeping),
            "PR" | "payroll" => Some(ServiceCode::Payroll),
            "VAT" | "vat-returns" => Some(ServiceCode::VatReturns),
            "MA" | "management-accounts" => Some(ServiceCode::ManagementAccounts),
            "FA" | "financial-analysis" => Some(ServiceCode::FinancialAnalysis),
            "FCF" | "budgeting-forecasting" => Some(ServiceCode::Forecasting),
            "CC" | "credit-control" => Some(ServiceCode::CreditControl),
            "CFO" | "cfo-advisory" => Some(ServiceCode::CfoAdvisory),
            _ => None,
        }
    }
}

/// The profile a business submits for quoting. One profile drives one full
/// calculation; there is no state shared between submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    /// Human-readable revenue range, e.g. "£1M - £5M" or "£20M+".
    pub turnover_band: String,
    pub staff_count: u32,
    pub monthly_transactions: u32,
    pub setup_mode: SetupMode,
    pub reporting_frequency: ReportingFrequency,
    #[serde(default)]
    pub selected_services: BTreeSet<ServiceCode>,
    /// Owner's hourly value override; zero is treated as "not provided".
    #[serde(default)]
    pub owner_hourly_value: Option<f64>,
    #[serde(default)]
    pub owner_hours_per_month: Option<f64>,
    #[serde(default)]
    pub internal_monthly_spend: Option<f64>,
    #[serde(default)]
    pub external_monthly_spend: Option<f64>,
}

impl BusinessProfile {
    /// Rejects malformed input before any calculator runs. Calculators assume
    /// a validated profile and never re-check these conditions.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ProfileValidationError::MissingCompanyName);
        }
        if self.turnover_band.trim().is_empty() {
            return Err(ProfileValidationError::MissingTurnoverBand);
        }
        if self.staff_count == 0 {
            return Err(ProfileValidationError::NoStaff);
        }
        if self.monthly_transactions == 0 {
            return Err(ProfileValidationError::NoTransactions);
        }

        for (field, value) in [
            ("owner_hourly_value", self.owner_hourly_value),
            ("owner_hours_per_month", self.owner_hours_per_month),
            ("internal_monthly_spend", self.internal_monthly_spend),
            ("external_monthly_spend", self.external_monthly_spend),
        ] {
            if let Some(amount) = value {
                if amount < 0.0 || !amount.is_finite() {
                    return Err(ProfileValidationError::NegativeAmount { field });
                }
            }
        }

        if self.setup_mode == SetupMode::OwnerLed {
            match self.owner_hours_per_month {
                None => return Err(ProfileValidationError::MissingOwnerHours),
                Some(hours) if !(1.0..=180.0).contains(&hours) => {
                    return Err(ProfileValidationError::OwnerHoursOutOfRange { hours })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Input rejections raised before calculation begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("company name is required")]
    MissingCompanyName,
    #[error("annual turnover band is required")]
    MissingTurnoverBand,
    #[error("number of staff must be at least 1")]
    NoStaff,
    #[error("monthly transaction volume must be at least 1")]
    NoTransactions,
    #[error("{field} cannot be negative")]
    NegativeAmount { field: &'static str },
    #[error("owner-led setup requires owner hours per month")]
    MissingOwnerHours,
    #[error("owner hours per month must be between 1 and 180, got {hours}")]
    OwnerHoursOutOfRange { hours: f64 },
}
