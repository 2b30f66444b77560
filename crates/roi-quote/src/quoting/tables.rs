//! CSV ingestion for the pricing reference data.
//!
//! Four tables seed an [`InMemoryRateStore`]: `pricing_rules.csv`,
//! `assumptions.csv`, `role_mix_rules.csv`, and `salaries.csv`. A pricing
//! rule row carries either a transaction band, a turnover band (upper bound
//! optional for open-ended bands), or neither for a flat base price.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::band::BandRange;
use super::domain::ServiceCode;
use super::rates::{
    AssumptionValue, FinanceRole, InMemoryRateStore, PricingRule, RoleMixRule, VolumeBand,
};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read {table}: {source}")]
    Io {
        table: &'static str,
        source: std::io::Error,
    },
    #[error("failed to parse {table}: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },
    #[error("unknown service code '{0}' in pricing_rules")]
    UnknownService(String),
    #[error("unknown finance role '{0}' in salaries")]
    UnknownRole(String),
    #[error("pricing rule for '{0}' has a volume band missing its upper bound")]
    HalfOpenVolumeBand(String),
}

/// Loads all four tables from a directory into a rate store.
pub fn load_rate_store(dir: &Path) -> Result<InMemoryRateStore, TableError> {
    let open = |name: &'static str| {
        File::open(dir.join(name)).map_err(|source| TableError::Io {
            table: name,
            source,
        })
    };

    let pricing_rules = pricing_rules_from_reader(open("pricing_rules.csv")?)?;
    let assumptions = assumptions_from_reader(open("assumptions.csv")?)?;
    let role_mix_rules = role_mix_rules_from_reader(open("role_mix_rules.csv")?)?;
    let salaries = salaries_from_reader(open("salaries.csv")?)?;

    Ok(InMemoryRateStore::new(
        pricing_rules,
        assumptions,
        role_mix_rules,
        salaries,
    ))
}

#[derive(Debug, Deserialize)]
struct PricingRuleRow {
    service_code: String,
    #[serde(default)]
    band_min: Option<u32>,
    #[serde(default)]
    band_max: Option<u32>,
    #[serde(default)]
    turnover_min: Option<f64>,
    #[serde(default)]
    turnover_max: Option<f64>,
    monthly_price: f64,
}

pub fn pricing_rules_from_reader<R: Read>(reader: R) -> Result<Vec<PricingRule>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for record in csv_reader.deserialize::<PricingRuleRow>() {
        let row = record.map_err(|source| TableError::Csv {
            table: "pricing_rules.csv",
            source,
        })?;

        let service = ServiceCode::parse(&row.service_code)
            .ok_or_else(|| TableError::UnknownService(row.service_code.clone()))?;

        let volume_band = match (row.band_min, row.band_max) {
            (Some(min), Some(max)) => Some(VolumeBand { min, max }),
            (None, None) => None,
            _ => return Err(TableError::HalfOpenVolumeBand(row.service_code)),
        };

        // An open-ended turnover band omits its upper bound.
        let turnover_band = row
            .turnover_min
            .map(|min| BandRange::new(min, row.turnover_max.unwrap_or(f64::INFINITY)));

        rules.push(PricingRule {
            service,
            monthly_price: row.monthly_price,
            volume_band,
            turnover_band,
        });
    }

    Ok(rules)
}

#[derive(Debug, Deserialize)]
struct AssumptionRow {
    key: String,
    amount: f64,
    #[serde(default)]
    description: Option<String>,
}

pub fn assumptions_from_reader<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, AssumptionValue>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut assumptions = BTreeMap::new();

    for record in csv_reader.deserialize::<AssumptionRow>() {
        let row = record.map_err(|source| TableError::Csv {
            table: "assumptions.csv",
            source,
        })?;

        let description = row.description.filter(|text| !text.is_empty());
        let value = match description {
            Some(description) => AssumptionValue::Structured {
                amount: row.amount,
                description: Some(description),
            },
            None => AssumptionValue::Number(row.amount),
        };

        assumptions.insert(row.key, value);
    }

    Ok(assumptions)
}

#[derive(Debug, Deserialize)]
struct RoleMixRow {
    revenue_min: f64,
    #[serde(default)]
    revenue_max: Option<f64>,
    bk_fte: f64,
    acct_fte: f64,
    fc_fte: f64,
    fd_fte: f64,
    cfo_fte: f64,
    cc_fte: f64,
}

pub fn role_mix_rules_from_reader<R: Read>(reader: R) -> Result<Vec<RoleMixRule>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for record in csv_reader.deserialize::<RoleMixRow>() {
        let row = record.map_err(|source| TableError::Csv {
            table: "role_mix_rules.csv",
            source,
        })?;

        rules.push(RoleMixRule {
            revenue_band: BandRange::new(row.revenue_min, row.revenue_max.unwrap_or(f64::INFINITY)),
            bookkeeper_fte: row.bk_fte,
            accountant_fte: row.acct_fte,
            financial_controller_fte: row.fc_fte,
            finance_director_fte: row.fd_fte,
            cfo_fte: row.cfo_fte,
            credit_controller_fte: row.cc_fte,
        });
    }

    Ok(rules)
}

#[derive(Debug, Deserialize)]
struct SalaryRow {
    role: String,
    annual_salary_gbp: f64,
}

pub fn salaries_from_reader<R: Read>(
    reader: R,
) -> Result<BTreeMap<FinanceRole, f64>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut salaries = BTreeMap::new();

    for record in csv_reader.deserialize::<SalaryRow>() {
        let row = record.map_err(|source| TableError::Csv {
            table: "salaries.csv",
            source,
        })?;

        let role = FinanceRole::parse(&row.role)
            .ok_or_else(|| TableError::UnknownRole(row.role.clone()))?;
        salaries.insert(role, row.annual_salary_gbp);
    }

    Ok(salaries)
}
