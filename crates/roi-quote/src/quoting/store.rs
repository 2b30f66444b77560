use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::BusinessProfile;
use super::insights::QuoteInsights;
use super::vendor::CostBreakdown;

/// Identifier wrapper for persisted quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteId(pub String);

/// The persisted outcome of one quote calculation. Created once per profile
/// submission; a recalculation replaces every computed field wholesale, so a
/// stored quote never mixes old and new pricing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub profile: BusinessProfile,
    pub vendor_cost_monthly: f64,
    pub vendor_cost_annual: f64,
    pub current_setup_cost_annual: f64,
    pub savings_monthly: f64,
    pub savings_annual: f64,
    /// Signed; display layers clamp negatives, the stored value never is.
    pub efficiency_index: f64,
    pub breakdown: CostBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<QuoteInsights>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the quote service can be exercised in isolation.
/// Both writes take the full computed field set, never a partial record.
pub trait QuoteStore: Send + Sync {
    fn create(&self, quote: Quote) -> Result<Quote, QuoteStoreError>;
    fn update(&self, quote: Quote) -> Result<(), QuoteStoreError>;
    fn fetch(&self, id: &QuoteId) -> Result<Option<Quote>, QuoteStoreError>;
}

/// Error enumeration for quote store failures.
#[derive(Debug, thiserror::Error)]
pub enum QuoteStoreError {
    #[error("quote already exists")]
    Conflict,
    #[error("quote not found")]
    NotFound,
    #[error("quote store unavailable: {0}")]
    Unavailable(String),
}
