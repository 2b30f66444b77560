use serde::{Deserialize, Serialize};

/// Savings and efficiency derived from the two annual cost figures. All
/// values are signed; a vendor bundle dearer than the current setup is a
/// valid, expected outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    pub savings_monthly: f64,
    pub savings_annual: f64,
    pub efficiency_index: f64,
}

pub fn compare(vendor_annual: f64, current_annual: f64) -> CostComparison {
    let savings_annual = current_annual - vendor_annual;

    CostComparison {
        savings_monthly: savings_annual / 12.0,
        savings_annual,
        efficiency_index: efficiency_index(vendor_annual, current_annual),
    }
}

/// Signed percentage saved by the vendor bundle relative to the current
/// setup. Defined as exactly 0 when the current cost is 0. Never clamped
/// here; display layers may clamp negatives for presentation.
pub fn efficiency_index(vendor_annual: f64, current_annual: f64) -> f64 {
    if current_annual == 0.0 {
        return 0.0;
    }
    100.0 - (vendor_annual / current_annual) * 100.0
}
