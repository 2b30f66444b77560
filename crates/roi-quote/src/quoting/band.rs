use serde::{Deserialize, Serialize};
use tracing::warn;

/// Numeric revenue interval parsed from a turnover band string. An open-ended
/// band ("£20M+") carries `max = f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    pub min: f64,
    pub max: f64,
}

impl BandRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The fallback range produced for unparseable input. Downstream bracket
    /// logic treats it as "under the smallest bracket".
    pub const fn degenerate() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// True when the range constrains nothing, so band filters are skipped.
    pub fn is_unbounded(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }

    pub fn overlaps(&self, other: &BandRange) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// Parses a human-readable revenue range such as `"£1m-£5m"`, `"£0 - £100k"`,
/// or `"£20M+"` into absolute currency units.
///
/// Unparseable input yields the degenerate `{0, 0}` range rather than an
/// error; the caller sees a warning in the logs and bracket resolution lands
/// on the smallest bracket.
pub fn parse_turnover_band(band: &str) -> BandRange {
    let clean = band.replace('£', "").replace(',', "");
    let clean = clean.trim();

    if clean.contains('+') {
        let stripped = clean.replace('+', "");
        if let Some(min) = parse_amount(&stripped) {
            return BandRange::new(min, f64::INFINITY);
        }
        warn!(band, "unparseable open-ended turnover band, using degenerate range");
        return BandRange::degenerate();
    }

    let parts: Vec<&str> = clean
        .split(|c| c == '-' || c == '\u{2013}')
        .map(str::trim)
        .collect();
    if parts.len() == 2 {
        if let (Some(min), Some(max)) = (parse_amount(parts[0]), parse_amount(parts[1])) {
            return BandRange::new(min, max);
        }
    }

    warn!(band, "unparseable turnover band, using degenerate range");
    BandRange::degenerate()
}

/// Parses one side of a band, applying its own unit suffix (k = 1,000;
/// m = 1,000,000; none = 1).
fn parse_amount(raw: &str) -> Option<f64> {
    let multiplier = if raw.contains(['m', 'M']) {
        1_000_000.0
    } else if raw.contains(['k', 'K']) {
        1_000.0
    } else {
        1.0
    };

    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, 'm' | 'M' | 'k' | 'K'))
        .collect();
    let value: f64 = digits.trim().parse().ok()?;
    Some(value * multiplier)
}

/// The seven revenue brackets keying the default owner-hourly-value
/// assumptions. Boundaries are inclusive on the upper bound so the catalogue
/// band "£0 - £125k" resolves to the smallest bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnoverBracket {
    Under125k,
    From125kTo500k,
    From500kTo1m,
    From1mTo5m,
    From5mTo10m,
    From10mTo20m,
    Over20m,
}

impl TurnoverBracket {
    /// Resolves the bracket containing a parsed revenue interval. Intervals
    /// straddling bracket boundaries fall through to the top bracket, the
    /// same catch-all the pricing reference data assumes.
    pub fn for_range(range: BandRange) -> Self {
        if range.max <= 125_000.0 {
            TurnoverBracket::Under125k
        } else if range.min >= 125_000.0 && range.max <= 500_000.0 {
            TurnoverBracket::From125kTo500k
        } else if range.min >= 500_000.0 && range.max <= 1_000_000.0 {
            TurnoverBracket::From500kTo1m
        } else if range.min >= 1_000_000.0 && range.max <= 5_000_000.0 {
            TurnoverBracket::From1mTo5m
        } else if range.min >= 5_000_000.0 && range.max <= 10_000_000.0 {
            TurnoverBracket::From5mTo10m
        } else if range.min >= 10_000_000.0 && range.max <= 20_000_000.0 {
            TurnoverBracket::From10mTo20m
        } else {
            TurnoverBracket::Over20m
        }
    }

    /// Assumption key holding the default owner hourly value for the bracket.
    pub const fn assumption_key(self) -> &'static str {
        match self {
            TurnoverBracket::Under125k => "owner_hourly_value_under_125k",
            TurnoverBracket::From125kTo500k => "owner_hourly_value_125k_500k",
            TurnoverBracket::From500kTo1m => "owner_hourly_value_500k_1m",
            TurnoverBracket::From1mTo5m => "owner_hourly_value_1m_5m",
            TurnoverBracket::From5mTo10m => "owner_hourly_value_5m_10m",
            TurnoverBracket::From10mTo20m => "owner_hourly_value_10m_20m",
            TurnoverBracket::Over20m => "owner_hourly_value_over_20m",
        }
    }
}
