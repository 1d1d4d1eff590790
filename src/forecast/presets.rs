//! Default average-rate forecasts per debt category
//!
//! Offsets are days after the curve's seed date; values are decimal rates.

use super::curve::ForecastCurve;
use crate::category::DebtCategory;
use crate::error::Result;
use chrono::Duration;

/// Preset control point offsets (1, 1.5, 2, 2.5 and 3 years)
pub const PRESET_OFFSETS_DAYS: [i64; 5] = [365, 547, 730, 912, 1095];

/// Preset rate path for a category, `None` when no preset exists
pub fn preset_rates(category: DebtCategory) -> Option<[f64; 5]> {
    match category {
        DebtCategory::Bills => Some([0.0300, 0.0025, 0.0025, 0.0025, 0.0050]),
        DebtCategory::Notes => Some([0.0210, 0.0250, 0.0280, 0.0260, 0.0240]),
        DebtCategory::Bonds => Some([0.0300, 0.0310, 0.0320, 0.0340, 0.0380]),
        DebtCategory::Tips => None,
    }
}

/// Add the preset points to `curve`, offset from its pinned start.
/// Returns false when the category has no preset.
pub fn apply_preset(curve: &mut ForecastCurve, category: DebtCategory) -> Result<bool> {
    let Some(rates) = preset_rates(category) else {
        return Ok(false);
    };

    let start = curve.start();
    for (offset, rate) in PRESET_OFFSETS_DAYS.iter().zip(rates) {
        curve.add_point(start + Duration::days(*offset), rate)?;
    }
    Ok(true)
}
