//! Projection of savings for a target reduction in consumption.

use serde::{Deserialize, Serialize};

use super::aggregate::MONTHS_PER_YEAR;
use super::consumption::cost_from_kwh;
use crate::error::{CalcError, Result};

/// Horizon for the cumulative savings figure (years).
pub const CUMULATIVE_YEARS: f64 = 5.0;

/// A savings measure and the reduction it is expected to achieve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavingsMeasure {
    /// Expected reduction of monthly consumption (%).
    pub percentage: f64,
    /// Description of the measure.
    pub measure: String,
    /// Up-front investment (CLP, >= 0).
    pub investment: f64,
}

/// Savings obtained by cutting consumption by `target_pct`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProjection {
    pub target_pct: f64,
    /// Monthly energy saved (kWh).
    pub kwh: f64,
    pub monthly: f64,
    pub annual: f64,
    /// Cumulative saving over [`CUMULATIVE_YEARS`].
    pub cumulative: f64,
    /// Cheapest-to-reach measure meeting the target, or the most ambitious one.
    pub recommended: Option<SavingsMeasure>,
    /// Whole months to recover the recommended measure's investment; `None`
    /// when nothing is invested, nothing is saved, or it exceeds `u32::MAX`.
    pub payback_months: Option<u32>,
}

/// Projects savings for reducing `monthly_kwh` by `target_pct` percent.
///
/// `measures` need not be sorted.
///
/// # Errors
///
/// Returns [`CalcError::InvalidPercentage`] unless `0 < target_pct <= 100`.
pub fn project_savings(
    monthly_kwh: f64,
    price_per_kwh: f64,
    target_pct: f64,
    measures: &[SavingsMeasure],
) -> Result<SavingsProjection> {
    if !(target_pct > 0.0 && target_pct <= 100.0) {
        return Err(CalcError::InvalidPercentage(target_pct));
    }

    let kwh = monthly_kwh * target_pct / 100.0;
    let monthly = cost_from_kwh(kwh, price_per_kwh);
    let annual = monthly * MONTHS_PER_YEAR;

    let mut sorted: Vec<&SavingsMeasure> = measures.iter().collect();
    sorted.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
    let recommended = sorted
        .iter()
        .find(|m| m.percentage >= target_pct)
        .or(sorted.last())
        .map(|m| (*m).clone());

    // Paybacks too long to count in whole months are reported as none.
    let payback_months = recommended.as_ref().and_then(|m| {
        if m.investment > 0.0 && monthly > 0.0 {
            let months = (m.investment / monthly).ceil();
            (months <= f64::from(u32::MAX)).then_some(months as u32)
        } else {
            None
        }
    });

    Ok(SavingsProjection {
        target_pct,
        kwh,
        monthly,
        annual,
        cumulative: annual * CUMULATIVE_YEARS,
        recommended,
        payback_months,
    })
}
