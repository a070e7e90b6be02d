//! Efficiency comparison of two appliances and investment recovery period.
//!
//! Both appliances are evaluated at quantity 1 and the same daily usage.
//! `price_delta` is what appliance B costs over appliance A up front.

use serde::Serialize;

use super::consumption::{cost_from_kwh, monthly_kwh};
use super::entry::{check_hours, check_watts};
use crate::catalog::CatalogProvider;
use crate::error::{CalcError, Result};

/// Outcome of comparing appliance A (current) against appliance B (candidate).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub kwh_a: f64,
    pub kwh_b: f64,
    /// Monthly saving from switching A → B; negative when B uses more.
    pub monthly_saving: f64,
    /// Months until `price_delta` is recovered. `None` when the saving is
    /// zero or negative: the switch never pays back.
    pub recovery_months: Option<f64>,
}

impl Comparison {
    pub fn pays_back(&self) -> bool {
        self.recovery_months.is_some()
    }
}

/// Compares two rated powers at `hours` per day.
///
/// # Arguments
///
/// * `watts_a` - Rated power of the appliance in use (W)
/// * `watts_b` - Rated power of the candidate (W)
/// * `hours` - Daily usage applied to both
/// * `price_per_kwh` - Tariff pricing the energy difference (CLP)
/// * `price_delta` - Extra up-front price of B over A (CLP, may be negative)
///
/// # Errors
///
/// Returns a [`CalcError`] if either wattage is not a finite value > 0,
/// `hours` is outside (0, 24], `price_per_kwh` is not a finite value > 0,
/// or `price_delta` is not finite.
pub fn compare_watts(
    watts_a: f64,
    watts_b: f64,
    hours: f64,
    price_per_kwh: f64,
    price_delta: f64,
) -> Result<Comparison> {
    let watts_a = check_watts(watts_a)?;
    let watts_b = check_watts(watts_b)?;
    let hours = check_hours(hours)?;
    if !(price_per_kwh.is_finite() && price_per_kwh > 0.0) {
        return Err(CalcError::InvalidPrice(price_per_kwh));
    }
    if !price_delta.is_finite() {
        return Err(CalcError::InvalidPriceDelta(price_delta));
    }
    let kwh_a = monthly_kwh(watts_a, hours, 1);
    let kwh_b = monthly_kwh(watts_b, hours, 1);
    let monthly_saving = cost_from_kwh(kwh_a - kwh_b, price_per_kwh);

    // Zero and negative savings both mean no payback; never divide by them.
    let recovery_months = if monthly_saving > 0.0 {
        Some(price_delta / monthly_saving)
    } else {
        None
    };

    Ok(Comparison {
        kwh_a,
        kwh_b,
        monthly_saving,
        recovery_months,
    })
}

/// Compares two catalog items by identifier.
///
/// # Errors
///
/// Returns [`CalcError::UnknownAppliance`] for an unknown id, or any input
/// error [`compare_watts`] reports.
pub fn compare(
    catalog: &impl CatalogProvider,
    id_a: &str,
    id_b: &str,
    hours: f64,
    price_per_kwh: f64,
    price_delta: f64,
) -> Result<Comparison> {
    let a = catalog.appliance(id_a)?;
    let b = catalog.appliance(id_b)?;
    compare_watts(a.watts, b.watts, hours, price_per_kwh, price_delta)
}
