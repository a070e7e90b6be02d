//! Monthly and annual totals over an entry list.

use serde::{Deserialize, Serialize};

use super::consumption::{cost_from_kwh, emissions_from_kwh};
use super::entry::ApplianceEntry;
use crate::catalog::RegionTariff;

/// Months in a year for the annual projection.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Energy, cost and emissions for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Energy (kWh).
    pub kwh: f64,
    /// Cost (CLP).
    pub cost: f64,
    /// Emissions (kg CO₂).
    pub co2: f64,
}

impl Totals {
    /// Annual figures: exactly twelve times the monthly ones, no seasonality.
    pub fn annual(&self) -> Self {
        Self {
            kwh: self.kwh * MONTHS_PER_YEAR,
            cost: self.cost * MONTHS_PER_YEAR,
            co2: self.co2 * MONTHS_PER_YEAR,
        }
    }
}

/// Sums monthly kWh over `entries` and prices the total with `tariff`.
///
/// Cost and emissions are derived from the summed kWh rather than summed
/// per entry.
pub fn aggregate(entries: &[ApplianceEntry], tariff: &RegionTariff) -> Totals {
    let kwh: f64 = entries.iter().map(ApplianceEntry::monthly_kwh).sum();
    Totals {
        kwh,
        cost: cost_from_kwh(kwh, tariff.cost_per_kwh),
        co2: emissions_from_kwh(kwh, tariff.co2_factor_per_kwh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tariff() -> RegionTariff {
        RegionTariff {
            name: "Metropolitana".to_string(),
            cost_per_kwh: 195.0,
            co2_factor_per_kwh: 0.25,
        }
    }

    #[test]
    fn empty_list_totals_zero() {
        assert_eq!(aggregate(&[], &tariff()), Totals::default());
    }

    #[test]
    fn sums_entries_and_prices_total() {
        let entries = vec![
            ApplianceEntry::new("refrigerator", "Refrigerador", 150.0, 24.0, 1).unwrap(),
            ApplianceEntry::new("led_bulb", "LED", 9.0, 5.0, 6).unwrap(),
        ];
        let t = aggregate(&entries, &tariff());
        // 108 + 8.1
        assert!((t.kwh - 116.1).abs() < 1e-9);
        assert!((t.cost - 116.1 * 195.0).abs() < 1e-6);
        assert!((t.co2 - 116.1 * 0.25).abs() < 1e-9);
    }

    #[test]
    fn annual_is_exactly_twelve_months() {
        let entries = vec![ApplianceEntry::new("tv", "TV", 123.4, 3.7, 3).unwrap()];
        let monthly = aggregate(&entries, &tariff());
        let annual = monthly.annual();
        assert_eq!(annual.kwh, monthly.kwh * 12.0);
        assert_eq!(annual.cost, monthly.cost * 12.0);
        assert_eq!(annual.co2, monthly.co2 * 12.0);
    }
}
