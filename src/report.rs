//! Estimate report: monthly and annual totals, ranked entries, and the
//! optional comparison and savings sections.

use std::fmt;

use serde::Serialize;

use crate::calc::{Comparison, RankedEntry, SavingsProjection, Totals};
use crate::catalog::RegionCode;
use crate::format::{format_clp, format_number};
use crate::household::Household;

/// A named comparison of two appliances, as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSection {
    pub name_a: String,
    pub name_b: String,
    pub hours_per_day: f64,
    pub price_delta: f64,
    pub result: Comparison,
}

/// Summary of a household estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    pub region: RegionCode,
    pub region_name: String,
    pub cost_per_kwh: f64,
    pub monthly: Totals,
    pub annual: Totals,
    pub ranked: Vec<RankedEntry>,
    pub comparison: Option<ComparisonSection>,
    pub savings: Option<SavingsProjection>,
}

impl EstimateReport {
    /// Builds the report for the current state of `household`.
    pub fn from_household(household: &Household) -> Self {
        let monthly = household.totals();
        Self {
            region: household.region(),
            region_name: household.tariff().name.clone(),
            cost_per_kwh: household.tariff().cost_per_kwh,
            monthly,
            annual: monthly.annual(),
            ranked: household.ranked(),
            comparison: None,
            savings: None,
        }
    }

    pub fn with_comparison(mut self, comparison: ComparisonSection) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_savings(mut self, savings: SavingsProjection) -> Self {
        self.savings = Some(savings);
        self
    }
}

impl fmt::Display for EstimateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Estimate Report ---")?;
        writeln!(
            f,
            "Region:                {} ({}), {}/kWh",
            self.region_name,
            self.region,
            format_clp(self.cost_per_kwh)
        )?;
        writeln!(
            f,
            "Monthly consumption:   {} kWh",
            format_number(self.monthly.kwh, 2)
        )?;
        writeln!(f, "Monthly cost:          {}", format_clp(self.monthly.cost))?;
        writeln!(
            f,
            "Monthly emissions:     {} kg CO2",
            format_number(self.monthly.co2, 2)
        )?;
        writeln!(
            f,
            "Annual consumption:    {} kWh",
            format_number(self.annual.kwh, 2)
        )?;
        writeln!(f, "Annual cost:           {}", format_clp(self.annual.cost))?;
        write!(
            f,
            "Annual emissions:      {} kg CO2",
            format_number(self.annual.co2, 2)
        )?;

        if !self.ranked.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "--- Ranking by monthly cost ---")?;
            for (rank, r) in self.ranked.iter().enumerate() {
                writeln!(f)?;
                write!(
                    f,
                    "{:>2}. {:<32} {:>10} kWh {:>10}  [{}]",
                    rank + 1,
                    format!("{} x{}", r.entry.name(), r.entry.quantity()),
                    format_number(r.kwh, 2),
                    format_clp(r.cost),
                    r.severity
                )?;
            }
        }

        if let Some(c) = &self.comparison {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "--- Comparison ---")?;
            writeln!(
                f,
                "{} vs {} at {} h/day",
                c.name_a,
                c.name_b,
                format_number(c.hours_per_day, 2)
            )?;
            writeln!(
                f,
                "Monthly consumption:   {} kWh vs {} kWh",
                format_number(c.result.kwh_a, 2),
                format_number(c.result.kwh_b, 2)
            )?;
            writeln!(
                f,
                "Monthly saving:        {}",
                format_clp(c.result.monthly_saving)
            )?;
            match c.result.recovery_months {
                Some(months) => write!(
                    f,
                    "Recovery period:       {} months for {}",
                    format_number(months, 1),
                    format_clp(c.price_delta)
                )?,
                None => write!(f, "Recovery period:       never (no saving)")?,
            }
        }

        if let Some(s) = &self.savings {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "--- Savings at {}% ---", format_number(s.target_pct, 1))?;
            writeln!(f, "Energy saved:          {} kWh/month", format_number(s.kwh, 2))?;
            writeln!(f, "Monthly saving:        {}", format_clp(s.monthly))?;
            writeln!(f, "Annual saving:         {}", format_clp(s.annual))?;
            write!(f, "Five-year saving:      {}", format_clp(s.cumulative))?;
            if let Some(m) = &s.recommended {
                writeln!(f)?;
                write!(
                    f,
                    "Recommended measure:   {} ({}%, {})",
                    m.measure,
                    format_number(m.percentage, 1),
                    format_clp(m.investment)
                )?;
                if let Some(months) = s.payback_months {
                    write!(f, ", pays back in {months} months")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compare_watts, project_savings};
    use crate::config::Tables;

    fn household() -> Household {
        let tables = Tables::from_preset("chile_2024").unwrap();
        let mut h = Household::new(RegionCode::Metropolitana, &tables).unwrap();
        h.add_from_catalog(&tables, "led_bulb", None, 5.0, 6).unwrap();
        h.add_from_catalog(&tables, "refrigerator", None, 24.0, 1)
            .unwrap();
        h
    }

    #[test]
    fn annual_is_twelve_times_monthly() {
        let report = EstimateReport::from_household(&household());
        assert!((report.annual.kwh - 12.0 * report.monthly.kwh).abs() < 1e-9);
        assert!((report.annual.cost - 12.0 * report.monthly.cost).abs() < 1e-6);
        assert_eq!(report.region_name, "Metropolitana");
    }

    #[test]
    fn display_lists_totals_and_ranking() {
        let text = EstimateReport::from_household(&household()).to_string();
        assert!(text.starts_with("--- Estimate Report ---"));
        assert!(text.contains("Monthly consumption:   116,1 kWh"));
        assert!(text.contains("Monthly cost:          $22.6"));
        let fridge = text.find("Refrigerador").unwrap_or(usize::MAX);
        let bulb = text.find("Ampolleta LED").unwrap_or(0);
        assert!(fridge < bulb);
    }

    #[test]
    fn display_reports_no_payback_distinctly() {
        let c = compare_watts(9.0, 60.0, 4.0, 195.0, 5000.0).unwrap();
        let report = EstimateReport::from_household(&household()).with_comparison(
            ComparisonSection {
                name_a: "LED".to_string(),
                name_b: "Incandescente".to_string(),
                hours_per_day: 4.0,
                price_delta: 5000.0,
                result: c,
            },
        );
        let text = report.to_string();
        assert!(text.contains("Recovery period:       never (no saving)"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn display_includes_savings_section() {
        let h = household();
        let s = project_savings(h.totals().kwh, 195.0, 10.0, &[]).unwrap();
        let text = EstimateReport::from_household(&h).with_savings(s).to_string();
        assert!(text.contains("--- Savings at 10% ---"));
        assert!(!text.contains("Recommended measure"));
    }

    #[test]
    fn empty_household_has_no_ranking_section() {
        let tables = Tables::from_preset("chile_2024").unwrap();
        let h = Household::new(RegionCode::Maule, &tables).unwrap();
        let text = EstimateReport::from_household(&h).to_string();
        assert!(!text.contains("Ranking"));
        assert!(text.contains("Monthly cost:          $0"));
    }
}
