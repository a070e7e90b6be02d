//! Pure energy, cost and emissions arithmetic.
//!
//! These functions perform no validation: negative or non-finite inputs
//! propagate into the result. Validate at the entry boundary
//! ([`crate::calc::ApplianceEntry::new`]) before calling them.

/// Days in the fixed billing month used for every projection.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Monthly energy (kWh) for `quantity` appliances of `watts` used
/// `hours_per_day` over a 30-day month.
pub fn monthly_kwh(watts: f64, hours_per_day: f64, quantity: u32) -> f64 {
    let kw = watts / 1000.0;
    kw * hours_per_day * DAYS_PER_MONTH * f64::from(quantity)
}

/// Cost of `kwh` at `price_per_kwh`. Negative `kwh` yields a negative cost.
pub fn cost_from_kwh(kwh: f64, price_per_kwh: f64) -> f64 {
    kwh * price_per_kwh
}

/// Emissions (kg CO₂) of `kwh` at `factor` kg/kWh.
pub fn emissions_from_kwh(kwh: f64, factor: f64) -> f64 {
    kwh * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_kilowatt_one_hour_is_thirty_kwh() {
        assert!((monthly_kwh(1000.0, 1.0, 1) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn linear_in_quantity() {
        for (watts, hours) in [(60.0, 4.0), (150.0, 24.0), (2500.0, 0.5), (9.0, 3.3)] {
            let single = monthly_kwh(watts, hours, 1);
            for q in [2, 3, 7, 40] {
                let many = monthly_kwh(watts, hours, q);
                assert!((many - single * f64::from(q)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn cost_and_emissions_examples() {
        assert!((cost_from_kwh(100.0, 150.0) - 15_000.0).abs() < 1e-9);
        assert!((emissions_from_kwh(100.0, 0.3) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn negative_kwh_gives_negative_cost() {
        assert!((cost_from_kwh(-2.0, 190.0) + 380.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_inputs_propagate() {
        assert!(monthly_kwh(-100.0, 2.0, 1) < 0.0);
        assert!(monthly_kwh(f64::NAN, 2.0, 1).is_nan());
        assert_eq!(monthly_kwh(100.0, 2.0, 0), 0.0);
    }
}
