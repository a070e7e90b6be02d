//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use mi_energia::calc::ApplianceEntry;
use mi_energia::catalog::RegionCode;
use mi_energia::config::Tables;
use mi_energia::household::{Household, HouseholdFile};
use mi_energia::rut::Rut;

/// Sample household shipped with the repository (Santiago, 6 entries).
pub const SANTIAGO: &str = include_str!("../../households/santiago.toml");

/// Monthly kWh of [`SANTIAGO`].
pub const SANTIAGO_KWH: f64 = 159.3;

/// The built-in 2024 tables.
pub fn tables() -> Tables {
    Tables::from_preset("chile_2024").expect("built-in preset should build")
}

/// The Santiago sample household priced with the built-in tables.
pub fn santiago_household(tables: &Tables) -> Household {
    HouseholdFile::from_toml_str(SANTIAGO)
        .expect("sample household should parse")
        .into_household(tables, None)
        .expect("sample household should build")
}

/// Entry with explicit power and usage.
pub fn entry(key: &str, watts: f64, hours: f64, quantity: u32) -> ApplianceEntry {
    ApplianceEntry::new(key, key, watts, hours, quantity).expect("valid entry")
}

/// Owner used across store tests.
pub fn owner() -> Rut {
    Rut::parse("12.345.678-5").expect("valid RUT")
}

/// A second owner for isolation checks.
pub fn other_owner() -> Rut {
    Rut::parse("11.111.111-1").expect("valid RUT")
}

/// Noon UTC on the given day of March 2025.
pub fn march(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0)
        .single()
        .expect("valid date")
}

/// Empty household in `region`.
pub fn empty_household(tables: &Tables, region: RegionCode) -> Household {
    Household::new(region, tables).expect("region has a tariff")
}
