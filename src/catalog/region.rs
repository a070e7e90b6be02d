//! Region codes and the regional tariff table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Chilean administrative regions, north to south.
///
/// Serialized as the official roman-numeral code (`"RM"` for the
/// Metropolitan region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegionCode {
    #[serde(rename = "XV")]
    AricaYParinacota,
    #[serde(rename = "I")]
    Tarapaca,
    #[serde(rename = "II")]
    Antofagasta,
    #[serde(rename = "III")]
    Atacama,
    #[serde(rename = "IV")]
    Coquimbo,
    #[serde(rename = "V")]
    Valparaiso,
    #[serde(rename = "RM")]
    Metropolitana,
    #[serde(rename = "VI")]
    OHiggins,
    #[serde(rename = "VII")]
    Maule,
    #[serde(rename = "XVI")]
    Nuble,
    #[serde(rename = "VIII")]
    Biobio,
    #[serde(rename = "IX")]
    Araucania,
    #[serde(rename = "XIV")]
    LosRios,
    #[serde(rename = "X")]
    LosLagos,
    #[serde(rename = "XI")]
    Aysen,
    #[serde(rename = "XII")]
    Magallanes,
}

impl RegionCode {
    /// Every region, north to south.
    pub const ALL: [RegionCode; 16] = [
        Self::AricaYParinacota,
        Self::Tarapaca,
        Self::Antofagasta,
        Self::Atacama,
        Self::Coquimbo,
        Self::Valparaiso,
        Self::Metropolitana,
        Self::OHiggins,
        Self::Maule,
        Self::Nuble,
        Self::Biobio,
        Self::Araucania,
        Self::LosRios,
        Self::LosLagos,
        Self::Aysen,
        Self::Magallanes,
    ];

    /// Official short code.
    pub fn code(self) -> &'static str {
        match self {
            Self::AricaYParinacota => "XV",
            Self::Tarapaca => "I",
            Self::Antofagasta => "II",
            Self::Atacama => "III",
            Self::Coquimbo => "IV",
            Self::Valparaiso => "V",
            Self::Metropolitana => "RM",
            Self::OHiggins => "VI",
            Self::Maule => "VII",
            Self::Nuble => "XVI",
            Self::Biobio => "VIII",
            Self::Araucania => "IX",
            Self::LosRios => "XIV",
            Self::LosLagos => "X",
            Self::Aysen => "XI",
            Self::Magallanes => "XII",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RegionCode {
    type Err = CalcError;

    /// Parses a region code case-insensitively (`"rm"`, `" XV "`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalcError::UnknownRegion(s.to_string()))
    }
}

/// Electricity price and emission factor for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTariff {
    /// Display name of the region.
    pub name: String,
    /// Price per kWh (CLP).
    pub cost_per_kwh: f64,
    /// Emission factor (kg CO₂ per kWh).
    pub co2_factor_per_kwh: f64,
}

/// Source of tariffs by region.
pub trait TariffProvider {
    /// Returns the tariff for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::MissingTariff`] if the loaded table has no row
    /// for the region.
    fn tariff(&self, region: RegionCode) -> Result<&RegionTariff>;
}

/// Read-only table of tariffs, iterated north to south.
#[derive(Debug, Clone, Default)]
pub struct TariffTable {
    rows: BTreeMap<RegionCode, RegionTariff>,
}

impl TariffTable {
    pub fn new(rows: BTreeMap<RegionCode, RegionTariff>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionCode, &RegionTariff)> {
        self.rows.iter().map(|(code, t)| (*code, t))
    }
}

impl TariffProvider for TariffTable {
    fn tariff(&self, region: RegionCode) -> Result<&RegionTariff> {
        self.rows
            .get(&region)
            .ok_or(CalcError::MissingTariff(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("rm".parse::<RegionCode>(), Ok(RegionCode::Metropolitana));
        assert_eq!(" XVI ".parse::<RegionCode>(), Ok(RegionCode::Nuble));
        assert_eq!("xii".parse::<RegionCode>(), Ok(RegionCode::Magallanes));
    }

    #[test]
    fn unknown_code_fails_fast() {
        assert_eq!(
            "XVII".parse::<RegionCode>(),
            Err(CalcError::UnknownRegion("XVII".to_string()))
        );
        assert!("".parse::<RegionCode>().is_err());
    }

    #[test]
    fn code_round_trips_through_display() {
        for region in RegionCode::ALL {
            assert_eq!(region.to_string().parse::<RegionCode>(), Ok(region));
        }
    }

    #[test]
    fn serde_uses_short_code() {
        let json = serde_json::to_string(&RegionCode::OHiggins).ok();
        assert_eq!(json.as_deref(), Some("\"VI\""));
        let back: Option<RegionCode> = serde_json::from_str("\"XIV\"").ok();
        assert_eq!(back, Some(RegionCode::LosRios));
    }

    #[test]
    fn missing_tariff_is_reported() {
        let mut rows = BTreeMap::new();
        rows.insert(
            RegionCode::Metropolitana,
            RegionTariff {
                name: "Metropolitana".to_string(),
                cost_per_kwh: 195.0,
                co2_factor_per_kwh: 0.25,
            },
        );
        let table = TariffTable::new(rows);
        assert!(table.tariff(RegionCode::Metropolitana).is_ok());
        assert_eq!(
            table.tariff(RegionCode::Aysen),
            Err(CalcError::MissingTariff(RegionCode::Aysen))
        );
    }
}
