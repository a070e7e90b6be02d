//! TOML-based tariff/catalog tables and preset definitions.
//!
//! Tables are configuration data: they are parsed once, validated as a
//! whole, and turned into immutable [`Tables`]. No single revision of the
//! numbers is assumed authoritative.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::calc::SavingsMeasure;
use crate::catalog::{
    ApplianceDefinition, Catalog, CatalogProvider, RegionCode, RegionTariff, TariffProvider,
    TariffTable,
};
use crate::error::Result as CalcResult;

const CHILE_2024: &str = include_str!("../presets/chile_2024.toml");

/// Top-level tables configuration parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablesConfig {
    /// Free-form revision label of the tables.
    #[serde(default)]
    pub version: String,
    /// Emission factor model.
    #[serde(default)]
    pub emissions: EmissionsConfig,
    /// Per-region tariffs.
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
    /// Appliance catalog, in display order.
    #[serde(default)]
    pub appliances: Vec<ApplianceConfig>,
    /// Efficiency comparison defaults.
    #[serde(default)]
    pub comparison: ComparisonConfig,
    /// Scenario history settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Savings measures offered by the savings projection.
    #[serde(default)]
    pub savings_measures: Vec<SavingsMeasure>,
}

/// Emission factor model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionsConfig {
    /// Single national factor (kg CO₂/kWh). When set, it replaces every
    /// per-region factor.
    pub national_factor: Option<f64>,
}

/// One row of the regional tariff table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    /// Region code (`"RM"`, `"XV"`, ...).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Price per kWh (CLP, > 0).
    pub cost_per_kwh: f64,
    /// Regional emission factor (kg CO₂/kWh, > 0).
    #[serde(default)]
    pub co2_factor_per_kwh: Option<f64>,
}

/// One appliance catalog row.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceConfig {
    pub id: String,
    pub name: String,
    /// Rated power (W, > 0).
    pub watts: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Efficiency comparison defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Daily usage assumed for both appliances (hours, in (0, 24]).
    pub default_hours: f64,
    /// Appliance currently in use.
    pub appliance_a: String,
    /// Candidate replacement.
    pub appliance_b: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            default_hours: 4.0,
            appliance_a: "incandescent_bulb".to_string(),
            appliance_b: "led_bulb".to_string(),
        }
    }
}

/// Scenario history settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of scenarios returned by a listing (must be > 0).
    pub max_scenarios: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_scenarios: 10 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"regions[3].cost_per_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated, immutable lookup tables.
#[derive(Debug, Clone)]
pub struct Tables {
    pub version: String,
    pub catalog: Catalog,
    pub tariffs: TariffTable,
    pub comparison: ComparisonConfig,
    pub history_limit: usize,
    pub savings_measures: Vec<SavingsMeasure>,
}

impl Tables {
    /// Loads and builds a named preset.
    ///
    /// # Arguments
    ///
    /// * `name` - One of [`TablesConfig::PRESETS`]
    ///
    /// # Returns
    ///
    /// Validated tables ready for lookups.
    ///
    /// # Errors
    ///
    /// Returns every `ConfigError` found while parsing or validating.
    pub fn from_preset(name: &str) -> Result<Self, Vec<ConfigError>> {
        TablesConfig::from_preset(name)
            .map_err(|e| vec![e])?
            .build()
    }
}

impl CatalogProvider for Tables {
    fn appliance(&self, id: &str) -> CalcResult<&ApplianceDefinition> {
        self.catalog.appliance(id)
    }
}

impl TariffProvider for Tables {
    fn tariff(&self, region: RegionCode) -> CalcResult<&RegionTariff> {
        self.tariffs.tariff(region)
    }
}

impl TablesConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["chile_2024"];

    /// Loads tables from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "chile_2024" => Self::from_toml_str(CHILE_2024),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("tables", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses tables from a TOML string.
    ///
    /// # Arguments
    ///
    /// * `s` - TOML document with `[[regions]]` and `[[appliances]]` tables
    ///
    /// # Returns
    ///
    /// The unvalidated configuration; call [`TablesConfig::build`] next.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let national = self.emissions.national_factor;
        if let Some(f) = national {
            if !(f.is_finite() && f > 0.0) {
                errors.push(ConfigError::new("emissions.national_factor", "must be > 0"));
            }
        }

        if self.regions.is_empty() {
            errors.push(ConfigError::new("regions", "must list at least one region"));
        }
        let mut seen_regions = HashSet::new();
        for (i, r) in self.regions.iter().enumerate() {
            match r.code.parse::<RegionCode>() {
                Ok(code) => {
                    if !seen_regions.insert(code) {
                        errors.push(ConfigError::new(
                            format!("regions[{i}].code"),
                            format!("duplicate region \"{code}\""),
                        ));
                    }
                }
                Err(e) => errors.push(ConfigError::new(format!("regions[{i}].code"), e.to_string())),
            }
            if !(r.cost_per_kwh.is_finite() && r.cost_per_kwh > 0.0) {
                errors.push(ConfigError::new(
                    format!("regions[{i}].cost_per_kwh"),
                    "must be > 0",
                ));
            }
            match r.co2_factor_per_kwh {
                Some(f) if !(f.is_finite() && f > 0.0) => errors.push(ConfigError::new(
                    format!("regions[{i}].co2_factor_per_kwh"),
                    "must be > 0",
                )),
                None if national.is_none() => errors.push(ConfigError::new(
                    format!("regions[{i}].co2_factor_per_kwh"),
                    "required when emissions.national_factor is not set",
                )),
                _ => {}
            }
        }

        if self.appliances.is_empty() {
            errors.push(ConfigError::new("appliances", "must list at least one appliance"));
        }
        let mut seen_ids = HashSet::new();
        for (i, a) in self.appliances.iter().enumerate() {
            if a.id.trim().is_empty() {
                errors.push(ConfigError::new(format!("appliances[{i}].id"), "must not be empty"));
            } else if !seen_ids.insert(a.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("appliances[{i}].id"),
                    format!("duplicate appliance \"{}\"", a.id),
                ));
            }
            if !(a.watts.is_finite() && a.watts > 0.0) {
                errors.push(ConfigError::new(format!("appliances[{i}].watts"), "must be > 0"));
            }
        }

        let c = &self.comparison;
        if !(c.default_hours > 0.0 && c.default_hours <= 24.0) {
            errors.push(ConfigError::new(
                "comparison.default_hours",
                "must be in (0, 24]",
            ));
        }
        for (field, id) in [
            ("comparison.appliance_a", &c.appliance_a),
            ("comparison.appliance_b", &c.appliance_b),
        ] {
            if !seen_ids.contains(id.as_str()) {
                errors.push(ConfigError::new(field, format!("unknown appliance \"{id}\"")));
            }
        }

        if self.history.max_scenarios == 0 {
            errors.push(ConfigError::new("history.max_scenarios", "must be > 0"));
        }

        for (i, m) in self.savings_measures.iter().enumerate() {
            if !(m.percentage > 0.0 && m.percentage <= 100.0) {
                errors.push(ConfigError::new(
                    format!("savings_measures[{i}].percentage"),
                    "must be in (0, 100]",
                ));
            }
            if !(m.investment.is_finite() && m.investment >= 0.0) {
                errors.push(ConfigError::new(
                    format!("savings_measures[{i}].investment"),
                    "must be >= 0",
                ));
            }
        }

        errors
    }

    /// Validates and converts into immutable [`Tables`].
    ///
    /// # Returns
    ///
    /// Tables with the national emission factor, when set, applied to every
    /// region.
    ///
    /// # Errors
    ///
    /// Returns every validation error if the configuration is invalid.
    pub fn build(&self) -> Result<Tables, Vec<ConfigError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut rows = BTreeMap::new();
        for r in &self.regions {
            let code = r
                .code
                .parse::<RegionCode>()
                .map_err(|e| vec![ConfigError::new("regions", e.to_string())])?;
            let co2_factor_per_kwh = self
                .emissions
                .national_factor
                .or(r.co2_factor_per_kwh)
                .unwrap_or_default();
            rows.insert(
                code,
                RegionTariff {
                    name: r.name.clone(),
                    cost_per_kwh: r.cost_per_kwh,
                    co2_factor_per_kwh,
                },
            );
        }

        let catalog = Catalog::new(
            self.appliances
                .iter()
                .map(|a| ApplianceDefinition {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    watts: a.watts,
                    category: a.category.clone(),
                })
                .collect(),
        );

        debug!(
            "loaded tables version {:?}: {} regions, {} appliances",
            self.version,
            rows.len(),
            catalog.len()
        );

        Ok(Tables {
            version: self.version.clone(),
            catalog,
            tariffs: TariffTable::new(rows),
            comparison: self.comparison.clone(),
            history_limit: self.history.max_scenarios,
            savings_measures: self.savings_measures.clone(),
        })
    }
}
