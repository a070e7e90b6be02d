//! Owned, ordered entry list for one household and its TOML input format.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::calc::{
    ApplianceEntry, BreakdownItem, EntryUpdate, RankedEntry, Totals, aggregate,
    consumption_breakdown, rank_entries,
};
use crate::catalog::{CatalogProvider, RegionCode, RegionTariff, TariffProvider};
use crate::config::ConfigError;
use crate::error::{CalcError, Result};
use crate::scenario::Scenario;

/// The entry list of one household, priced with its region's tariff.
///
/// Every mutation returns the totals recomputed from the current list.
#[derive(Debug, Clone)]
pub struct Household {
    region: RegionCode,
    tariff: RegionTariff,
    entries: Vec<ApplianceEntry>,
}

impl Household {
    /// Creates an empty household for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::MissingTariff`] if `tariffs` has no row for the region.
    pub fn new(region: RegionCode, tariffs: &impl TariffProvider) -> Result<Self> {
        Ok(Self {
            region,
            tariff: tariffs.tariff(region)?.clone(),
            entries: Vec::new(),
        })
    }

    pub fn region(&self) -> RegionCode {
        self.region
    }

    pub fn tariff(&self) -> &RegionTariff {
        &self.tariff
    }

    pub fn entries(&self) -> &[ApplianceEntry] {
        &self.entries
    }

    /// Appends `entry` and returns the new totals.
    pub fn add(&mut self, entry: ApplianceEntry) -> Totals {
        self.entries.push(entry);
        self.totals()
    }

    /// Appends an entry built from catalog item `id` with its rated power,
    /// optionally overridden by `watts`.
    ///
    /// # Errors
    ///
    /// Returns a [`CalcError`] for an unknown id or invalid usage values.
    pub fn add_from_catalog(
        &mut self,
        catalog: &impl CatalogProvider,
        id: &str,
        watts: Option<f64>,
        hours_per_day: f64,
        quantity: u32,
    ) -> Result<Totals> {
        let def = catalog.appliance(id)?;
        let entry = match watts {
            None => ApplianceEntry::from_definition(def, hours_per_day, quantity)?,
            Some(w) => ApplianceEntry::new(&def.id, &def.name, w, hours_per_day, quantity)?,
        };
        Ok(self.add(entry))
    }

    /// Applies `update` to the entry at `index` and returns the new totals.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::EntryOutOfRange`] or the validation error of
    /// the update; on error the list is unchanged.
    pub fn update(&mut self, index: usize, update: EntryUpdate) -> Result<Totals> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(CalcError::EntryOutOfRange { index, len })?;
        entry.apply(update)?;
        Ok(self.totals())
    }

    /// Removes the entry at `index`, returning it with the new totals.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::EntryOutOfRange`] if `index` is past the end.
    pub fn remove(&mut self, index: usize) -> Result<(ApplianceEntry, Totals)> {
        let len = self.entries.len();
        if index >= len {
            return Err(CalcError::EntryOutOfRange { index, len });
        }
        let removed = self.entries.remove(index);
        Ok((removed, self.totals()))
    }

    /// Monthly totals of the current list.
    pub fn totals(&self) -> Totals {
        aggregate(&self.entries, &self.tariff)
    }

    /// Entries ranked by monthly cost, highest first.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        rank_entries(&self.entries, self.tariff.cost_per_kwh)
    }

    /// Top `limit` consumers with their share of total kWh.
    pub fn breakdown(&self, limit: usize) -> Vec<BreakdownItem> {
        consumption_breakdown(&self.entries, limit)
    }

    /// Freezes the current list and totals into a named scenario.
    pub fn snapshot(&self, name: impl Into<String>, created_at: DateTime<Utc>) -> Scenario {
        Scenario {
            name: name.into(),
            region: self.region,
            entries: self.entries.clone(),
            totals: self.totals(),
            created_at,
        }
    }
}

/// Household description read from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseholdFile {
    /// Scenario name used when saving.
    #[serde(default)]
    pub name: Option<String>,
    /// Region code (`"RM"`, ...).
    pub region: String,
    /// Owner RUT, any common notation.
    #[serde(default)]
    pub rut: Option<String>,
    #[serde(default)]
    pub entries: Vec<EntryFile>,
}

/// One `[[entries]]` row of a household file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryFile {
    /// Catalog identifier.
    pub appliance: String,
    pub hours_per_day: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Overrides the catalog's rated power.
    #[serde(default)]
    pub watts: Option<f64>,
}

fn default_quantity() -> u32 {
    1
}

impl HouseholdFile {
    /// Parses a household from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "household".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a household from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "household".to_string(),
            message: e.to_string(),
        })
    }

    /// Builds a [`Household`], optionally in a different region than the
    /// file declares.
    ///
    /// # Errors
    ///
    /// Returns the first [`CalcError`] found: unknown region or appliance,
    /// missing tariff, or invalid usage values.
    pub fn into_household<T>(&self, tables: &T, region: Option<RegionCode>) -> Result<Household>
    where
        T: CatalogProvider + TariffProvider,
    {
        let region = match region {
            Some(r) => r,
            None => self.region.parse()?,
        };
        let mut household = Household::new(region, tables)?;
        for e in &self.entries {
            household.add_from_catalog(tables, &e.appliance, e.watts, e.hours_per_day, e.quantity)?;
        }
        Ok(household)
    }
}
