//! Validated appliance usage entries.

use serde::{Deserialize, Serialize};

use super::consumption::monthly_kwh;
use crate::catalog::ApplianceDefinition;
use crate::error::{CalcError, Result};

/// Maximum hours in a day an appliance can run.
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// One user-declared appliance usage.
///
/// Fields are private so every instance satisfies `watts > 0`,
/// `0 < hours_per_day <= 24` and `quantity >= 1`; deserialization goes
/// through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct ApplianceEntry {
    key: String,
    name: String,
    watts: f64,
    hours_per_day: f64,
    quantity: u32,
}

#[derive(Deserialize)]
struct RawEntry {
    key: String,
    name: String,
    watts: f64,
    hours_per_day: f64,
    quantity: u32,
}

impl TryFrom<RawEntry> for ApplianceEntry {
    type Error = CalcError;

    fn try_from(raw: RawEntry) -> Result<Self> {
        ApplianceEntry::new(raw.key, raw.name, raw.watts, raw.hours_per_day, raw.quantity)
    }
}

/// Partial change to an entry; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct EntryUpdate {
    pub watts: Option<f64>,
    pub hours_per_day: Option<f64>,
    pub quantity: Option<u32>,
}

pub(crate) fn check_watts(watts: f64) -> Result<f64> {
    if watts.is_finite() && watts > 0.0 {
        Ok(watts)
    } else {
        Err(CalcError::InvalidWatts(watts))
    }
}

pub(crate) fn check_hours(hours: f64) -> Result<f64> {
    if hours > 0.0 && hours <= MAX_HOURS_PER_DAY {
        Ok(hours)
    } else {
        Err(CalcError::InvalidHours(hours))
    }
}

fn check_quantity(quantity: u32) -> Result<u32> {
    if quantity >= 1 {
        Ok(quantity)
    } else {
        Err(CalcError::InvalidQuantity(quantity))
    }
}

impl ApplianceEntry {
    /// Creates an entry after validating power, hours and quantity.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a [`CalcError`].
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        watts: f64,
        hours_per_day: f64,
        quantity: u32,
    ) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            name: name.into(),
            watts: check_watts(watts)?,
            hours_per_day: check_hours(hours_per_day)?,
            quantity: check_quantity(quantity)?,
        })
    }

    /// Creates an entry copying the catalog name and rated power.
    ///
    /// # Errors
    ///
    /// Returns a [`CalcError`] if `hours_per_day` or `quantity` is invalid.
    pub fn from_definition(
        def: &ApplianceDefinition,
        hours_per_day: f64,
        quantity: u32,
    ) -> Result<Self> {
        Self::new(&def.id, &def.name, def.watts, hours_per_day, quantity)
    }

    /// Catalog identifier this entry was created from.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn watts(&self) -> f64 {
        self.watts
    }

    pub fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Monthly energy for this entry (kWh).
    pub fn monthly_kwh(&self) -> f64 {
        monthly_kwh(self.watts, self.hours_per_day, self.quantity)
    }

    /// Applies `update` atomically: either every field changes or none does.
    ///
    /// # Errors
    ///
    /// Returns a [`CalcError`] for the first invalid field.
    pub fn apply(&mut self, update: EntryUpdate) -> Result<()> {
        let watts = update.watts.map(check_watts).transpose()?;
        let hours = update.hours_per_day.map(check_hours).transpose()?;
        let quantity = update.quantity.map(check_quantity).transpose()?;

        if let Some(w) = watts {
            self.watts = w;
        }
        if let Some(h) = hours {
            self.hours_per_day = h;
        }
        if let Some(q) = quantity {
            self.quantity = q;
        }
        Ok(())
    }
}
