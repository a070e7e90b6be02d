//! Appliance catalog: identifier → name and rated power.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CalcError, Result};

/// Immutable catalog entry describing one kind of appliance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceDefinition {
    /// Stable identifier (e.g. `"led_bulb"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Rated power (W, > 0).
    pub watts: f64,
    /// Optional grouping label (e.g. `"Iluminación"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Source of appliance definitions by identifier.
pub trait CatalogProvider {
    /// Returns the definition for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownAppliance`] if no definition exists.
    fn appliance(&self, id: &str) -> Result<&ApplianceDefinition>;
}

/// Catalog built once from configuration; iteration follows table order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ApplianceDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from definitions. Later duplicates of an id are ignored;
    /// config validation rejects them before this point.
    pub fn new(definitions: Vec<ApplianceDefinition>) -> Self {
        let mut items = Vec::with_capacity(definitions.len());
        let mut index = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if index.contains_key(&def.id) {
                continue;
            }
            index.insert(def.id.clone(), items.len());
            items.push(def);
        }
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplianceDefinition> {
        self.items.iter()
    }
}

impl CatalogProvider for Catalog {
    fn appliance(&self, id: &str) -> Result<&ApplianceDefinition> {
        self.index
            .get(id)
            .map(|&i| &self.items[i])
            .ok_or_else(|| CalcError::UnknownAppliance(id.to_string()))
    }
}
