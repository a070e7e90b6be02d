//! In-memory document store standing in for the remote scenario database.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Scenario, ScenarioStore, StoredScenario, average_kwh, new_document_id, recent_for_owner};
use crate::catalog::RegionCode;
use crate::error::StoreError;
use crate::rut::Rut;

/// Document store held in memory. Identifiers come from a seedable RNG so
/// runs can be reproduced.
#[derive(Debug)]
pub struct MemoryStore {
    docs: Vec<StoredScenario>,
    rng: StdRng,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with OS-seeded identifiers.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Empty store with identifiers derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            docs: Vec::new(),
            rng,
            available: true,
        }
    }

    /// Simulates losing (or regaining) the connection to the store.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

impl ScenarioStore for MemoryStore {
    fn save(&mut self, owner: &Rut, scenario: &Scenario) -> Result<StoredScenario, StoreError> {
        self.ensure_available()?;
        let doc = StoredScenario {
            id: new_document_id(&mut self.rng),
            owner: owner.clone(),
            scenario: scenario.clone(),
        };
        debug!("memory store: saved {} for {}", doc.id, owner.as_str());
        self.docs.push(doc.clone());
        Ok(doc)
    }

    fn list(&self, owner: &Rut, limit: usize) -> Result<Vec<StoredScenario>, StoreError> {
        self.ensure_available()?;
        Ok(recent_for_owner(self.docs.iter(), owner, limit))
    }

    fn delete(&mut self, owner: &Rut, id: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        let pos = self
            .docs
            .iter()
            .position(|d| d.id == id && &d.owner == owner)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.docs.remove(pos);
        Ok(())
    }

    fn regional_average_kwh(&self, region: RegionCode) -> Result<Option<f64>, StoreError> {
        self.ensure_available()?;
        Ok(average_kwh(self.docs.iter(), region))
    }
}
