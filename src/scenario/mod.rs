//! Scenario snapshots and the stores that persist them.

/// JSON-file store mirroring scenarios on local disk.
pub mod local;
/// In-memory document store.
pub mod memory;
/// Local-first save with optional remote sync.
pub mod sync;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};

use crate::calc::{ApplianceEntry, Totals};
use crate::catalog::RegionCode;
use crate::error::StoreError;
use crate::rut::Rut;

pub use local::JsonFileStore;
pub use memory::MemoryStore;
pub use sync::{RemoteStatus, ScenarioSync, SyncReport};

/// Length of generated document identifiers.
pub const ID_LEN: usize = 20;

/// A named, timestamped snapshot of an entry list and its monthly totals.
///
/// Never updated after creation; only deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub region: RegionCode,
    pub entries: Vec<ApplianceEntry>,
    /// Monthly totals at the time of the snapshot.
    pub totals: Totals,
    pub created_at: DateTime<Utc>,
}

/// A scenario with the identity assigned by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScenario {
    pub id: String,
    pub owner: Rut,
    #[serde(flatten)]
    pub scenario: Scenario,
}

/// Persistence collaborator for scenarios, keyed by owner RUT.
pub trait ScenarioStore {
    /// Stores `scenario` for `owner` and returns it with its new identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot persist the document.
    fn save(&mut self, owner: &Rut, scenario: &Scenario) -> Result<StoredScenario, StoreError>;

    /// At most `limit` scenarios of `owner`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn list(&self, owner: &Rut, limit: usize) -> Result<Vec<StoredScenario>, StoreError>;

    /// Deletes scenario `id` of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the owner has no such scenario.
    fn delete(&mut self, owner: &Rut, id: &str) -> Result<(), StoreError>;

    /// Mean monthly kWh over every owner's scenarios in `region`, or `None`
    /// when there are none.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn regional_average_kwh(&self, region: RegionCode) -> Result<Option<f64>, StoreError>;
}

/// Random alphanumeric document identifier.
pub fn new_document_id(rng: &mut impl Rng) -> String {
    Alphanumeric.sample_string(rng, ID_LEN)
}

/// Scenarios of `owner`, newest first, truncated to `limit`.
pub(crate) fn recent_for_owner<'a>(
    docs: impl Iterator<Item = &'a StoredScenario>,
    owner: &Rut,
    limit: usize,
) -> Vec<StoredScenario> {
    let mut mine: Vec<StoredScenario> = docs.filter(|d| &d.owner == owner).cloned().collect();
    mine.sort_by(|a, b| b.scenario.created_at.cmp(&a.scenario.created_at));
    mine.truncate(limit);
    mine
}

/// Mean of `totals.kwh` over scenarios in `region`.
pub(crate) fn average_kwh<'a>(
    docs: impl Iterator<Item = &'a StoredScenario>,
    region: RegionCode,
) -> Option<f64> {
    let (sum, count) = docs
        .filter(|d| d.scenario.region == region)
        .fold((0.0_f64, 0_usize), |(s, n), d| (s + d.scenario.totals.kwh, n + 1));
    (count > 0).then(|| sum / count as f64)
}
