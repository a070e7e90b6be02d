//! Local-first scenario saving with best-effort remote sync.

use log::{info, warn};
use serde::Serialize;

use super::{Scenario, ScenarioStore, StoredScenario};
use crate::catalog::RegionCode;
use crate::error::StoreError;
use crate::rut::Rut;

/// What happened to the remote copy of a saved scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RemoteStatus {
    /// No remote store configured.
    Disabled,
    /// Saved remotely under this identifier.
    Synced(String),
    /// Remote save failed; the local copy is still intact.
    Failed(String),
}

/// Result of [`ScenarioSync::save`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// The locally stored document.
    pub local: StoredScenario,
    pub remote: RemoteStatus,
}

/// Saves to a local store first, then mirrors to an optional remote.
///
/// A remote failure never fails the save or touches the local copy.
#[derive(Debug)]
pub struct ScenarioSync<L, R> {
    local: L,
    remote: Option<R>,
}

impl<L: ScenarioStore, R: ScenarioStore> ScenarioSync<L, R> {
    pub fn new(local: L, remote: Option<R>) -> Self {
        Self { local, remote }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    /// Saves `scenario` locally, then attempts the remote store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] only if the local save fails.
    pub fn save(&mut self, owner: &Rut, scenario: &Scenario) -> Result<SyncReport, StoreError> {
        let local = self.local.save(owner, scenario)?;
        info!("scenario \"{}\" saved locally as {}", scenario.name, local.id);

        let remote = match self.remote.as_mut() {
            None => RemoteStatus::Disabled,
            Some(store) => match store.save(owner, scenario) {
                Ok(doc) => RemoteStatus::Synced(doc.id),
                Err(e) => {
                    warn!("could not sync scenario \"{}\": {e}", scenario.name);
                    RemoteStatus::Failed(e.to_string())
                }
            },
        };

        Ok(SyncReport { local, remote })
    }

    /// Lists from the local store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the local store cannot be read.
    pub fn list(&self, owner: &Rut, limit: usize) -> Result<Vec<StoredScenario>, StoreError> {
        self.local.list(owner, limit)
    }

    /// Cross-user regional average from the remote store; `None` when no
    /// remote is configured, it is unreachable, or it has no data.
    pub fn regional_average_kwh(&self, region: RegionCode) -> Option<f64> {
        let store = self.remote.as_ref()?;
        match store.regional_average_kwh(region) {
            Ok(avg) => avg,
            Err(e) => {
                warn!("could not fetch regional average for {region}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::MemoryStore;
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn without_remote_saves_locally() {
        let mut sync: ScenarioSync<MemoryStore, MemoryStore> =
            ScenarioSync::new(MemoryStore::with_seed(1), None);
        let report = sync
            .save(&owner(), &scenario("a", RegionCode::Metropolitana, 1.0, 1))
            .unwrap();
        assert_eq!(report.remote, RemoteStatus::Disabled);
        assert_eq!(sync.list(&owner(), 10).unwrap().len(), 1);
        assert_eq!(sync.regional_average_kwh(RegionCode::Metropolitana), None);
    }

    #[test]
    fn mirrors_to_remote() {
        let mut sync = ScenarioSync::new(MemoryStore::with_seed(1), Some(MemoryStore::with_seed(2)));
        let report = sync
            .save(&owner(), &scenario("a", RegionCode::Metropolitana, 80.0, 1))
            .unwrap();
        assert!(matches!(report.remote, RemoteStatus::Synced(_)));
        assert_eq!(sync.remote().map(MemoryStore::len), Some(1));
        assert_eq!(sync.regional_average_kwh(RegionCode::Metropolitana), Some(80.0));
    }

    #[test]
    fn remote_failure_keeps_local_copy() {
        let mut remote = MemoryStore::with_seed(2);
        remote.set_available(false);
        let mut sync = ScenarioSync::new(MemoryStore::with_seed(1), Some(remote));

        let report = sync
            .save(&owner(), &scenario("a", RegionCode::Metropolitana, 1.0, 1))
            .unwrap();
        assert!(matches!(report.remote, RemoteStatus::Failed(_)));
        assert_eq!(sync.local().len(), 1);
        assert_eq!(sync.list(&owner(), 10).unwrap()[0].id, report.local.id);
        assert_eq!(sync.regional_average_kwh(RegionCode::Metropolitana), None);
    }

    #[test]
    fn local_failure_is_an_error() {
        let mut local = MemoryStore::with_seed(1);
        local.set_available(false);
        let mut sync = ScenarioSync::new(local, Some(MemoryStore::with_seed(2)));
        let result = sync.save(&owner(), &scenario("a", RegionCode::Metropolitana, 1.0, 1));
        assert!(result.is_err());
        assert_eq!(sync.remote().map(MemoryStore::len), Some(0));
    }
}
