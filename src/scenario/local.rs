//! Scenario store persisted as a JSON array on local disk.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Scenario, ScenarioStore, StoredScenario, average_kwh, new_document_id, recent_for_owner};
use crate::catalog::RegionCode;
use crate::error::StoreError;
use crate::rut::Rut;

/// Local mirror of saved scenarios. The whole file is read on every
/// operation and rewritten on every change; a missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    rng: StdRng,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<StoredScenario>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Sibling file the next snapshot is written to before replacing `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("scenarios.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replaces the file contents; a failed write leaves the old file intact.
    fn write(&self, docs: &[StoredScenario]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        {
            let mut writer = BufWriter::new(File::create(&staging)?);
            serde_json::to_writer_pretty(&mut writer, docs)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl ScenarioStore for JsonFileStore {
    fn save(&mut self, owner: &Rut, scenario: &Scenario) -> Result<StoredScenario, StoreError> {
        let mut docs = self.load()?;
        let doc = StoredScenario {
            id: new_document_id(&mut self.rng),
            owner: owner.clone(),
            scenario: scenario.clone(),
        };
        docs.push(doc.clone());
        self.write(&docs)?;
        debug!("saved scenario {} to {}", doc.id, self.path.display());
        Ok(doc)
    }

    fn list(&self, owner: &Rut, limit: usize) -> Result<Vec<StoredScenario>, StoreError> {
        Ok(recent_for_owner(self.load()?.iter(), owner, limit))
    }

    fn delete(&mut self, owner: &Rut, id: &str) -> Result<(), StoreError> {
        let mut docs = self.load()?;
        let before = docs.len();
        docs.retain(|d| !(d.id == id && &d.owner == owner));
        if docs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write(&docs)
    }

    fn regional_average_kwh(&self, region: RegionCode) -> Result<Option<f64>, StoreError> {
        Ok(average_kwh(self.load()?.iter(), region))
    }
}
