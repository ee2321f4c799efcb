use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use jobfair_core::ApplicationRecord;
use tempfile::NamedTempFile;
use tracing::debug;

use super::ApplicationStore;

impl ApplicationStore {
    /// All records in submission order. A missing file is an empty store.
    pub fn list(&self) -> Result<Vec<ApplicationRecord>> {
        read_records(&self.applications_file())
    }

    /// Appends `record` and returns its 1-based position.
    ///
    /// The whole array is rewritten into a temp file next to
    /// `applications.json` and renamed over it, so readers only ever see a
    /// complete file.
    pub fn append(&self, record: ApplicationRecord) -> Result<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Application store lock poisoned"))?;

        let path = self.applications_file();
        let mut records = read_records(&path)?;
        records.push(record);

        let mut tmp = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("Failed to create temp file in {}", self.root.display()))?;
        serde_json::to_writer_pretty(&mut tmp, &records)
            .context("Failed to serialize applications")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Application store now holds {} records", records.len());
        Ok(records.len())
    }
}

fn read_records(path: &Path) -> Result<Vec<ApplicationRecord>> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("{} is not a valid application list", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}
