//! Flat-file application store.
//!
//! Layout under the storage root:
//!
//! ```text
//! applications.json        JSON array of ApplicationRecord
//! uploads/                 catch-all folder
//! uploads/coop/
//! uploads/part-time/
//! uploads/staging/         uploads in flight, never served
//! ```
//!
//! Blocking filesystem work lives here; async callers go through
//! `tokio::task::spawn_blocking`.

mod records;
mod resumes;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use jobfair_core::WorkType;

pub use resumes::StagedResume;

pub const APPLICATIONS_FILE: &str = "applications.json";
pub const UPLOADS_DIR: &str = "uploads";
pub const STAGING_DIR: &str = "staging";

#[derive(Clone)]
pub struct ApplicationStore {
    root: PathBuf,
    uploads: PathBuf,
    /// Serializes read-modify-write cycles on `applications.json`.
    write_lock: Arc<Mutex<()>>,
}

impl ApplicationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let uploads = root.join(UPLOADS_DIR);
        Self {
            root,
            uploads,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates the uploads tree if any part of it is missing.
    pub fn init(&self) -> Result<()> {
        for dir in [
            self.uploads.clone(),
            self.staging_dir(),
            self.category_dir(&WorkType::Coop),
            self.category_dir(&WorkType::PartTime),
        ] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn applications_file(&self) -> PathBuf {
        self.root.join(APPLICATIONS_FILE)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.uploads.join(STAGING_DIR)
    }

    /// Folder a resume of this work type is stored in.
    pub fn category_dir(&self, work_type: &WorkType) -> PathBuf {
        match work_type.folder() {
            Some(folder) => self.uploads.join(folder),
            None => self.uploads.clone(),
        }
    }
}
