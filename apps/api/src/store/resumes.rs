use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use jobfair_core::WorkType;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::ApplicationStore;

/// A resume written to the staging area and not yet placed.
/// Dropping it deletes the staging file.
pub struct StagedResume {
    file: NamedTempFile,
}

impl StagedResume {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl ApplicationStore {
    /// Writes an accepted upload to `uploads/staging/temp_<millis>_*<extension>`.
    pub fn stage_resume(&self, bytes: &[u8], extension: &str) -> Result<StagedResume> {
        let staging = self.staging_dir();
        std::fs::create_dir_all(&staging)
            .with_context(|| format!("Failed to create {}", staging.display()))?;

        let prefix = format!("temp_{}_", Utc::now().timestamp_millis());
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(extension)
            .tempfile_in(&staging)
            .with_context(|| format!("Failed to stage upload in {}", staging.display()))?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        debug!("Staged upload at {}", file.path().display());
        Ok(StagedResume { file })
    }

    /// Moves a staged resume into the folder for `work_type` as `file_name`.
    ///
    /// Never overwrites an existing file. When the rename fails for any other
    /// reason the content is copied instead and the staging file removed.
    pub fn place_resume(
        &self,
        staged: StagedResume,
        work_type: &WorkType,
        file_name: &str,
    ) -> Result<PathBuf> {
        let dir = self.category_dir(work_type);
        if !dir.is_dir() {
            info!("Creating destination folder {}", dir.display());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let destination = dir.join(file_name);
        debug!(
            "Moving {} -> {}",
            staged.path().display(),
            destination.display()
        );

        match staged.file.persist_noclobber(&destination) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                return Err(anyhow!("{} already exists", destination.display()));
            }
            Err(e) => {
                warn!(
                    "Rename into {} failed ({}), copying instead",
                    destination.display(),
                    e.error
                );
                copy_new(e.file.path(), &destination)?;
                // e.file is dropped here, which removes the staging copy
            }
        }

        info!("Resume stored at {}", destination.display());
        Ok(destination)
    }

    pub fn remove_resume(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))
    }

    /// Finds a stored resume by exact name, looking in `part-time/`, then
    /// `coop/`, then the uploads root.
    ///
    /// Names that are not a single plain path component never match, and a
    /// match must resolve to a location inside the uploads tree. Staged
    /// uploads are never found.
    pub fn find_resume(&self, file_name: &str) -> Result<Option<PathBuf>> {
        if !is_plain_file_name(file_name) {
            debug!("Rejected resume lookup for {file_name:?}");
            return Ok(None);
        }

        let root = self
            .uploads
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", self.uploads.display()))?;

        for dir in [
            self.category_dir(&WorkType::PartTime),
            self.category_dir(&WorkType::Coop),
            self.uploads.clone(),
        ] {
            let candidate = dir.join(file_name);
            if !candidate.is_file() {
                continue;
            }
            let resolved = candidate.canonicalize()?;
            if resolved.starts_with(&root) {
                return Ok(Some(resolved));
            }
            warn!("{} resolves outside the uploads tree", candidate.display());
        }

        Ok(None)
    }
}

fn copy_new(from: &Path, to: &Path) -> Result<()> {
    let mut source = File::open(from)?;
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .with_context(|| format!("Failed to create {}", to.display()))?;
    io::copy(&mut source, &mut target)?;
    target.sync_all()?;
    Ok(())
}

fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
