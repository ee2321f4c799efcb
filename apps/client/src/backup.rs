//! Mirrors the stored applications of a running server to local disk.
//!
//! A run writes one dated directory:
//!
//! ```text
//! <output>/<YYYY-MM-DD>/applications.json
//! <output>/<YYYY-MM-DD>/coop/<resume files>
//! <output>/<YYYY-MM-DD>/part-time/<resume files>
//! ```
//!
//! A resume that cannot be downloaded is logged and skipped. Only a failure
//! to fetch the application list aborts the run.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use jobfair_core::{ApplicationList, ApplicationRecord, WorkType};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{error, info, warn};

const SNAPSHOT_FILE: &str = "applications.json";
const COOP_DIR: &str = "coop";
const PART_TIME_DIR: &str = "part-time";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Server answered with status {0}")]
    Status(StatusCode),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed application list: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub directory: PathBuf,
    pub total: usize,
    pub downloaded: usize,
    /// Stored names of resumes that could not be fetched.
    pub failed: Vec<String>,
}

pub struct BackupJob {
    http: Client,
    base_url: Url,
    output_root: PathBuf,
}

impl BackupJob {
    pub fn new(base_url: &str, output_root: impl Into<PathBuf>) -> Result<Self, BackupError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackupError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackupError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            output_root: output_root.into(),
        })
    }

    /// Backs up into today's directory, using the local calendar date.
    pub async fn run(&self) -> Result<BackupReport, BackupError> {
        self.run_for(Local::now().date_naive()).await
    }

    pub async fn run_for(&self, date: NaiveDate) -> Result<BackupReport, BackupError> {
        let directory = self.output_root.join(date.format("%Y-%m-%d").to_string());
        info!("Backing up {} into {}", self.base_url, directory.display());

        let list_url = self.endpoint(&["admin", "applications"])?;
        let response = self.http.get(list_url).send().await?;
        if !response.status().is_success() {
            return Err(BackupError::Status(response.status()));
        }
        let raw: serde_json::Value = response.json().await?;

        tokio::fs::create_dir_all(&directory).await?;
        tokio::fs::write(
            directory.join(SNAPSHOT_FILE),
            serde_json::to_vec_pretty(&raw)?,
        )
        .await?;
        let list: ApplicationList = serde_json::from_value(raw)?;
        info!("Saved {} applications", list.applications.len());

        for dir in [COOP_DIR, PART_TIME_DIR] {
            tokio::fs::create_dir_all(directory.join(dir)).await?;
        }

        let mut report = BackupReport {
            directory,
            total: list.applications.len(),
            downloaded: 0,
            failed: Vec::new(),
        };

        for record in &list.applications {
            match self.download_resume(record, &report.directory).await {
                Ok(path) => {
                    report.downloaded += 1;
                    info!("Downloaded {}", path.display());
                }
                Err(e) => {
                    warn!("Could not back up {}: {e}", record.resume_file_name);
                    report.failed.push(record.resume_file_name.clone());
                }
            }
        }

        if report.failed.is_empty() {
            info!("Backup complete: {} resumes", report.downloaded);
        } else {
            error!(
                "Backup finished with {} of {} resumes missing",
                report.failed.len(),
                report.total
            );
        }
        Ok(report)
    }

    async fn download_resume(
        &self,
        record: &ApplicationRecord,
        directory: &Path,
    ) -> Result<PathBuf, BackupError> {
        // Stored names never contain separators; anything else is not written.
        let file_name = Path::new(&record.resume_file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| *name == record.resume_file_name)
            .ok_or_else(|| BackupError::InvalidUrl(record.resume_file_name.clone()))?;

        let url = self.endpoint(&["admin", "download", file_name])?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(BackupError::Status(response.status()));
        }
        let bytes = response.bytes().await?;

        let folder = match record.work_type {
            WorkType::Coop => COOP_DIR,
            _ => PART_TIME_DIR,
        };
        let target = directory.join(folder).join(file_name);
        tokio::fs::write(&target, &bytes).await?;
        Ok(target)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackupError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::Path as UrlPath,
        http::StatusCode as AxumStatus,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_server, DEAD_URL};

    fn listing() -> serde_json::Value {
        json!({
            "applications": [
                {
                    "timestamp": "2025-03-01T10:00:00Z",
                    "fullName": "Ana",
                    "email": "ana@gmail.com",
                    "phone": "No proporcionado",
                    "workType": "coop",
                    "resumeFileName": "Ana_1.pdf",
                    "resumeOriginalName": "cv.pdf",
                    "resumeSize": 3
                },
                {
                    "timestamp": "2025-03-01T10:05:00Z",
                    "fullName": "Beto",
                    "email": "beto@gmail.com",
                    "phone": "5512345678",
                    "workType": "part-time",
                    "resumeFileName": "Beto_2.pdf",
                    "resumeOriginalName": "cv.pdf",
                    "resumeSize": 4,
                    "experiencias": ["ventas"]
                },
                {
                    "timestamp": "2025-03-01T10:10:00Z",
                    "fullName": "Caro",
                    "email": "caro@gmail.com",
                    "phone": "No proporcionado",
                    "workType": "coop",
                    "resumeFileName": "Caro_3.pdf",
                    "resumeOriginalName": "cv.pdf",
                    "resumeSize": 5
                }
            ]
        })
    }

    async fn download(UrlPath(name): UrlPath<String>) -> impl IntoResponse {
        match name.as_str() {
            "Ana_1.pdf" => (AxumStatus::OK, b"ana".to_vec()),
            "Beto_2.pdf" => (AxumStatus::OK, b"beto".to_vec()),
            _ => (AxumStatus::NOT_FOUND, b"{}".to_vec()),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_backup_mirrors_applications() {
        let app = Router::new()
            .route("/admin/applications", get(|| async { Json(listing()) }))
            .route("/admin/download/:filename", get(download));
        let base = spawn_server(app).await;
        let out = tempfile::tempdir().unwrap();

        let report = BackupJob::new(&base, out.path())
            .unwrap()
            .run_for(date())
            .await
            .unwrap();

        let dir = out.path().join("2025-03-01");
        assert_eq!(report.directory, dir);
        assert_eq!(report.total, 3);
        assert_eq!(report.downloaded, 2);
        assert_eq!(report.failed, vec!["Caro_3.pdf".to_string()]);

        assert_eq!(std::fs::read(dir.join("coop/Ana_1.pdf")).unwrap(), b"ana");
        assert_eq!(std::fs::read(dir.join("part-time/Beto_2.pdf")).unwrap(), b"beto");
        assert!(!dir.join("coop/Caro_3.pdf").exists());

        let snapshot: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.join("applications.json")).unwrap())
                .unwrap();
        assert_eq!(snapshot, listing());
    }

    #[tokio::test]
    async fn test_base_path_is_kept() {
        let app = Router::new().nest(
            "/feria",
            Router::new()
                .route(
                    "/admin/applications",
                    get(|| async { Json(json!({ "applications": [] })) }),
                )
                .route("/admin/download/:filename", get(download)),
        );
        let base = spawn_server(app).await;
        let out = tempfile::tempdir().unwrap();

        let report = BackupJob::new(&format!("{base}/feria/"), out.path())
            .unwrap()
            .run_for(date())
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.directory.join("coop").is_dir());
        assert!(report.directory.join("part-time").is_dir());
    }

    #[tokio::test]
    async fn test_list_failure_aborts() {
        let app = Router::new().route(
            "/admin/applications",
            get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_server(app).await;
        let out = tempfile::tempdir().unwrap();

        let err = BackupJob::new(&base, out.path())
            .unwrap()
            .run_for(date())
            .await
            .unwrap_err();
        assert!(matches!(err, BackupError::Status(s) if s.as_u16() == 500));
        assert!(!out.path().join("2025-03-01").exists());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let out = tempfile::tempdir().unwrap();
        let err = BackupJob::new(DEAD_URL, out.path())
            .unwrap()
            .run_for(date())
            .await
            .unwrap_err();
        assert!(matches!(err, BackupError::Fetch(_)));
        assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_rejects_unusable_url() {
        assert!(matches!(
            BackupJob::new("not a url", "backup"),
            Err(BackupError::InvalidUrl(_))
        ));
        assert!(matches!(
            BackupJob::new("mailto:admin@example.com", "backup"),
            Err(BackupError::InvalidUrl(_))
        ));
    }
}
