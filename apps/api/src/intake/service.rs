use anyhow::Result;
use bytes::Bytes;
use chrono::Utc;
use jobfair_core::validation::validate_resume;
use jobfair_core::{ApplicationRecord, SubmissionReceipt, WorkType, PHONE_NOT_PROVIDED};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::naming::{extension_of, resume_file_name};
use crate::store::ApplicationStore;

pub const MSG_MISSING_FIELDS: &str = "Faltan campos obligatorios";
pub const MSG_RESUME_REQUIRED: &str = "El resume es obligatorio";
pub const MSG_SUBMITTED: &str = "Aplicación enviada exitosamente";

/// A decoded submission, before any check has run.
#[derive(Debug, Default)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub work_type: String,
    pub experiences: Vec<Value>,
    pub resume: Option<UploadedResume>,
}

#[derive(Debug)]
pub struct UploadedResume {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Validates and persists one application.
///
/// The resume is placed before the record is appended. If the append fails
/// the placed resume is removed again so no unrecorded file is left behind.
pub async fn submit_application(
    store: &ApplicationStore,
    application: NewApplication,
) -> Result<SubmissionReceipt, AppError> {
    let NewApplication {
        full_name,
        email,
        phone,
        work_type,
        experiences,
        resume,
    } = application;

    let (full_name, email, work_type) = (full_name.trim(), email.trim(), work_type.trim());
    if full_name.is_empty() || email.is_empty() || work_type.is_empty() {
        return Err(AppError::Validation(MSG_MISSING_FIELDS.to_string()));
    }
    let resume = resume.ok_or_else(|| AppError::Validation(MSG_RESUME_REQUIRED.to_string()))?;
    validate_resume(&resume.content_type, resume.bytes.len() as u64)?;

    let record = ApplicationRecord {
        timestamp: Utc::now(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PHONE_NOT_PROVIDED.to_string()),
        work_type: WorkType::parse(work_type),
        resume_file_name: resume_file_name(full_name, &resume.original_name, Uuid::new_v4()),
        resume_original_name: resume.original_name.clone(),
        resume_size: resume.bytes.len() as u64,
        experiences,
    };

    let store = store.clone();
    let file_name = record.resume_file_name.clone();
    let application_id =
        tokio::task::spawn_blocking(move || persist(&store, &resume.bytes, record))
            .await
            .map_err(anyhow::Error::from)??;

    info!("Application #{application_id} received, resume {file_name}");

    Ok(SubmissionReceipt {
        success: true,
        message: MSG_SUBMITTED.to_string(),
        application_id,
    })
}

fn persist(store: &ApplicationStore, bytes: &[u8], record: ApplicationRecord) -> Result<usize> {
    let staged = store.stage_resume(bytes, &extension_of(&record.resume_original_name))?;
    let placed = store.place_resume(staged, &record.work_type, &record.resume_file_name)?;

    match store.append(record) {
        Ok(id) => Ok(id),
        Err(e) => {
            if let Err(cleanup) = store.remove_resume(&placed) {
                error!("Orphaned resume left at {}: {cleanup:#}", placed.display());
            }
            Err(e)
        }
    }
}
