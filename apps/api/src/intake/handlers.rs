use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use bytes::BytesMut;
use jobfair_core::validation::{check_resume_size, check_resume_type};
use jobfair_core::SubmissionReceipt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::intake::service::{submit_application, NewApplication, UploadedResume};
use crate::state::AppState;

/// POST /submit-application
///
/// multipart/form-data with `fullName`, `email`, `phone`, `workType`,
/// `experiencias` (JSON array string) and `resume` (file).
pub async fn handle_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionReceipt>, AppError> {
    let application = read_application(&mut multipart).await?;
    let receipt = submit_application(&state.store, application).await?;
    Ok(Json(receipt))
}

async fn read_application(multipart: &mut Multipart) -> Result<NewApplication, AppError> {
    let mut application = NewApplication::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullName" => application.full_name = field.text().await?,
            "email" => application.email = field.text().await?,
            "phone" => application.phone = Some(field.text().await?),
            "workType" => application.work_type = field.text().await?,
            "experiencias" => application.experiences = parse_experiences(&field.text().await?),
            "resume" => application.resume = read_resume(field).await?,
            _ => debug!("Ignoring unknown field: {name}"),
        }
    }

    Ok(application)
}

/// Reads the resume part, refusing a disallowed type before any byte is read
/// and an oversized file as soon as it crosses the limit.
async fn read_resume(mut field: Field<'_>) -> Result<Option<UploadedResume>, AppError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    if original_name.is_empty() {
        // browsers send an empty part when no file was picked
        return Ok(None);
    }

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    check_resume_type(&content_type)?;

    let mut bytes = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        check_resume_size((bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
    }

    Ok(Some(UploadedResume {
        original_name,
        content_type,
        bytes: bytes.freeze(),
    }))
}

/// Experience tags are passed through as-is; anything that is not a JSON
/// array is dropped.
fn parse_experiences(raw: &str) -> Vec<Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Ignoring malformed experiencias field: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_experiences_passthrough() {
        let parsed = parse_experiences(r#"["ventas", {"custom": true}, 3]"#);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], "ventas");
        assert_eq!(parsed[1]["custom"], true);
    }

    #[test]
    fn test_parse_experiences_tolerates_garbage() {
        assert!(parse_experiences("").is_empty());
        assert!(parse_experiences("[]").is_empty());
        assert!(parse_experiences("ventas").is_empty());
        assert!(parse_experiences(r#"{"a": 1}"#).is_empty());
    }
}
