use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use jobfair_core::ApplicationList;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::state::AppState;

pub const MSG_FILE_NOT_FOUND: &str = "Archivo no encontrado";

/// GET /admin/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApplicationList>, AppError> {
    let store = state.store.clone();
    let applications = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(anyhow::Error::from)??;
    Ok(Json(ApplicationList { applications }))
}

/// GET /admin/download/:filename
///
/// Streams the named resume back as an attachment.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let store = state.store.clone();
    let lookup = filename.clone();
    let path = tokio::task::spawn_blocking(move || store.find_resume(&lookup))
        .await
        .map_err(anyhow::Error::from)??
        .ok_or_else(|| {
            debug!("No resume named {filename:?}");
            AppError::NotFound(MSG_FILE_NOT_FOUND.to_string())
        })?;

    let file = tokio::fs::File::open(&path).await?;
    info!("Serving resume {}", path.display());

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&filename)),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = FsPath::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition with an ASCII fallback name plus the exact
/// UTF-8 name (RFC 6266 / RFC 5987).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}
