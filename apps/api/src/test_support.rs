//! Helpers shared by route-level tests.

use std::path::Path;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use bytes::Bytes;
use tower::ServiceExt;

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ApplicationStore;

const BOUNDARY: &str = "----jobfair-test-boundary";

/// Hand-rolled multipart/form-data body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/submit-application")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// A complete, valid submission with a PDF resume.
pub fn submission(full_name: &str, work_type: &str, resume: &[u8]) -> MultipartBody {
    MultipartBody::new()
        .text("fullName", full_name)
        .text("email", "ana.perez@gmail.com")
        .text("phone", "55 1234 5678")
        .text("workType", work_type)
        .text("experiencias", "[]")
        .file("resume", "cv.pdf", "application/pdf", resume)
}

pub fn test_state(root: &Path) -> AppState {
    let store = ApplicationStore::new(root);
    store.init().unwrap();
    AppState {
        store,
        config: Config {
            port: 0,
            rust_log: "debug".to_string(),
            storage_root: root.to_path_buf(),
            static_dir: root.join("static"),
        },
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

/// Every regular file under `dir`, recursively.
pub fn files_under(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            found.extend(files_under(&path));
        } else {
            found.push(path);
        }
    }
    found
}
