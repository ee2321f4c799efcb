use std::time::Duration;

use jobfair_core::{ApplicationForm, ErrorBody, ResumeAttachment, SubmissionReceipt};
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use thiserror::Error;
use tracing::{debug, warn};

const SUBMIT_PATH: &str = "/submit-application";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const USER_MESSAGE_PREFIX: &str = "Hubo un error al enviar tu aplicación. ";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("El nombre completo es obligatorio")]
    MissingFullName,

    #[error("El correo electrónico es obligatorio")]
    MissingEmail,

    #[error("Debes seleccionar un tipo de trabajo")]
    MissingWorkType,

    #[error("Debes subir tu resume")]
    MissingResume,

    #[error("Invalid resume content type: {0}")]
    InvalidResume(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl SubmitError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE => SubmitError::PayloadTooLarge(message),
            StatusCode::BAD_REQUEST => SubmitError::BadRequest(message),
            _ => SubmitError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Text to show the applicant.
    pub fn user_message(&self) -> String {
        let detail = match self {
            SubmitError::Network(_) => {
                "Verifica tu conexión a internet y que el servidor esté funcionando.".to_string()
            }
            SubmitError::PayloadTooLarge(_) => {
                "El archivo es demasiado grande. Máximo 5MB.".to_string()
            }
            SubmitError::BadRequest(_) => "Datos inválidos. Verifica todos los campos.".to_string(),
            SubmitError::Server { message, .. } if !message.is_empty() => message.clone(),
            SubmitError::Server { .. } | SubmitError::Decode(_) | SubmitError::InvalidResume(_) => {
                "Por favor intenta nuevamente.".to_string()
            }
            missing => missing.to_string(),
        };
        format!("{USER_MESSAGE_PREFIX}{detail}")
    }
}

/// Posts application forms to the intake server.
#[derive(Clone)]
pub struct SubmissionClient {
    http: Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends `form` as multipart/form-data.
    ///
    /// The required fields are checked again here and the first missing one
    /// aborts before anything goes over the network.
    pub async fn submit(&self, form: &ApplicationForm) -> Result<SubmissionReceipt, SubmitError> {
        let resume = check_preconditions(form)?;
        let payload = build_payload(form, resume)?;

        debug!("Submitting application for {}", form.full_name.trim());
        let response = self
            .http
            .post(format!("{}{SUBMIT_PATH}", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .multipart(payload)
            .send()
            .await
            .map_err(SubmitError::Network)?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(SubmitError::Decode);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "Error desconocido".to_string());
        warn!("Submission rejected with {status}: {message}");
        Err(SubmitError::from_status(status, message))
    }
}

fn check_preconditions(form: &ApplicationForm) -> Result<&ResumeAttachment, SubmitError> {
    if form.full_name.trim().is_empty() {
        return Err(SubmitError::MissingFullName);
    }
    if form.email.trim().is_empty() {
        return Err(SubmitError::MissingEmail);
    }
    if form.work_type.is_none() {
        return Err(SubmitError::MissingWorkType);
    }
    form.resume.as_ref().ok_or(SubmitError::MissingResume)
}

fn build_payload(form: &ApplicationForm, resume: &ResumeAttachment) -> Result<Form, SubmitError> {
    let work_type = form
        .work_type
        .as_ref()
        .map(|w| w.as_str().to_string())
        .unwrap_or_default();
    let experiences = serde_json::Value::from(form.experiences.clone()).to_string();

    let file = Part::bytes(resume.bytes.clone())
        .file_name(resume.file_name.clone())
        .mime_str(&resume.content_type)
        .map_err(SubmitError::InvalidResume)?;

    Ok(Form::new()
        .text("fullName", form.full_name.clone())
        .text("email", form.email.clone())
        .text("phone", form.phone.clone())
        .text("workType", work_type)
        .text("experiencias", experiences)
        .part("resume", file))
}
