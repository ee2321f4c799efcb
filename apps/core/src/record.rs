use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored in place of a phone number the applicant left blank.
pub const PHONE_NOT_PROVIDED: &str = "No proporcionado";

/// Engagement category an applicant signs up for.
///
/// Only `coop` and `part-time` can be picked on the form, but records written
/// by older deployments may carry anything, so unknown values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkType {
    Coop,
    PartTime,
    Other(String),
}

impl WorkType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "coop" => WorkType::Coop,
            "part-time" => WorkType::PartTime,
            other => WorkType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WorkType::Coop => "coop",
            WorkType::PartTime => "part-time",
            WorkType::Other(raw) => raw,
        }
    }

    /// Storage partition under `uploads/`. `None` means the uploads root.
    pub fn folder(&self) -> Option<&'static str> {
        match self {
            WorkType::Coop => Some("coop"),
            WorkType::PartTime => Some("part-time"),
            WorkType::Other(_) => None,
        }
    }

    /// Whether this is one of the options offered on the form.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, WorkType::Other(_))
    }
}

impl From<String> for WorkType {
    fn from(raw: String) -> Self {
        WorkType::parse(&raw)
    }
}

impl From<WorkType> for String {
    fn from(work_type: WorkType) -> Self {
        work_type.as_str().to_string()
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted submission as persisted in `applications.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub timestamp: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub work_type: WorkType,
    pub resume_file_name: String,
    pub resume_original_name: String,
    pub resume_size: u64,
    /// Experience tags ticked on the form, carried through untouched.
    #[serde(default, rename = "experiencias", skip_serializing_if = "Vec::is_empty")]
    pub experiences: Vec<Value>,
}

/// Body of `POST /submit-application` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
    pub application_id: usize,
}

/// Body of `GET /admin/applications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}
