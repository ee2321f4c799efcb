//! Field and file rules for the application form.
//!
//! Every check is a pure function of the entered value and returns the
//! message to show next to the field when it fails. [`validate_form`] runs
//! them all and reports every failure at once.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::form::ApplicationForm;
use crate::record::WorkType;

/// Largest resume accepted, in bytes (5 MiB).
pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for the resume: PDF, DOC and DOCX.
pub const ALLOWED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const MAX_EMAIL_LEN: usize = 254;

const VALID_EXTENSIONS: &[&str] = &[
    "com", "org", "net", "edu", "gov", "mil", "es", "mx", "co", "info", "biz",
];

/// Mistyped mail domains seen at the fair, with the domain that was meant.
const DOMAIN_TYPOS: &[(&str, &str)] = &[
    ("gmauil.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("gmial.com", "gmail.com"),
    ("gmaul.com", "gmail.com"),
    ("hotmial.com", "hotmail.com"),
    ("hotmeil.com", "hotmail.com"),
    ("yahooo.com", "yahoo.com"),
    ("yaho.com", "yahoo.com"),
    ("outlok.com", "outlook.com"),
    ("outloook.com", "outlook.com"),
];

pub const MSG_REQUIRED: &str = "Este campo es obligatorio";
pub const MSG_EMAIL: &str =
    "Por favor ingresa un correo electrónico válido (ejemplo: usuario@gmail.com)";
pub const MSG_EMAIL_TOO_LONG: &str = "El correo electrónico es demasiado largo";
pub const MSG_EMAIL_SPACES: &str = "El correo electrónico no puede contener espacios";
pub const MSG_EMAIL_DOMAIN: &str = "El correo debe tener un dominio válido (ej: @gmail.com)";
pub const MSG_EMAIL_EXTENSION_SHORT: &str =
    "El dominio debe tener una extensión válida (ej: .com, .org)";
pub const MSG_EMAIL_EXTENSION: &str =
    "Verifica que la extensión del dominio sea correcta (.com, .org, .net, etc.)";
pub const MSG_EMAIL_DOUBLED: &str = "El correo contiene caracteres duplicados no válidos";
pub const MSG_PHONE: &str = "Por favor ingresa un número de teléfono válido";
pub const MSG_NAME: &str = "El nombre debe contener al menos 2 caracteres y solo letras";
pub const MSG_WORK_TYPE: &str = "Selecciona una opción de trabajo";
pub const MSG_RESUME_REQUIRED: &str = "Debes subir tu resume";

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9\s()-]{10,}$").unwrap();
    static ref NAME_REGEX: Regex = Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]{2,}$").unwrap();
}

/// Outcome of a single field check: `Err` carries the message to display.
pub type Check = Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    Phone,
    WorkType,
    Resume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Why a resume file was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResumeFileError {
    #[error("Solo se permiten archivos PDF, DOC o DOCX")]
    UnsupportedType,
    #[error("El archivo no debe superar los 5MB")]
    TooLarge,
}

pub fn validate_required(value: &str) -> Check {
    if value.trim().is_empty() {
        return Err(MSG_REQUIRED.to_string());
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Check {
    let value = value.trim();
    validate_required(value)?;

    if value.len() > MAX_EMAIL_LEN {
        return Err(MSG_EMAIL_TOO_LONG.to_string());
    }
    if value.chars().any(char::is_whitespace) {
        return Err(MSG_EMAIL_SPACES.to_string());
    }
    if !EMAIL_REGEX.is_match(value) {
        return Err(MSG_EMAIL.to_string());
    }

    let (at, last_dot) = match (value.find('@'), value.rfind('.')) {
        (Some(at), Some(dot)) if dot > at => (at, dot),
        _ => return Err(MSG_EMAIL_DOMAIN.to_string()),
    };

    let extension = &value[last_dot + 1..];
    if extension.chars().count() < 2 {
        return Err(MSG_EMAIL_EXTENSION_SHORT.to_string());
    }

    if let Some(meant) = suggest_domain(&value[at + 1..]) {
        return Err(format!(
            "¿Quisiste decir \"{meant}\"? Verifica la escritura del dominio"
        ));
    }

    if !VALID_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        return Err(MSG_EMAIL_EXTENSION.to_string());
    }

    if value.contains("..") || value.contains("@@") || value.contains("--") {
        return Err(MSG_EMAIL_DOUBLED.to_string());
    }

    Ok(())
}

/// Returns the domain the applicant most likely meant when `domain` looks like
/// a known misspelling. Accepts either a bare domain or a full address.
///
/// Every label of the domain is checked for the misspelled label (`gmial`),
/// so `gmial.es` and `correo.gmial.com` are caught as well. A domain that
/// already contains a correct provider label is never flagged.
pub fn suggest_domain(domain: &str) -> Option<&'static str> {
    let domain = match domain.rfind('@') {
        Some(at) => &domain[at + 1..],
        None => domain,
    }
    .to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();

    let is_known_good = DOMAIN_TYPOS.iter().any(|(_, meant)| {
        let good_label = meant.split('.').next().unwrap_or_default();
        labels.contains(&good_label)
    });
    if is_known_good {
        return None;
    }

    DOMAIN_TYPOS
        .iter()
        .find(|(wrong, _)| {
            let wrong_label = wrong.split('.').next().unwrap_or_default();
            domain.contains(wrong) || labels.iter().any(|label| label.contains(wrong_label))
        })
        .map(|(_, meant)| *meant)
}

/// Phone is optional; when given it must be at least 10 characters of digits,
/// spaces, parentheses and hyphens with an optional leading `+`.
pub fn validate_phone(value: &str) -> Check {
    let value = value.trim();
    if value.is_empty() || PHONE_REGEX.is_match(value) {
        return Ok(());
    }
    Err(MSG_PHONE.to_string())
}

pub fn validate_name(value: &str) -> Check {
    let value = value.trim();
    validate_required(value)?;
    if !NAME_REGEX.is_match(value) {
        return Err(MSG_NAME.to_string());
    }
    Ok(())
}

pub fn validate_work_type(selected: Option<&WorkType>) -> Check {
    match selected {
        Some(work_type) if work_type.is_selectable() => Ok(()),
        _ => Err(MSG_WORK_TYPE.to_string()),
    }
}

pub fn check_resume_type(content_type: &str) -> Result<(), ResumeFileError> {
    if ALLOWED_RESUME_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(ResumeFileError::UnsupportedType)
    }
}

pub fn check_resume_size(size: u64) -> Result<(), ResumeFileError> {
    if size > MAX_RESUME_BYTES {
        Err(ResumeFileError::TooLarge)
    } else {
        Ok(())
    }
}

/// Type is checked before size.
pub fn validate_resume(content_type: &str, size: u64) -> Result<(), ResumeFileError> {
    check_resume_type(content_type)?;
    check_resume_size(size)
}

/// Runs every field check and collects all failures.
pub fn validate_form(form: &ApplicationForm) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut record = |field: FormField, check: Check| {
        if let Err(message) = check {
            errors.push(FieldError { field, message });
        }
    };

    record(FormField::FullName, validate_name(&form.full_name));
    record(FormField::Email, validate_email(&form.email));
    record(FormField::Phone, validate_phone(&form.phone));
    record(
        FormField::WorkType,
        validate_work_type(form.work_type.as_ref()),
    );
    record(
        FormField::Resume,
        match &form.resume {
            Some(resume) => validate_resume(&resume.content_type, resume.size())
                .map_err(|e| e.to_string()),
            None => Err(MSG_RESUME_REQUIRED.to_string()),
        },
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
