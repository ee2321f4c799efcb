use std::path::Path;

use uuid::Uuid;

/// Used when nothing of the applicant's name survives sanitization.
const FALLBACK_BASE: &str = "Sin_Nombre";

const ACCENTED: &str = "áéíóúÁÉÍÓÚñÑ";

/// Reduces a full name to a filesystem-safe token: only ASCII letters, Spanish
/// accented letters and whitespace are kept, and each whitespace run becomes a
/// single underscore.
pub fn sanitize_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
                in_space = true;
            }
        } else if c.is_ascii_alphabetic() || ACCENTED.contains(c) {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Extension of the uploaded file including the dot, or empty when it has
/// none or it is not purely alphanumeric.
pub fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Final stored name: `<sanitized name>_<id><extension>`. The id keeps two
/// applicants with the same name from sharing a file.
pub fn resume_file_name(full_name: &str, original_name: &str, id: Uuid) -> String {
    let base = sanitize_name(full_name);
    let base = if base.trim_matches('_').is_empty() {
        FALLBACK_BASE
    } else {
        base.as_str()
    };
    format!("{base}_{}{}", id.simple(), extension_of(original_name))
}
