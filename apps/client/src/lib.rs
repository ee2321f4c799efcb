//! Clients of the intake server: the form submission path used by the
//! registration kiosk and the backup job that mirrors stored applications.

pub mod backup;
pub mod session;
pub mod submit;
#[cfg(test)]
mod test_support;

pub use backup::{BackupError, BackupJob, BackupReport};
pub use session::{FormSession, FormView};
pub use submit::{SubmissionClient, SubmitError};
