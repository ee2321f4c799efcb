//! Types and rules shared by the intake server and its clients.

pub mod form;
pub mod record;
pub mod validation;

pub use form::{ApplicationForm, ResumeAttachment};
pub use record::{
    ApplicationList, ApplicationRecord, ErrorBody, SubmissionReceipt, WorkType, PHONE_NOT_PROVIDED,
};
