//! State behind the registration form.
//!
//! The form contents, the field errors currently shown and which panel is
//! visible all live in one [`FormSession`] owned by the caller.

use std::time::Duration;

use jobfair_core::validation::{
    validate_email, validate_form, validate_name, validate_phone, validate_resume,
    validate_work_type, FieldError, FormField, MSG_RESUME_REQUIRED,
};
use jobfair_core::{ApplicationForm, SubmissionReceipt};
use tracing::info;

use crate::submit::{SubmissionClient, SubmitError};

/// How long the confirmation panel stays up before offering a new entry.
pub const NEW_ENTRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormView {
    #[default]
    Editing,
    Confirmation,
}

#[derive(Debug, Default)]
pub struct FormSession {
    form: ApplicationForm,
    view: FormView,
    errors: Vec<FieldError>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ApplicationForm {
        &mut self.form
    }

    pub fn view(&self) -> FormView {
        self.view
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Re-runs every check. Returns `true` when the form can be sent.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(&self.form).err().unwrap_or_default();
        self.errors.is_empty()
    }

    /// Re-checks a single field, as when it loses focus.
    pub fn validate_field(&mut self, field: FormField) -> bool {
        let check = match field {
            FormField::FullName => validate_name(&self.form.full_name),
            FormField::Email => validate_email(&self.form.email),
            FormField::Phone => validate_phone(&self.form.phone),
            FormField::WorkType => validate_work_type(self.form.work_type.as_ref()),
            FormField::Resume => match &self.form.resume {
                Some(resume) => validate_resume(&resume.content_type, resume.size())
                    .map_err(|e| e.to_string()),
                None => Err(MSG_RESUME_REQUIRED.to_string()),
            },
        };

        self.errors.retain(|e| e.field != field);
        match check {
            Ok(()) => true,
            Err(message) => {
                self.errors.push(FieldError { field, message });
                false
            }
        }
    }

    /// Sends the form and switches to the confirmation panel on success.
    pub async fn submit(
        &mut self,
        client: &SubmissionClient,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let receipt = client.submit(&self.form).await?;
        self.mark_submitted();
        Ok(receipt)
    }

    pub fn mark_submitted(&mut self) {
        self.view = FormView::Confirmation;
        self.errors.clear();
    }

    /// Waits `delay`, then asks through `confirm` whether to register another
    /// participant. Resets the session when the answer is yes.
    pub async fn offer_new_entry<F>(&mut self, delay: Duration, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        tokio::time::sleep(delay).await;
        if self.view != FormView::Confirmation || !confirm() {
            return false;
        }
        self.reset();
        info!("Form reset for a new participant");
        true
    }

    /// Empties the form after `confirm` agrees. The visible panel is kept.
    pub fn clear<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return false;
        }
        self.form = ApplicationForm::default();
        self.errors.clear();
        true
    }

    /// Back to an empty form in the editing panel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
