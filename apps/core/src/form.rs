use crate::record::WorkType;

/// A resume picked on the form, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeAttachment {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Everything the applicant has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub work_type: Option<WorkType>,
    pub experiences: Vec<String>,
    pub resume: Option<ResumeAttachment>,
}

impl ApplicationForm {
    /// True when any field holds something worth warning about before discarding.
    pub fn has_data(&self) -> bool {
        !self.full_name.trim().is_empty()
            || !self.email.trim().is_empty()
            || !self.phone.trim().is_empty()
            || self.work_type.is_some()
            || !self.experiences.is_empty()
            || self.resume.is_some()
    }
}
