use crate::selection::{InputSelection, Subject, UploadedFile};

/// What one subject contributes to the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectPayload {
    File(UploadedFile),
    Url(String),
    Text(String),
}

impl SubjectPayload {
    /// Multipart field name for this subject, e.g. `resume_file` or `job_text`.
    pub fn field_name(&self, subject: Subject) -> String {
        let suffix = match self {
            SubjectPayload::File(_) => "file",
            SubjectPayload::Url(_) => "url",
            SubjectPayload::Text(_) => "text",
        };
        format!("{}_{}", subject.field_prefix(), suffix)
    }
}

/// Exactly the fields written into one processing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub resume: SubjectPayload,
    pub job: SubjectPayload,
}

impl SubmissionPayload {
    pub fn subjects(&self) -> [(Subject, &SubjectPayload); 2] {
        [(Subject::Resume, &self.resume), (Subject::Job, &self.job)]
    }
}

pub fn build_payload(resume: &InputSelection, job: &InputSelection) -> SubmissionPayload {
    SubmissionPayload {
        resume: subject_payload(resume),
        job: subject_payload(job),
    }
}

/// Upload with a file → file. Url → url. Anything else, including the upload
/// tab with no file chosen, → text. The upload-without-file case lands on the
/// text field (empty), never on the url field.
fn subject_payload(selection: &InputSelection) -> SubjectPayload {
    match selection {
        InputSelection::Upload(Some(file)) => SubjectPayload::File(file.clone()),
        InputSelection::Url(url) => SubjectPayload::Url(url.clone()),
        InputSelection::Upload(None) => SubjectPayload::Text(String::new()),
        InputSelection::Paste(text) => SubjectPayload::Text(text.clone()),
    }
}
