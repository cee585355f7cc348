use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::selection::{InputSelection, Subject, UploadedFile, Variant};
use crate::sessions::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub variant: Variant,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

/// File metadata only; uploaded bytes never leave the server again.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileView {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
}

impl From<&UploadedFile> for FileView {
    fn from(file: &UploadedFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub variant: Variant,
    pub tab: &'static str,
    pub file: Option<FileView>,
    pub url: Option<String>,
    pub text: Option<String>,
}

impl SelectionView {
    fn new(subject: Subject, selection: &InputSelection) -> Self {
        Self {
            variant: selection.variant(),
            tab: subject.tab_id(selection.variant()),
            file: selection.file().map(FileView::from),
            url: selection.url().map(String::from),
            text: selection.text().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub resume: SelectionView,
    pub job: SelectionView,
    pub status: &'static str,
    pub busy: bool,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let form = session.coordinator.form();
        let state = session.coordinator.state();
        Self {
            session_id: session.id,
            resume: SelectionView::new(Subject::Resume, form.selection(Subject::Resume)),
            job: SelectionView::new(Subject::Job, form.selection(Subject::Job)),
            status: state.status(),
            busy: state.is_busy(),
            result: state.result().map(String::from),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
