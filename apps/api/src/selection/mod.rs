//! Selection model: what the user has chosen for each subject.
//!
//! Each subject holds exactly one active variant. The variant *is* the
//! discriminator, so a subject can never carry a file and a url at once.
//! Switching variant replaces the whole selection, which clears the data
//! held by the other two.

pub mod form;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use form::TailorForm;

/// Extensions the file picker accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unsupported file '{file_name}': expected one of .pdf, .doc, .docx, .txt")]
    UnsupportedFile { file_name: String },
}

/// One of the two independent inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Resume,
    Job,
}

impl Subject {
    pub fn field_prefix(self) -> &'static str {
        match self {
            Subject::Resume => "resume",
            Subject::Job => "job",
        }
    }

    /// Tab id the browser uses for this subject/variant pair.
    pub fn tab_id(self, variant: Variant) -> &'static str {
        match (self, variant) {
            (Subject::Resume, Variant::Upload) => "resume-upload",
            (Subject::Resume, Variant::Url) => "resume-url",
            (Subject::Resume, Variant::Paste) => "resume-paste",
            (Subject::Job, Variant::Upload) => "jd-upload",
            (Subject::Job, Variant::Url) => "jd-url",
            (Subject::Job, Variant::Paste) => "jd-paste",
        }
    }
}

/// One of the three input representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Upload,
    Url,
    Paste,
}

/// A file received from the browser's file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Builds a file after checking its extension against [`ACCEPTED_EXTENSIONS`].
    /// A missing or unparsable content type falls back to `application/octet-stream`.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Bytes,
    ) -> Result<Self, SelectionError> {
        let file_name = file_name.into();
        if !has_accepted_extension(&file_name) {
            return Err(SelectionError::UnsupportedFile { file_name });
        }
        Ok(Self {
            file_name,
            content_type: content_type
                .filter(|ct| ct.parse::<mime::Mime>().is_ok())
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
            bytes,
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

fn has_accepted_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// The active input for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    Upload(Option<UploadedFile>),
    Url(String),
    Paste(String),
}

impl Default for InputSelection {
    fn default() -> Self {
        InputSelection::Upload(None)
    }
}

impl InputSelection {
    pub fn variant(&self) -> Variant {
        match self {
            InputSelection::Upload(_) => Variant::Upload,
            InputSelection::Url(_) => Variant::Url,
            InputSelection::Paste(_) => Variant::Paste,
        }
    }

    /// Switches tab. Choosing the active variant again keeps its data.
    pub fn select(&mut self, variant: Variant) {
        if self.variant() == variant {
            return;
        }
        *self = match variant {
            Variant::Upload => InputSelection::Upload(None),
            Variant::Url => InputSelection::Url(String::new()),
            Variant::Paste => InputSelection::Paste(String::new()),
        };
    }

    pub fn attach_file(&mut self, file: UploadedFile) {
        *self = InputSelection::Upload(Some(file));
    }

    /// Drops the chosen file but stays on the upload tab.
    pub fn remove_file(&mut self) {
        if let InputSelection::Upload(file) = self {
            *file = None;
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        *self = InputSelection::Url(url.into());
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = InputSelection::Paste(text.into());
    }

    /// Clipboard paste: appends to the pasted text, switching to the paste tab first.
    pub fn append_text(&mut self, text: &str) {
        self.select(Variant::Paste);
        if let InputSelection::Paste(current) = self {
            current.push_str(text);
        }
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        match self {
            InputSelection::Upload(file) => file.as_ref(),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            InputSelection::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            InputSelection::Paste(text) => Some(text),
            _ => None,
        }
    }
}
