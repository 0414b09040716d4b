use std::fmt;

use super::document_id::DocumentId;
use super::storage_path::StoragePath;

const WORD_DOCUMENT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A study document staged for the lifetime of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub id: DocumentId,
    pub filename: String,
    pub media_type: MediaType,
    pub size_bytes: u64,
    pub storage_path: StoragePath,
}

impl UploadedDocument {
    pub fn new(id: DocumentId, filename: String, media_type: MediaType, size_bytes: u64) -> Self {
        Self {
            id,
            filename,
            media_type,
            size_bytes,
            storage_path: StoragePath::new(&id),
        }
    }
}

/// Declared media type of an upload.
///
/// Only `Pdf` and `PlainText` have extractors. `WordDocument` is recognised so
/// the caller gets a specific message, but it is rejected like any other
/// unsupported type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    Pdf,
    PlainText,
    WordDocument,
    Unsupported(String),
}

impl MediaType {
    /// Parses a `Content-Type` value, ignoring parameters and case.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "text/plain" => Self::PlainText,
            WORD_DOCUMENT_MIME => Self::WordDocument,
            _ => Self::Unsupported(essence),
        }
    }

    pub fn as_mime(&self) -> &str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
            Self::WordDocument => WORD_DOCUMENT_MIME,
            Self::Unsupported(mime) => mime,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Pdf | Self::PlainText)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}
