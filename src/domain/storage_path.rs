use std::fmt;

use super::document_id::DocumentId;

/// Key of a staged upload inside the staging store.
///
/// Derived from the document id only, so concurrent uploads never collide and
/// client-supplied filenames never reach the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(document_id: &DocumentId) -> Self {
        Self(format!("{}.upload", document_id.as_uuid()))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
