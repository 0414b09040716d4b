use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{MediaType, UploadedDocument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads plain-text uploads verbatim. Bytes must be valid UTF-8.
pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
    ) -> Result<String, FileLoaderError> {
        if document.media_type != MediaType::PlainText {
            return Err(FileLoaderError::UnsupportedContentType(
                document.media_type.as_mime().to_string(),
            ));
        }

        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

        String::from_utf8(data.to_vec())
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("invalid UTF-8 text: {e}")))
    }
}
