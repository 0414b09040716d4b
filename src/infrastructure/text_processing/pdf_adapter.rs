use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{MediaType, UploadedDocument};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SEPARATOR: &str = "\n\n";

/// Page-level text access to a parsed document.
pub trait PageSource {
    fn page_count(&mut self) -> Result<usize, String>;

    fn page_text(&mut self, page_index: usize) -> Result<String, String>;
}

impl PageSource for PdfDocument {
    fn page_count(&mut self) -> Result<usize, String> {
        PdfDocument::page_count(self).map_err(|e| e.to_string())
    }

    fn page_text(&mut self, page_index: usize) -> Result<String, String> {
        self.extract_text(page_index).map_err(|e| e.to_string())
    }
}

/// Reads every page in order and sanitises it.
///
/// Extraction is all or nothing: a page that cannot be read fails the whole
/// document. Pages that are merely empty are left out.
pub fn read_pages(source: &mut impl PageSource) -> Result<Vec<String>, FileLoaderError> {
    let page_count = source.page_count().map_err(|e| {
        FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
    })?;

    let mut pages = Vec::with_capacity(page_count);
    for page_index in 0..page_count {
        let raw = source.page_text(page_index).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("page {}: {e}", page_index + 1))
        })?;

        let text = sanitize_extracted_text(&raw);
        if text.is_empty() {
            tracing::debug!(page = page_index + 1, "PDF page has no text");
            continue;
        }
        pages.push(text);
    }

    Ok(pages)
}

/// Extracts PDF text on a blocking thread and joins the pages with a blank line.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn parse(data: Vec<u8>) -> Result<Vec<String>, FileLoaderError> {
        let mut doc = PdfDocument::from_bytes(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;
        read_pages(&mut doc)
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
    ) -> Result<String, FileLoaderError> {
        if document.media_type != MediaType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.media_type.as_mime().to_string(),
            ));
        }

        let data = data.to_vec();
        let pages = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::parse(data)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        if pages.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        let text = pages.join(PAGE_SEPARATOR);
        tracing::info!(
            pages = pages.len(),
            chars = text.chars().count(),
            "PDF text extraction complete"
        );

        Ok(text)
    }
}
