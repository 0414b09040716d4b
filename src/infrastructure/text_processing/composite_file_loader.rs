use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{MediaType, UploadedDocument};

use super::pdf_adapter::PdfAdapter;
use super::plain_text_adapter::PlainTextAdapter;

/// Routes each upload to the extractor for its declared media type.
///
/// There is one handler per supported variant; every other declared type is
/// rejected before any bytes are looked at.
pub struct CompositeFileLoader {
    pdf: Arc<dyn FileLoader>,
    plain_text: Arc<dyn FileLoader>,
}

impl CompositeFileLoader {
    pub fn new(pdf: Arc<dyn FileLoader>, plain_text: Arc<dyn FileLoader>) -> Self {
        Self { pdf, plain_text }
    }
}

impl Default for CompositeFileLoader {
    fn default() -> Self {
        Self::new(Arc::new(PdfAdapter::new()), Arc::new(PlainTextAdapter))
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
    ) -> Result<String, FileLoaderError> {
        let adapter = match &document.media_type {
            MediaType::Pdf => &self.pdf,
            MediaType::PlainText => &self.plain_text,
            unsupported @ (MediaType::WordDocument | MediaType::Unsupported(_)) => {
                return Err(FileLoaderError::UnsupportedContentType(
                    unsupported.as_mime().to_string(),
                ));
            }
        };

        adapter.extract_text(data, document).await
    }
}
