use elemnote::application::ports::{FileLoader, FileLoaderError};
use elemnote::domain::{DocumentId, MediaType, UploadedDocument};
use elemnote::infrastructure::text_processing::PlainTextAdapter;

fn text_document(size: usize) -> UploadedDocument {
    UploadedDocument::new(
        DocumentId::new(),
        "notes.txt".to_string(),
        MediaType::PlainText,
        size as u64,
    )
}

#[tokio::test]
async fn given_utf8_text_when_extracting_then_returns_it_verbatim() {
    let data = "Line one\n\n  Line   two\tend".as_bytes();

    let text = PlainTextAdapter
        .extract_text(data, &text_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "Line one\n\n  Line   two\tend");
}

#[tokio::test]
async fn given_text_with_byte_order_mark_when_extracting_then_strips_it() {
    let data = b"\xEF\xBB\xBFcaf\xC3\xA9";

    let text = PlainTextAdapter
        .extract_text(data, &text_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "café");
}

#[tokio::test]
async fn given_invalid_utf8_when_extracting_then_returns_extraction_failed() {
    let data = [0x66, 0x6f, 0xff, 0x6f];

    let result = PlainTextAdapter
        .extract_text(&data, &text_document(data.len()))
        .await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_pdf_media_type_when_extracting_then_returns_unsupported() {
    let document = UploadedDocument::new(
        DocumentId::new(),
        "doc.pdf".to_string(),
        MediaType::Pdf,
        4,
    );

    let result = PlainTextAdapter.extract_text(b"%PDF", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
