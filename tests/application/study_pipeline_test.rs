use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use elemnote::application::services::{
    PipelineError, StudyRequest, SynthesisFailurePolicy, UpstreamError, ValidationError,
};
use elemnote::domain::{DocumentId, MediaType, UploadedDocument};

use crate::support::{
    FailingLlmClient, FailingSpeechSynthesizer, PipelineFixture, STUB_ANSWER, STUB_AUDIO,
    byte_stream,
};

async fn staged_request(
    fixture: &PipelineFixture,
    filename: &str,
    media_type: MediaType,
    data: &[u8],
    query: Option<&str>,
) -> StudyRequest {
    let document = fixture
        .pipeline
        .stage_upload(filename.to_string(), media_type, byte_stream(data))
        .await
        .unwrap();

    StudyRequest {
        document: Some(document),
        query: query.map(str::to_string),
        ..StudyRequest::default()
    }
}

#[tokio::test]
async fn given_staged_text_when_handling_then_returns_answer_with_encoded_audio() {
    let fixture = PipelineFixture::new();
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        b"Mitochondria are the powerhouse of the cell.",
        Some("Quiz me"),
    )
    .await;

    let payload = fixture.pipeline.handle(request).await.unwrap();

    assert_eq!(payload.ai_response, STUB_ANSWER);
    assert_eq!(payload.audio, Some(BASE64.encode(STUB_AUDIO)));
    assert_eq!(fixture.store.removal_count(), 1);
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_upload_when_staging_then_size_and_key_are_recorded() {
    let fixture = PipelineFixture::new();

    let document = fixture
        .pipeline
        .stage_upload("notes.txt".to_string(), MediaType::PlainText, byte_stream(b"12345"))
        .await
        .unwrap();

    assert_eq!(document.size_bytes, 5);
    assert_eq!(document.filename, "notes.txt");
    assert!(!document.storage_path.as_str().contains("notes.txt"));
    assert_eq!(fixture.staged_file_count(), 1);
}

#[tokio::test]
async fn given_intake_error_when_handling_then_reports_it_and_still_cleans_up() {
    let fixture = PipelineFixture::new();
    let mut request = staged_request(
        &fixture,
        "a.txt",
        MediaType::PlainText,
        b"first",
        Some("Explain"),
    )
    .await;
    request.intake_error = Some(ValidationError::DuplicateDocument.into());

    let result = fixture.pipeline.handle(request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::DuplicateDocument))
    ));
    assert!(fixture.llm.prompts().is_empty());
    assert_eq!(fixture.store.removal_count(), 1);
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_no_document_when_handling_then_missing_document_without_cleanup() {
    let fixture = PipelineFixture::new();
    let request = StudyRequest {
        query: Some("Explain".to_string()),
        ..StudyRequest::default()
    };

    let result = fixture.pipeline.handle(request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::MissingDocument))
    ));
    assert_eq!(fixture.store.removal_count(), 0);
}

#[tokio::test]
async fn given_unsupported_type_when_handling_then_client_error_and_cleanup() {
    let fixture = PipelineFixture::new();
    let request = staged_request(
        &fixture,
        "slides.pptx",
        MediaType::from_mime("application/vnd.ms-powerpoint"),
        b"binary",
        Some("Explain"),
    )
    .await;

    let error = fixture.pipeline.handle(request).await.unwrap_err();

    assert!(error.is_client_error());
    assert_eq!(
        error.to_string(),
        "Unsupported file type: application/vnd.ms-powerpoint. Please upload PDF or plain text."
    );
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_invalid_utf8_text_when_handling_then_read_error_is_server_side() {
    let fixture = PipelineFixture::new();
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        &[0xff, 0xfe, 0xfd],
        Some("Explain"),
    )
    .await;

    let error = fixture.pipeline.handle(request).await.unwrap_err();

    assert!(matches!(error, PipelineError::Read(_)));
    assert!(!error.is_client_error());
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_document_missing_from_store_when_handling_then_read_error() {
    let fixture = PipelineFixture::new();
    let document = UploadedDocument::new(
        DocumentId::new(),
        "ghost.txt".to_string(),
        MediaType::PlainText,
        10,
    );
    let request = StudyRequest {
        document: Some(document),
        query: Some("Explain".to_string()),
        ..StudyRequest::default()
    };

    let result = fixture.pipeline.handle(request).await;

    assert!(matches!(result, Err(PipelineError::Read(_))));
    assert_eq!(fixture.store.removal_count(), 1);
}

#[tokio::test]
async fn given_language_model_failure_when_handling_then_upstream_generation_error() {
    let fixture = PipelineFixture::with_llm(Arc::new(FailingLlmClient));
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        b"Some notes",
        Some("Explain"),
    )
    .await;

    let result = fixture.pipeline.handle(request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Upstream(UpstreamError::Generation(_)))
    ));
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_speech_failure_and_drop_audio_when_handling_then_answer_without_audio() {
    let fixture = PipelineFixture::with(
        Arc::new(FailingSpeechSynthesizer),
        SynthesisFailurePolicy::DropAudio,
    );
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        b"Some notes",
        Some("Explain"),
    )
    .await;

    let payload = fixture.pipeline.handle(request).await.unwrap();

    assert_eq!(payload.ai_response, STUB_ANSWER);
    assert!(payload.audio.is_none());
}

#[tokio::test]
async fn given_speech_failure_and_fail_request_when_handling_then_upstream_synthesis_error() {
    let fixture = PipelineFixture::with(
        Arc::new(FailingSpeechSynthesizer),
        SynthesisFailurePolicy::FailRequest,
    );
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        b"Some notes",
        Some("Explain"),
    )
    .await;

    let result = fixture.pipeline.handle(request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Upstream(UpstreamError::Synthesis(_)))
    ));
    assert_eq!(fixture.store.removal_count(), 1);
}

#[tokio::test]
async fn given_text_with_bom_when_handling_then_prompt_excludes_bom() {
    let fixture = PipelineFixture::new();
    let request = staged_request(
        &fixture,
        "notes.txt",
        MediaType::PlainText,
        b"\xEF\xBB\xBFHello",
        Some("Explain"),
    )
    .await;

    fixture.pipeline.handle(request).await.unwrap();

    assert_eq!(fixture.llm.prompts()[0].excerpt(), "Hello");
}
