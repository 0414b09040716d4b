use std::time::Duration;

use elemnote::application::services::{PipelineError, StudyIntake, ValidationError};
use elemnote::domain::MediaType;

use crate::support::{PipelineFixture, byte_stream};

async fn wait_until_empty(fixture: &PipelineFixture) {
    for _ in 0..50 {
        if fixture.staged_file_count() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn given_staged_upload_when_intake_is_abandoned_then_upload_is_removed() {
    let fixture = PipelineFixture::new();
    let mut intake = StudyIntake::new(fixture.pipeline.clone(), Some("req-1".to_string()));
    intake
        .stage_upload("notes.txt".to_string(), MediaType::PlainText, byte_stream(b"notes"))
        .await
        .unwrap();
    assert_eq!(fixture.staged_file_count(), 1);

    drop(intake);
    wait_until_empty(&fixture).await;

    assert_eq!(fixture.staged_file_count(), 0);
    assert_eq!(fixture.store.removal_count(), 1);
}

#[tokio::test]
async fn given_completed_intake_when_handed_to_pipeline_then_upload_is_removed_once() {
    let fixture = PipelineFixture::new();
    let mut intake = StudyIntake::new(fixture.pipeline.clone(), None);
    intake
        .stage_upload("notes.txt".to_string(), MediaType::PlainText, byte_stream(b"notes"))
        .await
        .unwrap();
    intake.set_query("Quiz me".to_string());

    let request = intake.into_request();
    fixture.pipeline.handle(request).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(fixture.store.removal_count(), 1);
    assert_eq!(fixture.staged_file_count(), 0);
}

#[tokio::test]
async fn given_two_intake_failures_when_recorded_then_first_one_is_reported() {
    let fixture = PipelineFixture::new();
    let mut intake = StudyIntake::new(fixture.pipeline.clone(), None);

    intake.fail(ValidationError::DuplicateDocument);
    intake.fail(ValidationError::MalformedForm("truncated body".to_string()));
    let result = fixture.pipeline.handle(intake.into_request()).await;

    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::DuplicateDocument))
    ));
}
