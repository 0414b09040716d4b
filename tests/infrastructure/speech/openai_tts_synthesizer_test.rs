use elemnote::application::ports::{SpeechSynthesisError, SpeechSynthesizer};
use elemnote::infrastructure::speech::OpenAiTtsSynthesizer;

use crate::support::mock_upstream::{start_json_upstream, start_mock_upstream};

fn synthesizer(base_url: &str) -> OpenAiTtsSynthesizer {
    OpenAiTtsSynthesizer::new(
        "sk-test".to_string(),
        "tts-1".to_string(),
        "alloy".to_string(),
        Some(base_url.to_string()),
    )
}

#[tokio::test]
async fn given_answer_when_synthesizing_then_returns_raw_audio_bytes() {
    let upstream = start_mock_upstream(200, b"ID3audio".to_vec(), "audio/mpeg").await;

    let audio = synthesizer(&upstream.base_url)
        .synthesize("Hello student.")
        .await
        .unwrap();

    assert_eq!(audio.data, b"ID3audio");

    let requests = upstream.requests();
    assert_eq!(requests[0].path, "/audio/speech");
    assert_eq!(requests[0].header("authorization"), Some("Bearer sk-test"));
    let body = requests[0].json();
    assert_eq!(body["voice"], "alloy");
    assert_eq!(body["response_format"], "mp3");
}

#[tokio::test]
async fn given_server_error_when_synthesizing_then_returns_api_request_failed() {
    let upstream = start_json_upstream(500, r#"{"error":"boom"}"#).await;

    let result = synthesizer(&upstream.base_url).synthesize("Hello").await;

    assert!(matches!(result, Err(SpeechSynthesisError::ApiRequestFailed(_))));
}

#[tokio::test]
async fn given_blank_text_when_synthesizing_then_returns_empty_input() {
    let upstream = start_json_upstream(200, "{}").await;

    let result = synthesizer(&upstream.base_url).synthesize("").await;

    assert!(matches!(result, Err(SpeechSynthesisError::EmptyInput)));
}
