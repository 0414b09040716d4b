use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct MockUpstream {
    pub base_url: String,
    pub captured: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).ok();
        }
    }
}

/// Serves `response_body` with `response_status` for every request and
/// records what was sent.
pub async fn start_mock_upstream(
    response_status: u16,
    response_body: impl Into<Bytes>,
    content_type: &'static str,
) -> MockUpstream {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let response_body: Bytes = response_body.into();

    let recorder = Arc::clone(&captured);
    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
        let recorder = Arc::clone(&recorder);
        let response_body = response_body.clone();
        async move {
            recorder.lock().unwrap().push(CapturedRequest {
                path: uri.path().to_string(),
                headers,
                body,
            });
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, [("content-type", content_type)], response_body).into_response()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    MockUpstream {
        base_url,
        captured,
        shutdown_tx: Some(shutdown_tx),
    }
}

pub async fn start_json_upstream(response_status: u16, response_body: &'static str) -> MockUpstream {
    start_mock_upstream(response_status, response_body, "application/json").await
}
