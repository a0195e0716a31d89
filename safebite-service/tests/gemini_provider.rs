use axum::{
    http::{StatusCode, Uri},
    Router,
};
use safebite_service::config::GeminiSettings;
use safebite_service::services::providers::gemini::GeminiTextProvider;
use safebite_service::services::providers::{ProviderError, TextProvider};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Requests seen by the stub, as `(path and query, body)`.
type Seen = Arc<Mutex<Vec<(String, String)>>>;

async fn serve_stub(status: StatusCode, body: &'static str) -> (GeminiTextProvider, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().fallback(move |uri: Uri, request_body: String| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push((uri.to_string(), request_body));
            (status, body)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let provider = GeminiTextProvider::new(GeminiSettings {
        api_key: "test-key".to_string(),
        model: "gemini-1.5-flash".to_string(),
        api_base: format!("http://{}/v1beta", addr),
    })
    .unwrap();

    (provider, seen)
}

#[tokio::test]
async fn returns_candidate_text() {
    let (provider, seen) = serve_stub(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Dear chef"}]},"finishReason":"STOP"}]}"#,
    )
    .await;

    let text = provider.generate("Write a card").await.unwrap();
    assert_eq!(text, "Dear chef");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].0,
        "/v1beta/models/gemini-1.5-flash:generateContent?key=test-key"
    );
    let request: serde_json::Value = serde_json::from_str(&seen[0].1).unwrap();
    assert_eq!(request["contents"][0]["parts"][0]["text"], "Write a card");
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let (provider, _) = serve_stub(StatusCode::TOO_MANY_REQUESTS, "slow down").await;

    let result = provider.generate("Write a card").await;
    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[tokio::test]
async fn error_status_carries_response_body() {
    let (provider, _) = serve_stub(StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").await;

    match provider.generate("Write a card").await {
        Err(ProviderError::ApiError(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("backend exploded"));
        }
        other => panic!("expected an API error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn blocked_prompt_is_content_filtered() {
    let (provider, _) = serve_stub(
        StatusCode::OK,
        r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
    )
    .await;

    let result = provider.generate("Write a card").await;
    assert!(matches!(result, Err(ProviderError::ContentFiltered)));
}
