//! Ollama adapters against a mock HTTP server.
//!
//! Test coverage:
//! - Request shape of `/api/generate` (model, prompt, stream, num_predict)
//! - Error classification (HTTP status, malformed body, transport)
//! - Retries through the generation client end at the sentinel
//! - `/api/embeddings` parsing and dimension learning

use codecanvas::adapters::embeddings::{OllamaEmbeddingConfig, OllamaEmbeddingProvider};
use codecanvas::adapters::generation::{OllamaBackend, OllamaConfig};
use codecanvas::adapters::logging::RecordingLogger;
use codecanvas::domain::models::{DecodingPolicy, GenerationRequest};
use codecanvas::domain::ports::{EmbeddingProvider, GenerationBackend};
use codecanvas::{GenerationClient, GenerationError, RetryPolicy};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn backend(base_url: String) -> OllamaBackend {
    OllamaBackend::new(OllamaConfig {
        base_url,
        model: "llama3.2".to_string(),
        timeout_secs: 5,
    })
    .expect("Failed to create backend")
}

#[tokio::test]
async fn test_generate_posts_non_streaming_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "prompt": "Is this simple?",
            "stream": false,
            "options": { "num_predict": 10 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "model": "llama3.2", "response": "simple", "done": true }).to_string())
        .create_async()
        .await;

    let request = GenerationRequest::new("Is this simple?", DecodingPolicy::CLASSIFICATION);
    let text = backend(server.url()).generate(&request).await.unwrap();

    assert_eq!(text, "simple");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_maps_http_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body("model 'llama3.2' not found")
        .create_async()
        .await;

    let request = GenerationRequest::new("hi", DecodingPolicy::FINAL_ANSWER);
    let err = backend(server.url()).generate(&request).await.unwrap_err();

    match err {
        GenerationError::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_maps_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let request = GenerationRequest::new("hi", DecodingPolicy::FINAL_ANSWER);
    let err = backend(server.url()).generate(&request).await.unwrap_err();

    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let request = GenerationRequest::new("hi", DecodingPolicy::FINAL_ANSWER);
    let err = backend("http://127.0.0.1:9".to_string())
        .generate(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport(_)));
}

#[tokio::test]
async fn test_client_retries_server_errors_three_times() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body("out of memory")
        .expect(3)
        .create_async()
        .await;

    let logger = Arc::new(RecordingLogger::new());
    let client = GenerationClient::new(
        Arc::new(backend(server.url())),
        RetryPolicy::fixed(3, Duration::from_millis(1)),
        logger.clone(),
    );

    let generation = client.generate("hi", DecodingPolicy::REASONING).await;

    assert!(generation.is_failure());
    assert!(generation.text().contains("out of memory"));
    assert_eq!(logger.with_message("generation attempt").len(), 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embeddings_learn_dimension() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embeddings")
        .match_body(Matcher::PartialJson(json!({
            "model": "nomic-embed-text",
            "prompt": "closures"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "embedding": [0.1, 0.2, 0.3, 0.4] }).to_string())
        .create_async()
        .await;

    let provider = OllamaEmbeddingProvider::new(OllamaEmbeddingConfig {
        base_url: server.url(),
        model: "nomic-embed-text".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    assert_eq!(provider.dimension(), 0);
    let embedding = provider.embed("closures").await.unwrap();

    assert_eq!(embedding.len(), 4);
    assert_eq!(provider.dimension(), 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embeddings_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let provider = OllamaEmbeddingProvider::new(OllamaEmbeddingConfig {
        base_url: server.url(),
        model: "nomic-embed-text".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    let err = provider.embed("anything").await.unwrap_err();
    assert!(err.to_string().contains("boom"));
}
