//! Integration tests for the voxflow-llm crate.
//!
//! A one-shot HTTP responder on a loopback port stands in for the
//! completion endpoint.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use voxflow_llm::{ChatRequest, LlmBackend, LlmClient, LlmConfig, LlmError, Message};

/// Serve exactly one request with `status` and `body`, returning the raw
/// request text.
async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 64 * 1024];
        let mut request = Vec::new();
        // Read until the JSON body has fully arrived.
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if n == 0 || (text.contains("\r\n\r\n") && text.trim_end().ends_with('}')) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn client_for(base_url: &str) -> LlmClient {
    let mut config = LlmConfig::new("sk-test").with_base_url(base_url);
    config.timeout = Duration::from_secs(5);
    LlmClient::new(config).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
//  Round trip against a local responder
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn completion_returns_message_content() {
    let body = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": "{\"steps\":[]}" } }]
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;

    let reply = client_for(&base_url)
        .complete(&ChatRequest::new(vec![Message::user("click save")]))
        .await
        .unwrap();
    assert_eq!(reply, "{\"steps\":[]}");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    assert!(request.contains("\"model\":\"gpt-4o-mini\""));
}

#[tokio::test]
async fn non_success_status_is_request_failure() {
    let (base_url, server) =
        serve_once("401 Unauthorized", r#"{"error":"bad key"}"#.to_owned()).await;

    let err = client_for(&base_url)
        .complete(&ChatRequest::new(vec![Message::user("x")]))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::RequestFailed { .. }));
    assert!(err.to_string().contains("401"));
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_parse_failure() {
    let (base_url, server) = serve_once("200 OK", "not json".to_owned()).await;

    let err = client_for(&base_url)
        .complete(&ChatRequest::new(vec![Message::user("x")]))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ParseFailed { .. }));
    server.await.unwrap();
}
