use std::time::Duration;

use axum::http::StatusCode;
use haste_core::{Credentials, MAX_CHUNK_CHARS};
use haste_observability::UploadMetrics;
use haste_tests::{MockPasteServer, MockReply};
use haste_uploader::{upload_to_hastebin, ErrorKind, UploadError, Uploader, UploaderConfig};

fn uploader() -> Uploader {
    Uploader::new(UploaderConfig::default(), UploadMetrics::shared())
        .expect("uploader should build")
}

#[tokio::test]
async fn single_character_returns_server_link() {
    let server = MockPasteServer::with_keys(&["abc123"]).await.unwrap();

    let result = uploader().upload("A", server.url(), None).await.unwrap();

    assert_eq!(result.link, server.link("abc123"));
    assert_eq!(result.chunk_count, 1);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, "A");
}

#[tokio::test]
async fn requests_carry_the_hastebin_headers() {
    let server = MockPasteServer::with_keys(&["k1"]).await.unwrap();
    let content = "grüße aus dem log";

    uploader().upload(content, server.url(), None).await.unwrap();

    let request = &server.requests()[0];
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.header("user-agent"), Some("Mozilla/4.0"));
    assert_eq!(
        request.header("content-length"),
        Some(content.len().to_string().as_str())
    );
    assert_eq!(request.header("authorization"), None);
    assert_eq!(request.body, content);
}

#[tokio::test]
async fn credentials_are_sent_as_basic_auth() {
    let server = MockPasteServer::with_keys(&["k1"]).await.unwrap();
    let credentials = Credentials::new("user", "pass");

    uploader()
        .upload("secret log", server.url(), Some(&credentials))
        .await
        .unwrap();

    assert_eq!(
        server.requests()[0].header("authorization"),
        Some("Basic dXNlcjpwYXNz")
    );
}

#[tokio::test]
async fn two_chunks_link_second_to_first() {
    let server = MockPasteServer::with_keys(&["k1", "k2"]).await.unwrap();
    let content = "x".repeat(MAX_CHUNK_CHARS + 1);

    let result = uploader().upload(&content, server.url(), None).await.unwrap();

    assert_eq!(result.link, server.link("k2"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body.len(), MAX_CHUNK_CHARS);
    assert_eq!(requests[1].body, format!("x\n{}", server.link("k1")));
}

#[tokio::test]
async fn oversized_content_forms_a_forward_chain() {
    let server = MockPasteServer::with_keys(&["k1", "k2", "k3"]).await.unwrap();
    let content = "A".repeat(MAX_CHUNK_CHARS * 2 + 1);

    let result = uploader().upload(&content, server.url(), None).await.unwrap();

    assert_eq!(result.link, server.link("k3"));
    assert_eq!(result.chunk_count, 3);

    let requests = server.requests();
    assert_eq!(requests.len(), 3);

    assert_eq!(requests[0].body, "A".repeat(MAX_CHUNK_CHARS));
    assert_eq!(
        requests[1].body,
        format!("{}\n{}", "A".repeat(MAX_CHUNK_CHARS), server.link("k1"))
    );
    assert_eq!(requests[2].body, format!("A\n{}", server.link("k2")));

    for request in &requests {
        assert_eq!(
            request.header("content-length"),
            Some(request.body.len().to_string().as_str())
        );
    }
}

#[tokio::test]
async fn reply_without_key_is_a_protocol_error() {
    let server = MockPasteServer::start(vec![MockReply::json(r#"{"notkey":"x"}"#)])
        .await
        .unwrap();

    let error = uploader().upload("A", server.url(), None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Protocol);
    assert!(matches!(error, UploadError::Protocol { chunk: 0, .. }));
}

#[tokio::test]
async fn protocol_error_midway_stops_later_chunks() {
    let server = MockPasteServer::start(vec![
        MockReply::key("k1"),
        MockReply::json("not json at all"),
        MockReply::key("k3"),
    ])
    .await
    .unwrap();
    let uploader = Uploader::new(
        UploaderConfig::default().with_max_chunk_chars(4),
        UploadMetrics::shared(),
    )
    .unwrap();

    let error = uploader
        .upload("aaaabbbbcccc", server.url(), None)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Protocol);
    assert_eq!(error.chunk(), Some(1));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockPasteServer::start(vec![MockReply::status(
        StatusCode::PAYLOAD_TOO_LARGE,
        r#"{"message":"Document exceeds maximum length."}"#,
    )])
    .await
    .unwrap();

    let error = uploader().upload("A", server.url(), None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    match error {
        UploadError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 413);
            assert!(body.contains("maximum length"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = uploader()
        .upload("A", &format!("http://{addr}"), None)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(matches!(error, UploadError::Transport { chunk: 0, .. }));
}

#[tokio::test]
async fn empty_content_contacts_no_server() {
    let server = MockPasteServer::with_keys(&["k1"]).await.unwrap();

    let error = uploader().upload("", server.url(), None).await.unwrap_err();

    assert!(matches!(error, UploadError::EmptyContent));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn convenience_function_returns_the_link() {
    let server = MockPasteServer::with_keys(&["abc123"]).await.unwrap();

    let link = upload_to_hastebin("A", server.url(), None).await.unwrap();

    assert_eq!(link, format!("{}/abc123", server.url()));
}

#[tokio::test]
async fn zero_timeouts_do_not_expire_every_request() {
    let server = MockPasteServer::with_keys(&["k1"]).await.unwrap();
    let config = UploaderConfig {
        connect_timeout: Duration::ZERO,
        request_timeout: Duration::ZERO,
        ..UploaderConfig::default()
    };
    let uploader = Uploader::new(config, UploadMetrics::shared()).unwrap();

    let result = uploader.upload("A", server.url(), None).await.unwrap();

    assert_eq!(result.link, server.link("k1"));
}
