#![allow(clippy::unwrap_used)]
// Request pipeline tests: token injection, envelope unwrapping, and the
// notify-once-then-reject failure path.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use enrolly_api::{
    ApiClient, ChannelNotifier, DEFAULT_TIMEOUT, Error, ErrorKind, GENERIC_FAILURE_MESSAGE,
    MemorySessionStore, Method, Notification, RequestOptions, SessionStore, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(
    uri: &str,
    session: Arc<dyn SessionStore>,
) -> (ApiClient, UnboundedReceiver<Notification>) {
    let (notifier, rx) = ChannelNotifier::new();
    let transport = TransportConfig::default();
    let client = ApiClient::from_reqwest(
        uri,
        transport.build_client().unwrap(),
        DEFAULT_TIMEOUT,
        session,
    )
    .unwrap()
        .with_notifier(Arc::new(notifier));
    (client, rx)
}

async fn setup(token: Option<&str>) -> (MockServer, ApiClient, UnboundedReceiver<Notification>) {
    let server = MockServer::start().await;
    let session: Arc<dyn SessionStore> = match token {
        Some(t) => Arc::new(MemorySessionStore::with_token(t)),
        None => Arc::new(MemorySessionStore::new()),
    };
    let (client, rx) = client_for(&format!("{}/api", server.uri()), session);
    (server, client, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n.message);
    }
    out
}

// ── Authorization header ────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached_when_present() {
    let (server, client, _rx) = setup(Some("secret-token")).await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": "pong", "message": "ok" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pong: String = client
        .request(Method::GET, &["ping"], RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(pong, "pong");
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let (server, client, _rx) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": "pong", "message": "ok" })),
        )
        .mount(&server)
        .await;

    let _: String = client
        .request(Method::GET, &["ping"], RequestOptions::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_token_is_read_per_request() {
    let (server, client, _rx) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": null, "message": "ok" })),
        )
        .mount(&server)
        .await;

    client
        .request::<()>(Method::GET, &["ping"], RequestOptions::new())
        .await
        .unwrap();
    client
        .session()
        .set_token("late-login".to_owned().into())
        .unwrap();
    client
        .request::<()>(Method::GET, &["ping"], RequestOptions::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer late-login"
    );
}

// ── Envelope unwrapping ─────────────────────────────────────────────

#[tokio::test]
async fn test_success_resolves_with_data_only() {
    let (server, client, mut rx) = setup(Some("t")).await;

    let data = json!({ "nested": { "list": [1, 2, 3], "flag": true }, "text": "as-is" });
    Mock::given(method("GET"))
        .and(path("/api/thing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 0, "data": data, "message": "fine" })),
        )
        .mount(&server)
        .await;

    let value: serde_json::Value = client
        .request(Method::GET, &["thing"], RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(value, data);
    assert!(drain(&mut rx).is_empty());
}

// ── Failure path ────────────────────────────────────────────────────

#[tokio::test]
async fn test_application_error_notifies_server_message_once() {
    let (server, client, mut rx) = setup(Some("t")).await;

    Mock::given(method("POST"))
        .and(path("/api/enrollments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "code": 409, "data": null, "message": "Course is full" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result: Result<serde_json::Value, Error> = client
        .request(
            Method::POST,
            &["enrollments"],
            RequestOptions::new().json(&json!({ "studentId": "s1" })),
        )
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    match err {
        Error::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 409);
            assert_eq!(code, Some(409));
            assert_eq!(message, "Course is full");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(drain(&mut rx), vec!["Course is full".to_owned()]);
}

#[tokio::test]
async fn test_error_without_envelope_uses_generic_message() {
    let (server, client, mut rx) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .request::<serde_json::Value>(Method::GET, &["students"], RequestOptions::new())
        .await;

    assert!(
        matches!(result, Err(Error::Status { status: 500, .. })),
        "expected Status error, got: {result:?}"
    );
    assert_eq!(drain(&mut rx), vec![GENERIC_FAILURE_MESSAGE.to_owned()]);
}

#[tokio::test]
async fn test_unauthorized_is_rejected_without_redirect_or_retry() {
    let (server, client, mut rx) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "code": 401, "data": null, "message": "Please log in" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .request::<serde_json::Value>(Method::GET, &["students"], RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(drain(&mut rx), vec!["Please log in".to_owned()]);
}

#[tokio::test]
async fn test_malformed_success_body_is_rejected() {
    let (server, client, mut rx) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = client
        .request::<serde_json::Value>(Method::GET, &["students"], RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Deserialization { .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(drain(&mut rx), vec![GENERIC_FAILURE_MESSAGE.to_owned()]);
}

#[tokio::test]
async fn test_timeout_is_reported_once_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": null, "message": "ok" }))
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (notifier, mut rx) = ChannelNotifier::new();
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(
        &server.uri(),
        &transport,
        Arc::new(MemorySessionStore::new()),
    )
    .unwrap()
    .with_notifier(Arc::new(notifier));

    let err = client
        .request::<()>(Method::GET, &["slow"], RequestOptions::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Timeout { timeout_ms: 100 }),
        "expected Timeout, got: {err:?}"
    );
    assert!(err.is_timeout());
    assert_eq!(drain(&mut rx), vec![GENERIC_FAILURE_MESSAGE.to_owned()]);
}

#[tokio::test]
async fn test_wrapped_client_reports_its_own_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": null, "message": "ok" }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(150);
    let http = reqwest::Client::builder().timeout(timeout).build().unwrap();
    let client = ApiClient::from_reqwest(
        &server.uri(),
        http,
        timeout,
        Arc::new(MemorySessionStore::new()),
    )
    .unwrap();

    let err = client
        .request::<()>(Method::GET, &["slow"], RequestOptions::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Timeout { timeout_ms: 150 }),
        "expected Timeout, got: {err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    let (client, mut rx) = client_for(
        "http://127.0.0.1:1/api",
        Arc::new(MemorySessionStore::new()),
    );

    let err = client
        .request::<()>(Method::GET, &["students"], RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    assert_eq!(drain(&mut rx).len(), 1);
}
