// Request pipeline for the enrollment service.
//
// Every resource call funnels through `ApiClient::request`, which injects
// the bearer token, dispatches, strips the `{code, data, message}`
// envelope, and on failure fires exactly one user notification before
// handing the error back. Resource endpoints live in `students.rs`,
// `courses.rs`, and `enrollments.rs` as inherent methods.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{PaginatedData, PaginationParams};
use crate::notify::{Notifier, TracingNotifier};
use crate::session::SessionStore;
use crate::transport::TransportConfig;

/// Envelope as it arrives on the wire. Every field is optional so that a
/// partial error body still yields its `message`.
#[derive(serde::Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

// ── Request options ──────────────────────────────────────────────────

/// Query string and JSON body for one call.
#[derive(Debug, Default)]
pub struct RequestOptions {
    query: Vec<(&'static str, String)>,
    body: Option<Result<serde_json::Value, serde_json::Error>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: &PaginationParams) -> Self {
        self.query.extend(params.to_query());
        self
    }

    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Attach a JSON body. Encoding failures surface when the request runs.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_value(body));
        self
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the enrollment service.
///
/// Holds one configured `reqwest::Client`, the session store the bearer
/// token is read from, and the notifier that failures are reported to.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_ms: u64,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:3000/api`).
    ///
    /// Failures are reported through [`TracingNotifier`] until
    /// [`with_notifier`](Self::with_notifier) installs another one.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_ms: transport.timeout_ms(),
            session,
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// `timeout` must be the timeout `http` was built with. It is only used
    /// to report [`Error::Timeout`]; the wrapped client enforces it.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            session,
            notifier: Arc::new(TracingNotifier),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Ensure a trailing slash so relative resource paths join under it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session store tokens are read from.
    pub fn session(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    // ── Pipeline ─────────────────────────────────────────────────────

    /// Send one request to the endpoint named by `segments` and resolve
    /// with the envelope's `data`.
    ///
    /// Each segment is percent-encoded on its own, so an id such as
    /// `"../courses/c1"` stays inside its route.
    ///
    /// On any failure the notifier is called once with
    /// [`Error::user_message`], then the error is returned unchanged.
    /// Nothing is retried.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<T, Error> {
        let result = self.execute(method, segments, options).await;
        if let Err(ref err) = result {
            debug!(error = %err, "request failed");
            self.notifier.notify_error(&err.user_message());
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("{method} {url} params={:?}", options.query);

        let mut builder = self.http.request(method, url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body.transpose()? {
            builder = builder.json(&body);
        }
        builder = self.authorize(builder)?;

        let resp = builder.send().await.map_err(|e| self.map_transport(e))?;
        self.handle_response(resp).await
    }

    /// Append path segments to the base URL, encoding `/`, `?`, `#` and `%`
    /// inside each one. Empty and dot segments are refused.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(**s, "" | "." | ".."))
        {
            return Err(Error::InvalidId {
                id: (*bad).to_owned(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Client {
                message: format!("base URL {} cannot hold a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach `Authorization: Bearer <token>` if a session token exists.
    ///
    /// The token is read fresh for every request.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let Some(token) = self.session.token() else {
            trace!("no session token, sending unauthenticated");
            return Ok(builder);
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken {
                message: e.to_string(),
            })?;
        value.set_sensitive(true);
        Ok(builder.header(AUTHORIZATION, value))
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        if status.is_success() {
            unwrap_envelope(&body)
        } else {
            Err(parse_error(status, body))
        }
    }
}

/// Strip the envelope and decode `data` as `T`.
///
/// An empty body (e.g. `204 No Content`) is read as `data: null`.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let data = if body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        let envelope: RawEnvelope =
            serde_json::from_str(body).map_err(|e| deserialization_error(&e, body))?;
        trace!(code = ?envelope.code, message = ?envelope.message, "unwrapped envelope");
        envelope.data.unwrap_or(serde_json::Value::Null)
    };

    serde_json::from_value(data).map_err(|e| deserialization_error(&e, body))
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

/// Prefer the envelope's `message`; otherwise keep the raw body.
fn parse_error(status: reqwest::StatusCode, body: String) -> Error {
    if let Ok(envelope) = serde_json::from_str::<RawEnvelope>(&body) {
        if let Some(message) = envelope.message.filter(|m| !m.trim().is_empty()) {
            return Error::Api {
                status: status.as_u16(),
                code: envelope.code,
                message,
            };
        }
    }

    Error::Status {
        status: status.as_u16(),
        body,
    }
}

// ── Pagination helper ────────────────────────────────────────────────

/// Walk pages starting at `first` and collect every item.
///
/// Stops when `total` items have been gathered or a page comes back short.
pub async fn collect_all_pages<T, F, Fut>(first: PaginationParams, fetch: F) -> Result<Vec<T>, Error>
where
    F: Fn(PaginationParams) -> Fut,
    Fut: Future<Output = Result<PaginatedData<T>, Error>>,
{
    let mut all = Vec::new();
    let mut params = first;
    let page_size = usize::try_from(first.page_size()).unwrap_or(usize::MAX);

    loop {
        let page = fetch(params).await?;
        let received = page.items.len();
        all.extend(page.items);

        if received == 0
            || received < page_size
            || u64::try_from(all.len()).unwrap_or(u64::MAX) >= page.total
        {
            break;
        }

        params = params.next_page();
    }

    Ok(all)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::session::MemorySessionStore;

    #[test]
    fn base_url_gets_trailing_slash() {
        let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let client = ApiClient::from_reqwest(
            "http://localhost:3000/api",
            reqwest::Client::new(),
            Duration::from_secs(5),
            session,
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/api/");
        assert_eq!(
            client.url(&["students", "42"]).unwrap().as_str(),
            "http://localhost:3000/api/students/42"
        );
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let client = ApiClient::from_reqwest(
            "http://localhost:3000/api/",
            reqwest::Client::new(),
            Duration::from_secs(5),
            session,
        )
        .unwrap();
        assert_eq!(
            client.url(&["students", "../courses/c1"]).unwrap().path(),
            "/api/students/..%2Fcourses%2Fc1"
        );
        assert_eq!(
            client.url(&["enrollments", "a?b#c", "drop"]).unwrap().path(),
            "/api/enrollments/a%3Fb%23c/drop"
        );
        for bad in ["", ".", ".."] {
            assert!(
                matches!(client.url(&["students", bad]), Err(Error::InvalidId { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn envelope_is_stripped() {
        let body = json!({ "code": 200, "data": { "total": 3, "items": [1, 2, 3] }, "message": "ok" });
        let page: PaginatedData<u32> = unwrap_envelope(&body.to_string()).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
    }

    #[test]
    fn empty_body_reads_as_unit() {
        unwrap_envelope::<()>("").unwrap();
        unwrap_envelope::<()>(r#"{"code":200,"data":null,"message":"deleted"}"#).unwrap();
    }

    #[test]
    fn malformed_body_is_a_deserialization_error() {
        let err = unwrap_envelope::<u32>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn error_body_without_message_keeps_status() {
        let err = parse_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down".into());
        match err {
            Error::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected Status error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn collect_all_pages_walks_until_total() {
        let fixture: Vec<u32> = (1..=25).collect();
        let first = PaginationParams::new(1, 10).unwrap();

        let all = collect_all_pages(first, |params| {
            let fixture = fixture.clone();
            async move {
                let start = usize::try_from((params.page() - 1) * params.page_size()).unwrap();
                let end = (start + usize::try_from(params.page_size()).unwrap()).min(fixture.len());
                Ok::<_, Error>(PaginatedData {
                    total: 25,
                    items: fixture[start..end].to_vec(),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(all, fixture);
    }
}
