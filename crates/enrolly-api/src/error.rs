use thiserror::Error;

/// Generic text shown to the user when a failure carries no server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Top-level error type for the `enrolly-api` crate.
///
/// Covers every way a call through [`ApiClient`](crate::ApiClient) can fail:
/// transport, timeout, malformed responses, and application errors reported
/// by the enrollment service inside its `{code, data, message}` envelope.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {message}")]
    Client { message: String },

    // ── Application ─────────────────────────────────────────────────
    /// Non-2xx response whose body carried an envelope `message`.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Non-2xx response with no extractable message.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not a valid envelope for the expected type.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request payload could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A resource id that cannot be used as a single path segment.
    #[error("Invalid resource id: {id:?}")]
    InvalidId { id: String },

    /// Pagination parameters outside `page >= 1`, `page_size >= 1`.
    #[error("Invalid pagination: {field} must be at least 1")]
    InvalidPagination { field: &'static str },

    // ── Session ─────────────────────────────────────────────────────
    /// The stored token cannot be used as a header value.
    #[error("Invalid session token: {message}")]
    InvalidToken { message: String },

    /// The persisted session could not be written or removed.
    #[error("Session storage error: {message}")]
    Session { message: String },
}

/// Coarse classification of a failure, as surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No server message available: network, timeout, malformed response.
    Transport,
    /// The service rejected the request and explained why.
    Application,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Application,
            _ => ErrorKind::Transport,
        }
    }

    /// Text for the transient user notification.
    ///
    /// The envelope message verbatim for application errors, otherwise
    /// [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_owned(),
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the service refused the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` for transport-level connection failures.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Extract the envelope `code`, if the service sent one.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}
