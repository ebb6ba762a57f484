//! CLI error types with miette diagnostics.
//!
//! Maps `enrolly_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use enrolly_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the enrollment service")]
    #[diagnostic(
        code(enrolly::connection_failed),
        help(
            "Check that the service is running and the base URL is right.\n\
             Override it with --base-url or ENROLLY_BASE_URL."
        )
    )]
    ConnectionFailed {
        #[source]
        source: enrolly_api::Error,
    },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(enrolly::timeout),
        help("Increase the timeout with --timeout-ms or check the service.")
    )]
    Timeout { timeout_ms: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not authorized: {message}")]
    #[diagnostic(
        code(enrolly::auth_failed),
        help("Store a valid token with: enrolly login --token <TOKEN>")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} '{id}' not found")]
    #[diagnostic(
        code(enrolly::not_found),
        help("Run: enrolly {list_command} to see what exists")
    )]
    NotFound {
        resource: &'static str,
        id: String,
        list_command: &'static str,
    },

    #[error("{message}")]
    #[diagnostic(code(enrolly::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message} (HTTP {status})")]
    #[diagnostic(code(enrolly::api_error))]
    Api { status: u16, message: String },

    #[error(transparent)]
    #[diagnostic(code(enrolly::request_failed))]
    Request(enrolly_api::Error),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(enrolly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(enrolly::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(enrolly::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(enrolly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not render output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Could not render output: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ConfigExists { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Like `From<enrolly_api::Error>`, but turns a 404 into a named
    /// `NotFound` for the resource that was asked for.
    pub fn for_resource(
        err: enrolly_api::Error,
        resource: &'static str,
        id: &str,
        list_command: &'static str,
    ) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                resource,
                id: id.to_owned(),
                list_command,
            };
        }
        err.into()
    }
}

// ── enrolly_api::Error → CliError mapping ────────────────────────────

impl From<enrolly_api::Error> for CliError {
    fn from(err: enrolly_api::Error) -> Self {
        use enrolly_api::Error as ApiError;

        if err.is_connect() {
            return Self::ConnectionFailed { source: err };
        }
        if err.is_unauthorized() {
            return Self::AuthFailed {
                message: err.user_message(),
            };
        }

        match err {
            ApiError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            ApiError::InvalidPagination { field } => Self::Validation {
                field: field.into(),
                reason: "must be at least 1".into(),
            },
            ApiError::InvalidId { id } => Self::Validation {
                field: "id".into(),
                reason: format!("{id:?} cannot be used as a resource id"),
            },
            ApiError::InvalidToken { message } => Self::Validation {
                field: "token".into(),
                reason: message,
            },
            ApiError::Api {
                status: 409,
                message,
                ..
            } => Self::Conflict { message },
            ApiError::Api {
                status, message, ..
            } => Self::Api { status, message },
            other => Self::Request(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_exit_codes() {
        let conflict: CliError = enrolly_api::Error::Api {
            status: 409,
            code: Some(409),
            message: "Course is full".into(),
        }
        .into();
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);
        assert_eq!(conflict.to_string(), "Course is full");

        let unauthorized: CliError = enrolly_api::Error::Status {
            status: 401,
            body: String::new(),
        }
        .into();
        assert_eq!(unauthorized.exit_code(), exit_code::AUTH);

        let timeout: CliError = enrolly_api::Error::Timeout { timeout_ms: 250 }.into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = CliError::for_resource(
            enrolly_api::Error::Status {
                status: 404,
                body: String::new(),
            },
            "student",
            "s-9",
            "students list",
        );
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "student 's-9' not found");
    }

    #[test]
    fn unusable_id_is_a_usage_error() {
        let err: CliError = enrolly_api::Error::InvalidId { id: "..".into() }.into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            err.to_string(),
            "Invalid value for id: \"..\" cannot be used as a resource id"
        );
    }

    #[test]
    fn other_statuses_are_general_failures() {
        let err: CliError = enrolly_api::Error::Status {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
