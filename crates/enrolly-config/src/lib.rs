//! Shared configuration for the enrolly tools.
//!
//! Defaults, an optional TOML file, and `ENROLLY_*` environment variables
//! are layered with figment. The CLI applies its flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use enrolly_api::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Where the enrollment service lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Service origin including the path prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Extra CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Token file. Defaults to `session.json` in the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_output() -> String {
    "table".into()
}
fn default_page_size() -> u32 {
    10
}

impl Config {
    /// Check values figment cannot express as types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| ConfigError::Validation {
            field: "api.base_url".into(),
            reason: format!("{e}: {}", self.api.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
            });
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_ms".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.defaults.page_size == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Transport settings for `enrolly_api::ApiClient`.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.api.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.api.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig::default()
            .with_timeout(Duration::from_millis(self.api.timeout_ms))
            .with_tls(tls)
    }

    /// Resolved token file path.
    pub fn session_file(&self) -> PathBuf {
        self.session.file.clone().unwrap_or_else(default_session_path)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "enrolly", "enrolly")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("enrolly");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted session token.
pub fn default_session_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Merge defaults, the file at `path`, and the environment without
/// validating. Callers that layer further overrides validate afterwards.
pub fn load_layers_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ENROLLY_").split("__"));

    Ok(figment.extract()?)
}

/// Load from an explicit file path + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = load_layers_from(path)?;
    config.validate()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.api.timeout_ms, 5000);
        assert_eq!(cfg.defaults.page_size, 10);
        assert_eq!(cfg.transport().timeout, Duration::from_millis(5000));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://enroll.example.edu/api"
timeout_ms = 2500

[session]
file = "/tmp/enrolly-test/session.json"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api.base_url, "https://enroll.example.edu/api");
        assert_eq!(cfg.api.timeout_ms, 2500);
        assert_eq!(
            cfg.session_file(),
            PathBuf::from("/tmp/enrolly-test/session.json")
        );
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[api]\ntimeout_ms = 0\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { .. })
        ));

        std::fs::write(&path, "[api]\nbase_url = \"ftp://files.example\"\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn layers_load_without_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout_ms = 0\n").unwrap();

        let mut cfg = load_layers_from(&path).unwrap();
        assert_eq!(cfg.api.timeout_ms, 0);
        assert!(cfg.validate().is_err());

        cfg.api.timeout_ms = 100;
        cfg.validate().unwrap();
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let mut cfg = Config::default();
        cfg.api.insecure = true;
        cfg.api.ca_cert = Some(PathBuf::from("/etc/ca.pem"));
        assert!(matches!(cfg.transport().tls, TlsMode::DangerAcceptInvalid));

        cfg.api.insecure = false;
        assert!(matches!(cfg.transport().tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.api.base_url = "http://10.0.0.5:3000/api".into();
        cfg.defaults.page_size = 25;
        save_config_to(&cfg, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}
