//! Config resolution: file + env via `enrolly_config`, then CLI flags.

use std::path::PathBuf;

use clap::ValueEnum;
use enrolly_config::Config;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Config file this invocation reads and `config init` writes.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(enrolly_config::config_path)
}

/// Load the config file, apply flag overrides on top, then validate the
/// merged result once.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = enrolly_config::load_layers_from(&config_file(global))?;
    apply_overrides(&mut cfg, global);
    cfg.validate()?;
    Ok(cfg)
}

pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.base_url {
        cfg.api.base_url.clone_from(url);
    }
    if let Some(ms) = global.timeout_ms {
        cfg.api.timeout_ms = ms;
    }
    if let Some(ref path) = global.session_file {
        cfg.session.file = Some(path.clone());
    }
    if global.insecure {
        cfg.api.insecure = true;
    }
}

/// `--output` wins; otherwise the config default; otherwise a table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|reason| CliError::Validation {
        field: "defaults.output".into(),
        reason,
    })
}
