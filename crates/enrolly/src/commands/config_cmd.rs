//! Config command handlers. These run without a session or client.

use enrolly_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_file(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            config::apply_overrides(&mut cfg, global);
            cfg.validate()?;
            enrolly_config::save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success_line(
                        &format!("Config written to {}", path.display()),
                        output::should_color(global.color),
                    )
                );
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let rendered = match global.output {
                Some(OutputFormat::Json) => serde_json::to_string_pretty(&cfg)?,
                Some(OutputFormat::JsonCompact) => serde_json::to_string(&cfg)?,
                Some(OutputFormat::Yaml) => serde_yaml::to_string(&cfg)?,
                Some(OutputFormat::Table | OutputFormat::Plain) | None => {
                    toml::to_string_pretty(&cfg)?
                }
            };
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let cfg = config::resolve(global)?;
            let rendered = output::detail_lines(&[
                ("config", config::config_file(global).display().to_string()),
                ("session", cfg.session_file().display().to_string()),
            ]);
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
