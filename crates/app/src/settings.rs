//! Settings for the reference server.
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `config/server.toml` file, `TODO_SERVER_*` environment variables and
//! finally command line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/server";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "todo-server", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override listen address.
    #[arg(long)]
    bind: Option<String>,
    /// Override listen port.
    #[arg(long)]
    port: Option<u16>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_builder(
            Config::builder().add_source(File::with_name(config_path).required(false)),
        )?;

        if let Some(bind) = args.bind {
            settings.bind = bind;
        }
        if let Some(port) = args.port {
            settings.port = port;
        }
        if let Some(log_level) = args.log_level {
            settings.log_level = log_level;
        }

        Ok(settings)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("TODO_SERVER"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 8000);
    }

    #[test]
    fn file_values_override_defaults() {
        let builder =
            Config::builder().add_source(File::from_str("port = 9001\n", FileFormat::Toml));
        let settings = Settings::from_builder(builder).unwrap();
        assert_eq!(settings.port, 9001);
        assert_eq!(settings.bind, "127.0.0.1");
    }
}
