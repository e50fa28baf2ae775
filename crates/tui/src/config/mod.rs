use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";
/// Legacy name for the API location, still honored.
const LEGACY_BASE_URL_VAR: &str = "REACT_APP_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
            log_file: "todo-tui.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Parser)]
#[command(name = "todo-tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://localhost:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override per-request timeout, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level.
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let builder = Config::builder().add_source(File::with_name(config_path).required(false));
    let mut settings = resolve(builder, std::env::var(LEGACY_BASE_URL_VAR).ok())?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.timeout_ms = timeout_ms;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

/// The legacy variable only replaces the built-in default; the config file
/// and `TODO_TUI_*` variables still win over it.
fn resolve(
    builder: ConfigBuilder<DefaultState>,
    legacy_base_url: Option<String>,
) -> Result<AppConfig> {
    let base_url = legacy_base_url.unwrap_or_else(|| AppConfig::default().base_url);
    let builder = builder
        .set_default("base_url", base_url)?
        .add_source(Environment::with_prefix("TODO_TUI"));
    Ok(builder.build()?.try_deserialize()?)
}
