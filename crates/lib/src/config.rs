//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.weatherbot/config.json`) and environment.
//! Secrets may live in either place; environment wins. Everything is resolved once at
//! startup and treated as read-only afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat platform (app credentials, webhook secret, keyword, reply styling).
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Weather conditions API.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Zip code lookup service.
    #[serde(default)]
    pub zipcode: ZipcodeConfig,
}

/// Listener bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 3000). Overridden by PORT env.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the chat platform must be able to reach the webhook).
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Chat platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// API base URL; `/oauth/token` and `/v1/spaces/...` are resolved against it.
    #[serde(default = "default_workspace_base_url")]
    pub base_url: String,

    /// Application id from app registration. Overridden by WEATHERBOT_APP_ID env.
    pub app_id: Option<String>,

    /// Application secret. Overridden by WEATHERBOT_APP_SECRET env.
    pub app_secret: Option<String>,

    /// Webhook secret used to sign verification challenges. Overridden by WEATHERBOT_WEBHOOK_SECRET env.
    pub webhook_secret: Option<String>,

    /// Messages must start with this exact token to be handled (default "@weather").
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Annotation color of posted replies.
    #[serde(default = "default_color")]
    pub color: String,

    /// Annotation title of posted replies.
    #[serde(default = "default_title")]
    pub title: String,
}

/// Weather API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// API key. Overridden by WEATHERBOT_WEATHER_KEY env.
    pub api_key: Option<String>,
}

/// Zip code lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipcodeConfig {
    #[serde(default = "default_zipcode_base_url")]
    pub base_url: String,
}

fn default_port() -> u16 {
    3000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_workspace_base_url() -> String {
    "https://api.watsonwork.ibm.com".to_string()
}

fn default_keyword() -> String {
    "@weather".to_string()
}

fn default_color() -> String {
    "#D5212B".to_string()
}

fn default_title() -> String {
    "Current weather conditions".to_string()
}

fn default_weather_base_url() -> String {
    "http://api.wunderground.com".to_string()
}

fn default_zipcode_base_url() -> String {
    "https://api.zippopotam.us".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_workspace_base_url(),
            app_id: None,
            app_secret: None,
            webhook_secret: None,
            keyword: default_keyword(),
            color: default_color(),
            title: default_title(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
        }
    }
}

impl Default for ZipcodeConfig {
    fn default() -> Self {
        Self {
            base_url: default_zipcode_base_url(),
        }
    }
}

/// Secrets needed to serve: resolved once at startup, then shared read-only.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub webhook_secret: String,
    pub weather_key: String,
}

/// Non-empty trimmed value of env `var`, else the non-empty trimmed config value.
fn env_or(var: &str, configured: Option<&String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the application id: env WEATHERBOT_APP_ID overrides config.
pub fn resolve_app_id(config: &Config) -> Option<String> {
    env_or("WEATHERBOT_APP_ID", config.workspace.app_id.as_ref())
}

/// Resolve the application secret: env WEATHERBOT_APP_SECRET overrides config.
pub fn resolve_app_secret(config: &Config) -> Option<String> {
    env_or("WEATHERBOT_APP_SECRET", config.workspace.app_secret.as_ref())
}

/// Resolve the webhook secret: env WEATHERBOT_WEBHOOK_SECRET overrides config.
pub fn resolve_webhook_secret(config: &Config) -> Option<String> {
    env_or(
        "WEATHERBOT_WEBHOOK_SECRET",
        config.workspace.webhook_secret.as_ref(),
    )
}

/// Resolve the weather API key: env WEATHERBOT_WEATHER_KEY overrides config.
pub fn resolve_weather_key(config: &Config) -> Option<String> {
    env_or("WEATHERBOT_WEATHER_KEY", config.weather.api_key.as_ref())
}

/// Resolve the listening port: env PORT overrides config. An unparsable PORT is ignored with a warning.
pub fn resolve_port(config: &Config) -> u16 {
    match std::env::var("PORT") {
        Ok(s) if !s.trim().is_empty() => match s.trim().parse::<u16>() {
            Ok(p) => p,
            Err(_) => {
                log::warn!("ignoring invalid PORT {:?}", s);
                config.server.port
            }
        },
        _ => config.server.port,
    }
}

/// Resolve all secrets (env over config); fails naming every missing one.
pub fn resolve_credentials(config: &Config) -> Result<Credentials> {
    credentials_from(
        resolve_app_id(config),
        resolve_app_secret(config),
        resolve_webhook_secret(config),
        resolve_weather_key(config),
    )
}

/// Assemble credentials from already-resolved values; fails naming every missing one.
pub fn credentials_from(
    app_id: Option<String>,
    app_secret: Option<String>,
    webhook_secret: Option<String>,
    weather_key: Option<String>,
) -> Result<Credentials> {
    let mut missing = Vec::new();
    if app_id.is_none() {
        missing.push("workspace.appId / WEATHERBOT_APP_ID");
    }
    if app_secret.is_none() {
        missing.push("workspace.appSecret / WEATHERBOT_APP_SECRET");
    }
    if webhook_secret.is_none() {
        missing.push("workspace.webhookSecret / WEATHERBOT_WEBHOOK_SECRET");
    }
    if weather_key.is_none() {
        missing.push("weather.apiKey / WEATHERBOT_WEATHER_KEY");
    }
    match (app_id, app_secret, webhook_secret, weather_key) {
        (Some(app_id), Some(app_secret), Some(webhook_secret), Some(weather_key)) => {
            Ok(Credentials {
                app_id,
                app_secret,
                webhook_secret,
                weather_key,
            })
        }
        _ => anyhow::bail!("missing required settings: {}", missing.join(", ")),
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("WEATHERBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".weatherbot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, WEATHERBOT_CONFIG_PATH, or the default. Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
