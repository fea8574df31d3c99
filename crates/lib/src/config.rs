//! Configuration types and loading.
//!
//! Config is loaded from an optional JSON file (e.g. `~/.pigeon/config.json`) and then
//! overlaid with the process environment. Once resolved at startup it is never mutated;
//! components receive the section they need.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Discord bot token (required).
pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";
/// Environment variable holding the Hugging Face inference token.
pub const ENV_HF_TOKEN: &str = "HF_TOKEN";
/// Environment variable selecting the Hugging Face model.
pub const ENV_HF_MODEL: &str = "HF_MODEL";
/// Environment variable holding the NewsAPI.org key.
pub const ENV_NEWS_API: &str = "NEWS_API";
/// Environment variable for the liveness port.
pub const ENV_PORT: &str = "PORT";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Discord gateway session settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Text-generation inference endpoint.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// News-search endpoint.
    #[serde(default)]
    pub news: NewsConfig,

    /// Liveness HTTP responder.
    #[serde(default)]
    pub health: HealthConfig,
}

/// Discord bot credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Bot token. Overridden by DISCORD_TOKEN env when set.
    pub token: Option<String>,
}

/// Hugging Face inference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Bearer token. Overridden by HF_TOKEN env. When absent no Authorization header is sent and the provider rejects the call.
    pub token: Option<String>,

    /// Model id appended to the base URL (default "google/flan-t5-large"). Overridden by HF_MODEL env.
    #[serde(default = "default_inference_model")]
    pub model: String,

    /// Base URL for model endpoints; the model id is appended as a path.
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds (default 60).
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

/// NewsAPI.org settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsConfig {
    /// API key. Overridden by NEWS_API env. When absent `!news` answers with a fixed notice.
    pub api_key: Option<String>,

    /// Search endpoint (default the NewsAPI `everything` endpoint).
    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Number of results requested from the service (default 5). Only the first three are shown.
    #[serde(default = "default_news_page_size")]
    pub page_size: u32,

    /// Per-call timeout in seconds (default 20).
    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,
}

/// Liveness responder bind address and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthConfig {
    /// Bind address (default "0.0.0.0" so hosting platforms can probe it).
    #[serde(default = "default_health_bind")]
    pub bind: String,

    /// Port (default 3000). Overridden by PORT env.
    #[serde(default = "default_health_port")]
    pub port: u16,
}

fn default_inference_model() -> String {
    "google/flan-t5-large".to_string()
}

fn default_inference_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_inference_timeout() -> u64 {
    60
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_news_page_size() -> u32 {
    5
}

fn default_news_timeout() -> u64 {
    20
}

fn default_health_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_health_port() -> u16 {
    3000
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            token: None,
            model: default_inference_model(),
            base_url: default_inference_base_url(),
            timeout_secs: default_inference_timeout(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
            page_size: default_news_page_size(),
            timeout_secs: default_news_timeout(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            bind: default_health_bind(),
            port: default_health_port(),
        }
    }
}

/// Trimmed, non-empty value or None.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Overlay environment values onto `config`. `lookup` returns the raw value of a variable, if set.
/// Empty values are ignored; an unparsable PORT is logged and ignored.
pub fn apply_env<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_empty(lookup(ENV_DISCORD_TOKEN)) {
        config.discord.token = Some(token);
    }
    if let Some(token) = non_empty(lookup(ENV_HF_TOKEN)) {
        config.inference.token = Some(token);
    }
    if let Some(model) = non_empty(lookup(ENV_HF_MODEL)) {
        config.inference.model = model;
    }
    if let Some(key) = non_empty(lookup(ENV_NEWS_API)) {
        config.news.api_key = Some(key);
    }
    if let Some(port) = non_empty(lookup(ENV_PORT)) {
        match port.parse::<u16>() {
            Ok(p) => config.health.port = p,
            Err(_) => log::warn!("ignoring invalid {} value: {}", ENV_PORT, port),
        }
    }
    config
}

/// Overlay the process environment onto `config`.
pub fn apply_process_env(config: Config) -> Config {
    apply_env(config, |name| std::env::var(name).ok())
}

/// The Discord token, or an error when none is configured (file or DISCORD_TOKEN env).
pub fn require_discord_token(config: &Config) -> Result<String> {
    non_empty(config.discord.token.clone())
        .with_context(|| format!("{} not set", ENV_DISCORD_TOKEN))
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("PIGEON_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".pigeon").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, or the default path (or PIGEON_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used. Environment overrides are not applied here.
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
