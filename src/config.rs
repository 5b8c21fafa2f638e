//! Configuration: optional TOML file, then environment overrides.
//!
//! Every section has defaults, so running without a file is valid. The
//! environment wins over the file for the variables the CMS deployment
//! already sets:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `CORS_ORIGINS` | `[cors].origins` |
//! | `CORS_ORIGIN_PATTERNS` | `[cors].origin_patterns` |
//! | `MEILISEARCH_HOST` | `[search].host` |
//! | `MEILISEARCH_API_KEY` | `[search].api_key` |
//! | `CGATE_BIND` | `[server].bind` |
//!
//! Array variables accept `a,b` or `[a,b]`; elements are trimmed and may be
//! wrapped in double quotes.

use anyhow::{bail, Context, Result};
use content_gate_core::OriginAllowList;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:1337".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Exact origins (scheme + host + optional port).
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
    /// Wildcard origins; `*` stands for one subdomain label.
    #[serde(default)]
    pub origin_patterns: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
            origin_patterns: Vec::new(),
        }
    }
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Base URL of the search service. Empty means not configured.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    5
}

impl SearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Compile the configured origins into an allow-list.
    pub fn origin_allow_list(&self) -> Result<OriginAllowList> {
        OriginAllowList::new(self.cors.origins.iter().cloned(), &self.cors.origin_patterns)
            .context("Invalid [cors] configuration")
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.cors.origins = parse_env_array(&v);
        }
        if let Some(v) = lookup("CORS_ORIGIN_PATTERNS") {
            self.cors.origin_patterns = parse_env_array(&v);
        }
        if let Some(v) = lookup("MEILISEARCH_HOST") {
            self.search.host = v;
        }
        if let Some(v) = lookup("MEILISEARCH_API_KEY") {
            self.search.api_key = v;
        }
        if let Some(v) = lookup("CGATE_BIND") {
            self.server.bind = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }

        if self.search.timeout_secs == 0 {
            bail!("search.timeout_secs must be > 0");
        }

        // Bad patterns fail here, at startup, never per request.
        self.origin_allow_list()?;

        Ok(())
    }
}

/// Parse an array-valued environment variable.
///
/// `[a, "b" ,c]` and `a,b,c` both yield `["a", "b", "c"]`. Empty elements
/// are dropped.
pub fn parse_env_array(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|item| item.trim().trim_matches('"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load configuration from an optional TOML file plus the process
/// environment, then validate it.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse config file")?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}
