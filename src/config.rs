use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
    /// Base URL of the metadata service, e.g. `http://localhost:5000`.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_provider")]
    pub provider: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_cache_provider(),
            ttl_secs: default_ttl_secs(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_cache_provider() -> String {
    "memory".to_string()
}
fn default_ttl_secs() -> u64 {
    300
}
fn default_key_prefix() -> String {
    "recommendation:".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate metadata
    if config.metadata.base_url.trim().is_empty() {
        anyhow::bail!("metadata.base_url must not be empty");
    }
    if config.metadata.timeout_secs == 0 {
        anyhow::bail!("metadata.timeout_secs must be > 0");
    }

    // Validate ranking
    if config.ranking.top_k < 1 {
        anyhow::bail!("ranking.top_k must be >= 1");
    }

    // Validate cache
    if config.cache.is_enabled() && config.cache.ttl_secs == 0 {
        anyhow::bail!("cache.ttl_secs must be > 0 when caching is enabled");
    }

    match config.cache.provider.as_str() {
        "memory" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown cache provider: '{}'. Must be memory or disabled.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_applied() {
        let file = write_config(
            r#"
[metadata]
base_url = "http://localhost:5000"

[server]
bind = "127.0.0.1:8000"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.cache.provider, "memory");
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.key_prefix, "recommendation:");
        assert_eq!(config.ranking.top_k, 5);
        assert_eq!(config.metadata.max_retries, 3);
    }

    #[test]
    fn test_rejects_unknown_cache_provider() {
        let file = write_config(
            r#"
[metadata]
base_url = "http://localhost:5000"

[cache]
provider = "redis"

[server]
bind = "127.0.0.1:8000"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown cache provider"));
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let file = write_config(
            r#"
[metadata]
base_url = "http://localhost:5000"

[ranking]
top_k = 0

[server]
bind = "127.0.0.1:8000"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let file = write_config(
            r#"
[metadata]
base_url = ""

[server]
bind = "127.0.0.1:8000"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }
}
