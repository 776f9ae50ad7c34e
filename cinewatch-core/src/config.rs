use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub providers: ProvidersConfig,
    pub tmdb: TmdbConfig,
    pub player: PlayerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
    /// Emit player analytics events (`analytics` target)
    pub analytics: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
            analytics: true,
        }
    }
}

/// Source provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Base URL of the primary source API
    pub source_api_url: String,
    /// HTTP timeout for every upstream call
    pub timeout_seconds: u64,
    /// Secondary embed providers, queried and merged in this order
    pub embeds: Vec<EmbedProviderConfig>,
    pub fallback: FallbackConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            source_api_url: "http://localhost:3000".to_string(),
            timeout_seconds: 10,
            embeds: vec![
                EmbedProviderConfig::new("vidsrc"),
                EmbedProviderConfig::new("vidlink"),
            ],
            fallback: FallbackConfig::default(),
        }
    }
}

/// One secondary embed provider instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedProviderConfig {
    /// Builder type: vidsrc, vidlink, vidjoy or rivestream
    pub kind: String,
    /// Overrides the builder's default host
    #[serde(default)]
    pub base_url: Option<String>,
    /// Mirror server (rivestream only)
    #[serde(default)]
    pub server: Option<u8>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl EmbedProviderConfig {
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            base_url: None,
            server: None,
            enabled: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Hosts used by the last-resort fallback players
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub vidjoy_base_url: String,
    pub rivestream_base_url: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            vidjoy_base_url: cinewatch_media_providers::VidjoyEmbed::DEFAULT_BASE_URL.to_string(),
            rivestream_base_url: cinewatch_media_providers::RivestreamEmbed::DEFAULT_BASE_URL
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: cinewatch_media_providers::TmdbClient::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
        }
    }
}

/// Player behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seconds skipped by the arrow keys
    pub seek_step: f64,
    /// Volume change per arrow key press
    pub volume_step: f64,
    /// Minimum media time between two progress writes (0 = every update)
    pub progress_interval: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            seek_step: 10.0,
            volume_step: 0.1,
            progress_interval: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON state file holding progress, ratings and lists
    pub state_file: String,
    /// Keep state in memory only
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: "cinewatch-state.json".to_string(),
            in_memory: false,
        }
    }
}

const KNOWN_EMBEDS: &[&str] = &["vidsrc", "vidlink", "vidjoy", "rivestream"];

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // CINEWATCH_PLAYER__SEEK_STEP, CINEWATCH_TMDB__API_KEY, ...
        builder = builder.add_source(
            Environment::with_prefix("CINEWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if crate::logging::parse_log_level(&self.logging.level).is_err() {
            errors.push(format!("logging.level '{}' is not a valid level", self.logging.level));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            ));
        }

        if url::Url::parse(&self.providers.source_api_url).is_err() {
            errors.push(format!(
                "providers.source_api_url '{}' is not a valid URL",
                self.providers.source_api_url
            ));
        }
        if self.providers.timeout_seconds == 0 {
            errors.push("providers.timeout_seconds must be greater than 0".to_string());
        }
        for embed in &self.providers.embeds {
            if !KNOWN_EMBEDS.contains(&embed.kind.as_str()) {
                errors.push(format!("providers.embeds: unknown provider '{}'", embed.kind));
            }
            if let Some(base_url) = &embed.base_url {
                if url::Url::parse(base_url).is_err() {
                    errors.push(format!(
                        "providers.embeds[{}].base_url '{base_url}' is not a valid URL",
                        embed.kind
                    ));
                }
            }
        }

        if !(self.player.seek_step.is_finite() && self.player.seek_step > 0.0) {
            errors.push("player.seek_step must be a positive number".to_string());
        }
        if !(self.player.volume_step > 0.0 && self.player.volume_step <= 1.0) {
            errors.push("player.volume_step must be in (0, 1]".to_string());
        }
        if !(self.player.progress_interval.is_finite() && self.player.progress_interval >= 0.0) {
            errors.push("player.progress_interval must be zero or positive".to_string());
        }

        if !self.storage.in_memory && self.storage.state_file.trim().is_empty() {
            errors.push("storage.state_file must be set unless storage.in_memory".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether TMDB metadata can be fetched
    #[must_use]
    pub fn has_tmdb_key(&self) -> bool {
        !self.tmdb.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.seek_step, 10.0);
        assert_eq!(config.player.volume_step, 0.1);
        assert_eq!(config.providers.embeds.len(), 2);
        assert_eq!(config.providers.embeds[0].kind, "vidsrc");
        assert!(!config.has_tmdb_key());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        config.providers.timeout_seconds = 0;
        config.providers.embeds.push(EmbedProviderConfig::new("nope"));
        config.player.volume_step = 2.0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("nope")));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "player:\n  seek_step: 5\nproviders:\n  embeds:\n    - kind: rivestream\n      server: 3\ntmdb:\n  api_key: abc"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.player.seek_step, 5.0);
        assert_eq!(config.player.volume_step, 0.1);
        assert_eq!(config.providers.embeds.len(), 1);
        assert_eq!(config.providers.embeds[0].server, Some(3));
        assert!(config.providers.embeds[0].enabled);
        assert!(config.has_tmdb_key());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::from_file("/definitely/not/here.yaml").unwrap();
        assert_eq!(config.storage.state_file, "cinewatch-state.json");
    }
}
