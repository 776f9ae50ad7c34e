//! Configuration loading

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::Config;

/// Load configuration from config file or environment variables
///
/// Config file search order:
/// 1. `explicit` path (e.g. from a `--config` flag)
/// 2. `CINEWATCH_CONFIG_PATH` environment variable
/// 3. ./config.yaml (current working directory)
/// 4. Fall back to environment variables only
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    if let Some(path) = explicit {
        anyhow::ensure!(Path::new(path).exists(), "Config file {path} does not exist");
    }

    let config_path = explicit
        .map(str::to_string)
        .or_else(|| {
            std::env::var("CINEWATCH_CONFIG_PATH")
                .ok()
                .filter(|p| Path::new(p).exists())
        })
        .or_else(|| Path::new("config.yaml").exists().then(|| "config.yaml".to_string()));

    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {path}");
            // an explicitly named file that fails to parse is an error, not a fallback
            Config::from_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load {path}: {e}"))?
        }
        None => Config::from_env().unwrap_or_else(|e| {
            eprintln!("Failed to load config from environment: {e}");
            eprintln!("Using default configuration");
            Config::default()
        }),
    };

    // Validate configuration (fail fast on misconfigurations)
    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    info!(
        source_api = %config.providers.source_api_url,
        embeds = config.providers.embeds.len(),
        tmdb = config.has_tmdb_key(),
        "Configuration loaded and validated"
    );

    Ok(config)
}
