//! Configuration loading.
//!
//! Reads `config.toml` from the data directory (`~/.ppss/` by default) and
//! deserializes it into [`PpssConfig`], falling back to defaults when the
//! file is missing or malformed. A few environment variables then override
//! individual fields.

use std::path::{Path, PathBuf};

use ppss_types::config::PpssConfig;

/// Data directory override.
pub const DATA_DIR_ENV: &str = "PPSS_DATA_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory: `PPSS_DATA_DIR`, else `~/.ppss`, else `./.ppss`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ppss")
}

/// Load `{data_dir}/config.toml` and apply environment overrides.
pub async fn load_config(data_dir: &Path) -> PpssConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

async fn load_config_file(data_dir: &Path) -> PpssConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return PpssConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return PpssConfig::default();
        }
    };

    match toml::from_str::<PpssConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            PpssConfig::default()
        }
    }
}

/// Environment wins over the file for these keys.
fn apply_env_overrides(config: &mut PpssConfig, env: impl Fn(&str) -> Option<String>) {
    let non_blank = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_blank("OPENAI_BASE_URL") {
        config.gateway.base_url = url;
    }
    if let Some(model) = non_blank("OPENAI_MODEL") {
        config.gateway.model = model;
    }
    if let Some(url) = non_blank("PPSS_DATABASE_URL") {
        config.database.url = Some(url);
    }
}
