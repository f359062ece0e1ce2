use std::path::PathBuf;

use crate::bootstrap::AppPaths;
use crate::config::schema::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub server_url: Option<String>,
    pub list_interval_ms: Option<u64>,
    pub detail_interval_ms: Option<u64>,
    pub log_level: Option<String>,
}

pub fn load_config(paths: &AppPaths, overrides: &CliOverrides) -> AppResult<AppConfig> {
    let config_path = overrides
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file.clone());

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<AppConfig>(&raw)?
    } else {
        let defaults = AppConfig::default();
        write_default_config(&config_path, &defaults)?;
        defaults
    };

    apply_env_overrides(&mut config);
    apply_cli_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn write_default_config(path: &PathBuf, defaults: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(defaults)?;
    std::fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn validate(config: &AppConfig) -> AppResult<()> {
    if config.server.base_url.trim().is_empty() {
        return Err(AppError::Config("server.base_url must not be empty".to_owned()));
    }
    if !is_http_url(&config.server.base_url) {
        return Err(AppError::Config(
            "server.base_url must start with http:// or https://".to_owned(),
        ));
    }
    if config.polling.list_interval_ms == 0 {
        return Err(AppError::Config(
            "polling.list_interval_ms must be > 0".to_owned(),
        ));
    }
    if config.polling.detail_interval_ms == 0 {
        return Err(AppError::Config(
            "polling.detail_interval_ms must be > 0".to_owned(),
        ));
    }
    Ok(())
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(value) = std::env::var("ACTAS_SERVER_URL") {
        if !value.trim().is_empty() {
            config.server.base_url = value;
        }
    }
    if let Ok(value) = std::env::var("ACTAS_LIST_INTERVAL_MS") {
        if let Ok(parsed) = value.parse::<u64>() {
            config.polling.list_interval_ms = parsed;
        }
    }
    if let Ok(value) = std::env::var("ACTAS_DETAIL_INTERVAL_MS") {
        if let Ok(parsed) = value.parse::<u64>() {
            config.polling.detail_interval_ms = parsed;
        }
    }
    if let Ok(value) = std::env::var("ACTAS_LOG_LEVEL") {
        if !value.trim().is_empty() {
            config.diagnostics.log_level = value;
        }
    }
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(url) = &overrides.server_url {
        config.server.base_url = url.clone();
    }
    if let Some(interval) = overrides.list_interval_ms {
        config.polling.list_interval_ms = interval;
    }
    if let Some(interval) = overrides.detail_interval_ms {
        config.polling.detail_interval_ms = interval;
    }
    if let Some(level) = &overrides.log_level {
        config.diagnostics.log_level = level.clone();
    }
}
