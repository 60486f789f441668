use crate::statics;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings that persist between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dark_theme: bool,
    /// Starting directory for file dialogs.
    pub last_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { dark_theme: true, last_dir: None }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(statics::CONFIG_DIR_NAME)
            .join(statics::CONFIG_FILE_NAME)
    }

    /// Read the config file. Missing or unreadable files fall back to
    /// defaults; a broken config never blocks startup.
    pub fn load() -> AppConfig {
        let path = Self::config_path();
        let Ok(text) = std::fs::read_to_string(&path) else {
            return AppConfig::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                AppConfig::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {parent:?}"))?;
        }
        let text = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(&path, text).with_context(|| format!("writing {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn defaults_prefer_dark_theme() {
        let config = AppConfig::default();
        assert!(config.dark_theme);
        assert!(config.last_dir.is_none());
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            dark_theme: false,
            last_dir: Some("/tmp/somewhere".into()),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: AppConfig = toml::from_str("dark_theme = false").unwrap();
        assert!(!config.dark_theme);
        assert!(config.last_dir.is_none());
    }
}
