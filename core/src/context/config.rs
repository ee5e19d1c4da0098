//! Application configuration
//!
//! Re-exports the shared settings types from hudsnap-types and adds confy
//! persistence for `AppConfig`.

use std::path::Path;

pub use hudsnap_types::{AppConfig, Color, HotkeySettings, LayoutSettings, overlay_colors};

use super::ConfigError;
use crate::host::{HotkeyAction, Shortcut};

const APP_NAME: &str = "hudsnap";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and validation
pub trait AppConfigExt: Sized {
    /// Load from the default location, falling back to defaults on any error
    fn load() -> Self;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    /// Parse every configured shortcut
    fn validate_hotkeys(&self) -> Result<(), ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load::<AppConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                AppConfig::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn validate_hotkeys(&self) -> Result<(), ConfigError> {
        for action in HotkeyAction::ALL {
            let Some(value) = action.configured(&self.hotkeys) else {
                continue;
            };
            value
                .parse::<Shortcut>()
                .map_err(|source| ConfigError::InvalidShortcut {
                    action: action.name(),
                    value: value.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

/// Location confy uses for the config file
pub fn config_path() -> Result<std::path::PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.layout.snap_threshold = 12.0;
        config.layout.namespace = "second-monitor".to_string();
        config.hotkeys.reset_all = Some("Ctrl+Alt+R".to_string());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_invalid_shortcut_is_reported() {
        let mut config = AppConfig::default();
        assert!(config.validate_hotkeys().is_ok());

        config.hotkeys.toggle_edit_mode = Some("Ctrl+Hyper+".to_string());
        let err = config.validate_hotkeys().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidShortcut { action: "toggle edit mode", .. }
        ));
    }
}
