mod config;
mod error;

pub use config::{
    AppConfig, AppConfigExt, Color, HotkeySettings, LayoutSettings, config_path, overlay_colors,
};
pub use error::ConfigError;
