//! Shared types for HUDSNAP
//!
//! This crate contains the geometry primitives and serializable configuration
//! types shared between the layout engine (hudsnap-core), the renderer
//! (hudsnap-overlay) and the binary.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub mod geometry;

pub use geometry::{Point, Rect, Size, clamp_position};

// ─────────────────────────────────────────────────────────────────────────────
// Widget Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identifier of a HUD widget (e.g. `"workerStatus"`).
///
/// Ordering is plain string ordering; snap tie-breaks rely on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for WidgetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Colors
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as [r, g, b, a] bytes
pub type Color = [u8; 4];

/// Default palette for edit-mode chrome and snap guides
pub mod overlay_colors {
    use super::Color;

    pub const CONTAINER_GUIDE: Color = [255, 80, 200, 230]; // Magenta
    pub const WIDGET_GUIDE: Color = [60, 200, 255, 230]; // Cyan
    pub const EDIT_BORDER: Color = [255, 255, 255, 200];
    pub const EDIT_FILL: Color = [30, 30, 30, 60];
    pub const HANDLE: Color = [200, 200, 200, 220];
    pub const RESET_BUTTON: Color = [200, 70, 70, 230];
    pub const LABEL: Color = [230, 230, 230, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_snap_threshold() -> f32 {
    8.0
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_container_width() -> f32 {
    1920.0
}

fn default_container_height() -> f32 {
    1080.0
}

fn default_container_guide_color() -> Color {
    overlay_colors::CONTAINER_GUIDE
}

fn default_widget_guide_color() -> Color {
    overlay_colors::WIDGET_GUIDE
}

fn default_true() -> bool {
    true
}

/// Layout engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Maximum distance (px) at which an edge snaps to a line
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f32,
    /// Installation namespace; the layout file lives under this directory
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Container size used until the platform reports the real one
    #[serde(default = "default_container_width")]
    pub container_width: f32,
    #[serde(default = "default_container_height")]
    pub container_height: f32,
    /// Show text labels next to guide lines
    #[serde(default = "default_true")]
    pub guide_labels: bool,
    #[serde(default = "default_container_guide_color")]
    pub container_guide_color: Color,
    #[serde(default = "default_widget_guide_color")]
    pub widget_guide_color: Color,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            snap_threshold: default_snap_threshold(),
            namespace: default_namespace(),
            container_width: default_container_width(),
            container_height: default_container_height(),
            guide_labels: true,
            container_guide_color: default_container_guide_color(),
            widget_guide_color: default_widget_guide_color(),
        }
    }
}

impl LayoutSettings {
    /// Configured container size, or 1920x1080 when the configured values
    /// are zero, negative or not finite
    pub fn container_size(&self) -> Size {
        let size = Size::new(self.container_width, self.container_height);
        if size.is_valid() {
            size
        } else {
            Size::new(default_container_width(), default_container_height())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hotkeys
// ─────────────────────────────────────────────────────────────────────────────

fn default_toggle_edit_mode() -> Option<String> {
    Some("Ctrl+Shift+E".to_string())
}

fn default_reset_all() -> Option<String> {
    Some("Ctrl+Shift+R".to_string())
}

fn default_exit_edit_mode() -> Option<String> {
    Some("Escape".to_string())
}

/// Global shortcuts, stored as strings like `"Ctrl+Shift+E"`.
/// `None` disables the shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeySettings {
    #[serde(default = "default_toggle_edit_mode")]
    pub toggle_edit_mode: Option<String>,
    /// Only honoured while edit mode is active
    #[serde(default = "default_reset_all")]
    pub reset_all: Option<String>,
    #[serde(default = "default_exit_edit_mode")]
    pub exit_edit_mode: Option<String>,
}

impl Default for HotkeySettings {
    fn default() -> Self {
        Self {
            toggle_edit_mode: default_toggle_edit_mode(),
            reset_all: default_reset_all(),
            exit_edit_mode: default_exit_edit_mode(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level persisted configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub hotkeys: HotkeySettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: LayoutSettings = serde_json::from_str(r#"{"snap_threshold": 12.0}"#).unwrap();
        assert_eq!(config.snap_threshold, 12.0);
        assert_eq!(config.namespace, "default");
        assert_eq!(config.container_size(), Size::new(1920.0, 1080.0));
    }

    #[test]
    fn test_disabled_hotkey_survives_roundtrip() {
        let hotkeys = HotkeySettings {
            reset_all: None,
            ..Default::default()
        };
        let json = serde_json::to_string(&hotkeys).unwrap();
        let back: HotkeySettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reset_all, None);
        assert_eq!(back.toggle_edit_mode.as_deref(), Some("Ctrl+Shift+E"));
    }

    #[test]
    fn test_unusable_container_size_falls_back() {
        let mut layout = LayoutSettings {
            container_width: 0.0,
            ..Default::default()
        };
        assert_eq!(layout.container_size(), Size::new(1920.0, 1080.0));

        layout.container_width = 1280.0;
        layout.container_height = f32::NAN;
        assert_eq!(layout.container_size(), Size::new(1920.0, 1080.0));

        layout.container_height = -720.0;
        assert_eq!(layout.container_size(), Size::new(1920.0, 1080.0));

        layout.container_height = 720.0;
        assert_eq!(layout.container_size(), Size::new(1280.0, 720.0));
    }

    #[test]
    fn test_widget_id_orders_lexically() {
        let mut ids = vec![WidgetId::from("upgrade"), WidgetId::from("population")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "population");
    }
}
