//! Edit-mode keyboard shortcuts
//!
//! Shortcuts are configured as strings like `"Ctrl+Shift+E"` and parsed with
//! `global-hotkey`, the same parser the global shortcut plugin uses.

pub use global_hotkey::hotkey::HotKeyParseError;
pub use global_hotkey::hotkey::{Code, HotKey as Shortcut, Modifiers};

use hudsnap_types::HotkeySettings;

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    ToggleEditMode,
    /// Only honoured while edit mode is active
    ResetAll,
    ExitEditMode,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 3] = [
        HotkeyAction::ToggleEditMode,
        HotkeyAction::ResetAll,
        HotkeyAction::ExitEditMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HotkeyAction::ToggleEditMode => "toggle edit mode",
            HotkeyAction::ResetAll => "reset all",
            HotkeyAction::ExitEditMode => "exit edit mode",
        }
    }

    /// The configured shortcut string, `None` when disabled or blank
    pub fn configured(self, settings: &HotkeySettings) -> Option<&str> {
        let value = match self {
            HotkeyAction::ToggleEditMode => settings.toggle_edit_mode.as_deref(),
            HotkeyAction::ResetAll => settings.reset_all.as_deref(),
            HotkeyAction::ExitEditMode => settings.exit_edit_mode.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Resolved shortcut bindings
#[derive(Debug, Clone, Default)]
pub struct Hotkeys {
    bindings: Vec<(Shortcut, HotkeyAction)>,
}

impl Hotkeys {
    /// Parse every configured shortcut. Invalid entries are logged and skipped.
    pub fn from_settings(settings: &HotkeySettings) -> Self {
        let mut bindings: Vec<(Shortcut, HotkeyAction)> = Vec::new();
        for action in HotkeyAction::ALL {
            let Some(value) = action.configured(settings) else {
                continue;
            };
            match value.parse::<Shortcut>() {
                Ok(shortcut) => {
                    if let Some((_, existing)) = bindings.iter().find(|(s, _)| *s == shortcut) {
                        tracing::warn!(shortcut = value, action = action.name(),
                            existing = HotkeyAction::name(*existing), "Shortcut already bound, skipping");
                        continue;
                    }
                    bindings.push((shortcut, action));
                }
                Err(e) => {
                    tracing::warn!(action = action.name(), value, error = %e, "Invalid shortcut, skipping");
                }
            }
        }
        Self { bindings }
    }

    pub fn action_for(&self, shortcut: &Shortcut) -> Option<HotkeyAction> {
        self.bindings
            .iter()
            .find(|(s, _)| s == shortcut)
            .map(|(_, action)| *action)
    }

    pub fn shortcut_for(&self, action: HotkeyAction) -> Option<&Shortcut> {
        self.bindings
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(s, _)| s)
    }
}
