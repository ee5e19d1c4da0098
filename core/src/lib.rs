pub mod context;
pub mod drag;
pub mod host;
pub mod snap;
pub mod storage;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, ConfigError, HotkeySettings, LayoutSettings};
pub use drag::{DragController, DragEnd, DragState, DragUpdate, FrameClock, PointerId, PressTarget};
pub use host::{
    FrameOutput, HotkeyAction, Hotkeys, OverlayHost, PointerResponse, Shortcut, WidgetControls,
    WidgetSpec, WidgetView,
};
pub use hudsnap_types::{Point, Rect, Size, WidgetId, clamp_position};
pub use snap::{GuideKind, GuideSource, OverlayGeometry, SnapGuide, SnapManager, SnapResult};
pub use storage::{LayoutSink, PersistedLayout, PositionStore, StorageError};
