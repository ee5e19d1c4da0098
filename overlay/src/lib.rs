//! HUDSNAP Overlay Library
//!
//! Software rendering of hosted widgets, edit-mode chrome and snap guides
//! onto a transparent full-screen surface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      scene                          │
//! │    damage-driven repaint, click-through syncing     │
//! ├─────────────────────────────────────────────────────┤
//! │               chrome          guides                │
//! │    widget shells, handles     dashed snap lines     │
//! ├─────────────────────────────────────────────────────┤
//! │                    renderer                         │
//! │            tiny-skia + cosmic-text                  │
//! │              (drawing primitives)                   │
//! ├─────────────────────────────────────────────────────┤
//! │                    platform/                        │
//! │        OverlaySurface trait, headless backend       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod chrome;
pub mod colors;
pub mod guides;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod utils;

// Re-export commonly used types
pub use guides::{GuideRenderer, GuideStyle};
pub use platform::{HeadlessSurface, OverlaySurface, PlatformError};
pub use renderer::Renderer;
pub use scene::Scene;

// Re-export tiny_skia Color for external use
pub use tiny_skia::Color;
