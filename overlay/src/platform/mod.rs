//! Platform abstraction for the overlay surface
//!
//! The overlay is one full-screen transparent surface. Backends implement
//! `OverlaySurface` so the scene can paint and manage input transparency
//! without knowing about the window system.

pub mod headless;

pub use headless::HeadlessSurface;

use hudsnap_types::{Rect, Size};

/// Errors that can occur in platform operations
#[derive(Debug)]
pub enum PlatformError {
    /// Buffer/memory allocation failed
    BufferError(String),
    /// Writing a frame out failed
    ExportFailed(String),
    /// Generic platform error
    Other(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::BufferError(s) => write!(f, "Buffer error: {}", s),
            PlatformError::ExportFailed(s) => write!(f, "Export failed: {}", s),
            PlatformError::Other(s) => write!(f, "Platform error: {}", s),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Trait that every surface backend implements
pub trait OverlaySurface {
    /// Current width in pixels
    fn width(&self) -> u32;

    /// Current height in pixels
    fn height(&self) -> u32;

    fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    /// Reallocate for a new screen size. The buffer contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), PlatformError>;

    /// Mutable access to the premultiplied RGBA pixel buffer, if one is
    /// currently mapped
    fn pixel_buffer(&mut self) -> Option<&mut [u8]>;

    /// Present the buffer. `damage` lists the regions that changed.
    fn commit(&mut self, damage: &[Rect]);

    /// Let all input fall through to the window underneath
    fn set_click_through(&mut self, enabled: bool);

    fn is_click_through(&self) -> bool;

    /// Regions that should still receive input while the rest passes through
    fn set_input_region(&mut self, region: &[Rect]);
}
