//! In-memory surface used by the REPL and tests
//!
//! Behaves like a real backend (buffer, commits, click-through state) and can
//! dump the last committed frame to a PNG file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hudsnap_types::Rect;

use super::{OverlaySurface, PlatformError};
use crate::renderer::Renderer;

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    click_through: bool,
    input_region: Vec<Rect>,
    commits: u64,
    last_damage: Vec<Rect>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, PlatformError> {
        if width == 0 || height == 0 {
            return Err(PlatformError::BufferError(format!(
                "invalid surface size {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            buffer: Renderer::create_buffer(width, height),
            click_through: true,
            input_region: Vec::new(),
            commits: 0,
            last_damage: Vec::new(),
        })
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn last_damage(&self) -> &[Rect] {
        &self.last_damage
    }

    pub fn input_region(&self) -> &[Rect] {
        &self.input_region
    }

    /// Premultiplied RGBA at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.buffer.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Write the current buffer as a straight-alpha RGBA PNG
    pub fn save_png(&self, path: &Path) -> Result<(), PlatformError> {
        let file = File::create(path)
            .map_err(|e| PlatformError::ExportFailed(format!("{}: {}", path.display(), e)))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| PlatformError::ExportFailed(e.to_string()))?;
        writer
            .write_image_data(&demultiply(&self.buffer))
            .map_err(|e| PlatformError::ExportFailed(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| PlatformError::ExportFailed(e.to_string()))
    }
}

impl OverlaySurface for HeadlessSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PlatformError> {
        if width == 0 || height == 0 {
            return Err(PlatformError::BufferError(format!(
                "invalid surface size {}x{}",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        self.buffer = Renderer::create_buffer(width, height);
        Ok(())
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.buffer)
    }

    fn commit(&mut self, damage: &[Rect]) {
        self.commits += 1;
        self.last_damage = damage.to_vec();
    }

    fn set_click_through(&mut self, enabled: bool) {
        self.click_through = enabled;
    }

    fn is_click_through(&self) -> bool {
        self.click_through
    }

    fn set_input_region(&mut self, region: &[Rect]) {
        self.input_region = region.to_vec();
    }
}

/// Premultiplied to straight alpha
fn demultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demultiply() {
        assert_eq!(demultiply(&[64, 0, 128, 128]), vec![128, 0, 255, 128]);
        assert_eq!(demultiply(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(HeadlessSurface::new(0, 10).is_err());
        let mut surface = HeadlessSurface::new(4, 4).unwrap();
        assert!(surface.resize(4, 0).is_err());
        assert_eq!(surface.width(), 4);
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        let surface = HeadlessSurface::new(8, 8).unwrap();
        surface.save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
