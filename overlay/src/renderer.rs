//! Software renderer using tiny-skia and cosmic-text
//!
//! Everything is drawn on the CPU into a premultiplied RGBA buffer owned by
//! the surface. An optional clip rectangle restricts every primitive, which
//! is how the scene repaints only damaged regions.
#![allow(clippy::too_many_arguments)]
use std::collections::HashMap;

use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, Family, FontSystem, LayoutGlyph, Metrics, Shaping,
    SwashCache,
};
use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, PixmapMut, Rect,
    Stroke, StrokeDash, Transform,
};

/// Shaped strings kept before the cache is pruned
const TEXT_CACHE_MAX_ENTRIES: usize = 256;

struct ShapedText {
    glyphs: Vec<LayoutGlyph>,
    width: f32,
    height: f32,
    last_used: u64,
}

/// Pixel-aligned clip region plus the mask tiny-skia needs for paths
struct Clip {
    mask: Mask,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

/// A software renderer for overlay content
pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Keyed by (text, font size in tenths of a pixel)
    text_cache: HashMap<(String, u32), ShapedText>,
    tick: u64,
    clip: Option<Clip>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            text_cache: HashMap::with_capacity(64),
            tick: 0,
            clip: None,
        }
    }

    /// Create a new pixel buffer (RGBA format)
    pub fn create_buffer(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width as usize) * (height as usize) * 4]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipping
    // ─────────────────────────────────────────────────────────────────────────

    /// Restrict drawing to `rect` (expanded to whole pixels), or lift the
    /// restriction with `None`
    pub fn set_clip(&mut self, rect: Option<Rect>, width: u32, height: u32) {
        self.clip = rect.and_then(|rect| {
            let left = (rect.left().floor() as i32).max(0);
            let top = (rect.top().floor() as i32).max(0);
            let right = (rect.right().ceil() as i32).min(width as i32);
            let bottom = (rect.bottom().ceil() as i32).min(height as i32);
            let pixel_rect = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)?;

            let mut mask = Mask::new(width, height)?;
            mask.fill_path(
                &PathBuilder::from_rect(pixel_rect),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
            Some(Clip {
                mask,
                left,
                top,
                right,
                bottom,
            })
        });
    }

    fn mask(&self) -> Option<&Mask> {
        self.clip.as_ref().map(|c| &c.mask)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fills
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill the whole buffer, ignoring the clip
    pub fn clear(&self, buffer: &mut [u8], width: u32, height: u32, color: Color) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) {
            pixmap.fill(color);
        }
    }

    /// Overwrite a rectangle with `color` (no blending)
    pub fn clear_rect(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.blend_mode = BlendMode::Source;
        pixmap.fill_rect(rect, &paint, Transform::identity(), self.mask());
    }

    pub fn fill_rect(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        pixmap.fill_rect(rect, &solid(color), Transform::identity(), self.mask());
    }

    pub fn fill_rounded_rect(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: Color,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        pixmap.fill_path(
            &path,
            &solid(color),
            FillRule::Winding,
            Transform::identity(),
            self.mask(),
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Strokes
    // ─────────────────────────────────────────────────────────────────────────

    /// Dashed rounded rectangle outline (edit-mode widget border)
    pub fn stroke_rounded_rect_dashed(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        stroke_width: f32,
        color: Color,
        dash_length: f32,
        gap_length: f32,
    ) {
        let Some(path) = rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            dash: StrokeDash::new(vec![dash_length, gap_length], 0.0),
            ..Default::default()
        };
        self.stroke(buffer, width, height, &path, &stroke, color);
    }

    /// Straight line; dashed when `dash` is `Some((dash, gap))`
    pub fn draw_line(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        from: (f32, f32),
        to: (f32, f32),
        stroke_width: f32,
        color: Color,
        dash: Option<(f32, f32)>,
    ) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Butt,
            dash: dash.and_then(|(on, off)| StrokeDash::new(vec![on, off], 0.0)),
            ..Default::default()
        };
        self.stroke(buffer, width, height, &path, &stroke, color);
    }

    fn stroke(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        path: &Path,
        stroke: &Stroke,
        color: Color,
    ) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) {
            pixmap.stroke_path(path, &solid(color), stroke, Transform::identity(), self.mask());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────────

    /// Shape `text` if it isn't cached yet. Returns (width, height).
    fn shape(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        let key = (text.to_string(), (font_size * 10.0).round() as u32);
        self.tick += 1;
        let tick = self.tick;

        if let Some(shaped) = self.text_cache.get_mut(&key) {
            shaped.last_used = tick;
            return (shaped.width, shaped.height);
        }

        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = Attrs::new().family(Family::Name("Noto Sans"));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut shaped = ShapedText {
            glyphs: Vec::new(),
            width: 0.0,
            height: 0.0,
            last_used: tick,
        };
        for run in buffer.layout_runs() {
            shaped.width = shaped.width.max(run.line_w);
            shaped.height += run.line_height;
            shaped.glyphs.extend(run.glyphs.iter().cloned());
        }
        let size = (shaped.width, shaped.height);

        self.text_cache.insert(key, shaped);
        self.prune_text_cache();
        size
    }

    /// Drop the least recently used quarter once the cache is full
    fn prune_text_cache(&mut self) {
        if self.text_cache.len() <= TEXT_CACHE_MAX_ENTRIES {
            return;
        }
        let mut ages: Vec<u64> = self.text_cache.values().map(|s| s.last_used).collect();
        ages.sort_unstable();
        let cutoff = ages[ages.len() / 4];
        self.text_cache.retain(|_, s| s.last_used > cutoff);
    }

    pub fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        self.shape(text, font_size)
    }

    /// Draw text with its baseline at `y`
    pub fn draw_text(
        &mut self,
        buffer: &mut [u8],
        buf_width: u32,
        buf_height: u32,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
    ) {
        self.shape(text, font_size);
        let key = (text.to_string(), (font_size * 10.0).round() as u32);
        let glyphs = match self.text_cache.get(&key) {
            Some(shaped) => shaped.glyphs.clone(),
            None => return,
        };
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, buf_width, buf_height) else {
            return;
        };

        let bounds = match &self.clip {
            Some(c) => (c.left, c.top, c.right, c.bottom),
            None => (0, 0, buf_width as i32, buf_height as i32),
        };
        let ink = color.to_color_u8();
        let ink = CosmicColor::rgba(ink.red(), ink.green(), ink.blue(), ink.alpha());

        for glyph in &glyphs {
            let physical = glyph.physical((x, y), 1.0);
            let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical.cache_key)
            else {
                continue;
            };
            blit_glyph(
                &mut pixmap,
                &image.data,
                image.placement.width,
                image.placement.height,
                physical.x + image.placement.left,
                physical.y - image.placement.top,
                ink,
                bounds,
            );
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Alpha-blend a coverage mask onto the pixmap inside `bounds` (l, t, r, b)
fn blit_glyph(
    pixmap: &mut PixmapMut,
    coverage: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: CosmicColor,
    bounds: (i32, i32, i32, i32),
) {
    let (left, top, right, bottom) = bounds;
    let stride = pixmap.width() as usize;
    let data = pixmap.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < top || py >= bottom {
            continue;
        }
        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < left || px >= right {
                continue;
            }
            let Some(&alpha) = coverage.get((gy as u32 * glyph_width + gx as u32) as usize) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }

            let idx = (py as usize * stride + px as usize) * 4;
            let Some(dst) = data.get_mut(idx..idx + 4) else {
                continue;
            };
            // Premultiplied source-over
            let src_a = alpha as u32 * color.a() as u32 / 255;
            let inv_a = 255 - src_a;
            dst[0] = ((color.r() as u32 * src_a + dst[0] as u32 * inv_a) / 255) as u8;
            dst[1] = ((color.g() as u32 * src_a + dst[1] as u32 * inv_a) / 255) as u8;
            dst[2] = ((color.b() as u32 * src_a + dst[2] as u32 * inv_a) / 255) as u8;
            dst[3] = (src_a + dst[3] as u32 * inv_a / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]
    }

    #[test]
    fn test_clip_limits_fills() {
        let mut renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(20, 20);
        renderer.set_clip(Rect::from_xywh(0.0, 0.0, 10.0, 20.0), 20, 20);
        renderer.fill_rect(&mut buffer, 20, 20, 0.0, 0.0, 20.0, 20.0, Color::WHITE);

        assert_eq!(pixel(&buffer, 20, 5, 5), [255, 255, 255, 255]);
        assert_eq!(pixel(&buffer, 20, 15, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_rect_overwrites() {
        let mut renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(10, 10);
        renderer.clear(&mut buffer, 10, 10, Color::WHITE);
        renderer.set_clip(None, 10, 10);
        renderer.clear_rect(&mut buffer, 10, 10, 0.0, 0.0, 5.0, 10.0, Color::TRANSPARENT);

        assert_eq!(pixel(&buffer, 10, 2, 2), [0, 0, 0, 0]);
        assert_eq!(pixel(&buffer, 10, 7, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_vertical_line_touches_its_column() {
        let renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(20, 20);
        renderer.draw_line(&mut buffer, 20, 20, (10.0, 0.0), (10.0, 20.0), 2.0, Color::WHITE, None);
        assert!(pixel(&buffer, 20, 10, 10)[3] > 0);
        assert_eq!(pixel(&buffer, 20, 2, 10)[3], 0);
    }
}
