//! Snap guide painting
//!
//! Purely presentational: draws a full-length dashed line for each guide the
//! host publishes during a drag, plus an optional label beside it. Never
//! touches geometry. With no guides it draws nothing.

use hudsnap_core::snap::{GUIDE_LABEL_HEIGHT, GUIDE_LABEL_WIDTH, GUIDE_LINE_MARGIN};
use hudsnap_core::{GuideKind, SnapGuide};
use hudsnap_types::LayoutSettings;
use tiny_skia::Color;

use crate::colors;
use crate::renderer::Renderer;
use crate::utils::truncate_label;

/// Gap between a guide line and its label box
const LABEL_GAP: f32 = 4.0;
const LABEL_PADDING: f32 = 2.0;
const LABEL_MAX_CHARS: usize = 28;

/// Visual settings for guide lines
#[derive(Debug, Clone, PartialEq)]
pub struct GuideStyle {
    pub container_color: Color,
    pub widget_color: Color,
    pub line_width: f32,
    /// (dash, gap) lengths in pixels
    pub dash: (f32, f32),
    pub show_labels: bool,
    pub font_size: f32,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self::from_settings(&LayoutSettings::default())
    }
}

impl GuideStyle {
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self {
            container_color: colors::from_rgba(settings.container_guide_color),
            widget_color: colors::from_rgba(settings.widget_guide_color),
            line_width: 1.5,
            dash: (6.0, 4.0),
            show_labels: settings.guide_labels,
            font_size: 10.0,
        }
    }
}

/// Draws the guide list published by in-progress drags
#[derive(Debug, Clone, Default)]
pub struct GuideRenderer {
    style: GuideStyle,
}

impl GuideRenderer {
    pub fn new(style: GuideStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &GuideStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: GuideStyle) {
        self.style = style;
    }

    /// Draw every guide. Returns how many lines were drawn.
    pub fn draw<'a>(
        &self,
        renderer: &mut Renderer,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        guides: impl IntoIterator<Item = &'a SnapGuide>,
    ) -> usize {
        let (w, h) = (width as f32, height as f32);
        let half = self.style.line_width / 2.0;
        let mut drawn = 0;

        for guide in guides {
            if !guide.position.is_finite() {
                continue;
            }
            let color = if guide.source.is_container() {
                self.style.container_color
            } else {
                self.style.widget_color
            };

            // Lines on the far container edge are pulled in so they stay visible
            let (from, to) = match guide.kind {
                GuideKind::Vertical => {
                    let x = guide.position.clamp(half, (w - half).max(half));
                    ((x, 0.0), (x, h))
                }
                GuideKind::Horizontal => {
                    let y = guide.position.clamp(half, (h - half).max(half));
                    ((0.0, y), (w, y))
                }
            };
            renderer.draw_line(
                buffer,
                width,
                height,
                from,
                to,
                self.style.line_width,
                color,
                Some(self.style.dash),
            );
            drawn += 1;

            if self.style.show_labels {
                if let Some(label) = &guide.label {
                    self.draw_label(renderer, buffer, width, height, guide, label, color);
                }
            }
        }
        drawn
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_label(
        &self,
        renderer: &mut Renderer,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        guide: &SnapGuide,
        label: &str,
        color: Color,
    ) {
        let text = truncate_label(label, LABEL_MAX_CHARS);
        let (text_w, text_h) = renderer.measure_text(&text, self.style.font_size);
        let box_w = text_w + LABEL_PADDING * 2.0;
        let box_h = text_h + LABEL_PADDING * 2.0;
        let (w, h) = (width as f32, height as f32);

        let (box_x, box_y) = match guide.kind {
            GuideKind::Vertical => {
                if LABEL_GAP + box_w > GUIDE_LINE_MARGIN + GUIDE_LABEL_WIDTH {
                    return;
                }
                let right_side = guide.position + LABEL_GAP;
                let x = if right_side + box_w <= w {
                    right_side
                } else {
                    guide.position - LABEL_GAP - box_w
                };
                (x, LABEL_GAP)
            }
            GuideKind::Horizontal => {
                if LABEL_GAP + box_h > GUIDE_LINE_MARGIN + GUIDE_LABEL_HEIGHT {
                    return;
                }
                let above = guide.position - LABEL_GAP - box_h;
                let y = if above >= 0.0 {
                    above
                } else {
                    guide.position + LABEL_GAP
                };
                (LABEL_GAP, y)
            }
        };
        if box_x < 0.0 || box_y < 0.0 || box_x + box_w > w || box_y + box_h > h {
            return;
        }

        renderer.fill_rounded_rect(buffer, width, height, box_x, box_y, box_w, box_h, 3.0, colors::label_bg());
        renderer.draw_text(
            buffer,
            width,
            height,
            &text,
            box_x + LABEL_PADDING,
            box_y + LABEL_PADDING + self.style.font_size,
            self.style.font_size,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hudsnap_core::GuideSource;

    fn alpha_at(buffer: &[u8], width: u32, x: u32, y: u32) -> u8 {
        buffer[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn test_no_guides_draws_nothing() {
        let mut renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(64, 64);
        let none: [SnapGuide; 0] = [];
        let drawn = GuideRenderer::default().draw(&mut renderer, &mut buffer, 64, 64, &none);
        assert_eq!(drawn, 0);
        assert!(buffer.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_edge_guides_stay_visible() {
        let style = GuideStyle {
            show_labels: false,
            dash: (100.0, 1.0),
            ..GuideStyle::default()
        };
        let guides = [
            SnapGuide::vertical(64.0, GuideSource::Container),
            SnapGuide::horizontal(32.0, GuideSource::Container),
        ];
        let mut renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(64, 64);
        let drawn = GuideRenderer::new(style).draw(&mut renderer, &mut buffer, 64, 64, &guides);

        assert_eq!(drawn, 2);
        assert!(alpha_at(&buffer, 64, 63, 10) > 0);
        assert!(alpha_at(&buffer, 64, 10, 32) > 0);
        assert_eq!(alpha_at(&buffer, 64, 10, 10), 0);
    }
}
