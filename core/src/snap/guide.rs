//! Snap guide lines
//!
//! Guides are ephemeral: a drag publishes a fresh set on every processed
//! pointer-move and they are dropped on pointer-up or when edit mode ends.
//! `label` and `source` are advisory (UI and debug output only).

use hudsnap_types::{Rect, Size, WidgetId};

/// Stroke half-width plus antialiasing slack around a guide line
pub const GUIDE_LINE_MARGIN: f32 = 3.0;
/// Largest label box drawn beside a guide, on either side of the line
pub const GUIDE_LABEL_WIDTH: f32 = 160.0;
pub const GUIDE_LABEL_HEIGHT: f32 = 18.0;

/// Orientation of a guide line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideKind {
    /// A line of constant x, produced by snapping on the x axis
    Vertical,
    /// A line of constant y, produced by snapping on the y axis
    Horizontal,
}

/// What produced the line a widget snapped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GuideSource {
    Container,
    Widget(WidgetId),
}

impl GuideSource {
    pub fn is_container(&self) -> bool {
        matches!(self, GuideSource::Container)
    }
}

/// A transient alignment line shown while dragging
#[derive(Debug, Clone, PartialEq)]
pub struct SnapGuide {
    pub kind: GuideKind,
    /// Pixel coordinate of the line (x for vertical, y for horizontal)
    pub position: f32,
    pub label: Option<String>,
    pub source: GuideSource,
}

impl SnapGuide {
    pub fn vertical(position: f32, source: GuideSource) -> Self {
        Self {
            kind: GuideKind::Vertical,
            position,
            label: None,
            source,
        }
    }

    pub fn horizontal(position: f32, source: GuideSource) -> Self {
        Self {
            kind: GuideKind::Horizontal,
            position,
            label: None,
            source,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Area a renderer may touch when drawing this guide, line and label
    /// included, clipped to the container
    pub fn damage_rect(&self, container: Size) -> Rect {
        let rect = match self.kind {
            GuideKind::Vertical => {
                let reach = GUIDE_LINE_MARGIN + GUIDE_LABEL_WIDTH;
                Rect::new(self.position - reach, 0.0, reach * 2.0, container.height)
            }
            GuideKind::Horizontal => {
                let reach = GUIDE_LINE_MARGIN + GUIDE_LABEL_HEIGHT;
                Rect::new(0.0, self.position - reach, container.width, reach * 2.0)
            }
        };
        clip_to(rect, container)
    }
}

fn clip_to(rect: Rect, container: Size) -> Rect {
    let x = rect.x.max(0.0);
    let y = rect.y.max(0.0);
    let right = rect.right().min(container.width).max(x);
    let bottom = rect.bottom().min(container.height).max(y);
    Rect::new(x, y, right - x, bottom - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_rect_stays_inside_container() {
        let container = Size::new(1000.0, 800.0);
        let right = SnapGuide::vertical(1000.0, GuideSource::Container).damage_rect(container);
        assert_eq!(right, Rect::new(837.0, 0.0, 163.0, 800.0));

        let top = SnapGuide::horizontal(0.0, GuideSource::Container).damage_rect(container);
        assert_eq!(top, Rect::new(0.0, 0.0, 1000.0, 21.0));
    }
}
