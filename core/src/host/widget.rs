//! Hosted HUD widgets and their edit-mode control areas

use hudsnap_types::{Point, Rect, Size, WidgetId};

use crate::drag::{DragController, PressTarget};

/// Side length of the move handle and reset button squares
pub const CONTROL_SIZE: f32 = 16.0;
/// Inset of the controls from the widget corners
pub const CONTROL_INSET: f32 = 2.0;

/// Everything needed to mount a widget
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub id: WidgetId,
    pub default_position: Point,
    /// Measured size; zero until the widget has been laid out
    pub size: Size,
    pub label: String,
    /// Keeps receiving input while edit mode is off (status popups)
    pub interactive: bool,
}

impl WidgetSpec {
    pub fn new(id: impl Into<WidgetId>, default_position: Point, size: Size) -> Self {
        let id = id.into();
        Self {
            label: id.to_string(),
            id,
            default_position,
            size,
            interactive: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Host-side state for one widget. Geometry lives in the `SnapManager`.
#[derive(Debug, Clone)]
pub(crate) struct Widget {
    pub label: String,
    pub interactive: bool,
    pub drag: DragController,
}

impl Widget {
    pub fn from_spec(spec: &WidgetSpec) -> Self {
        Self {
            label: spec.label.clone(),
            interactive: spec.interactive,
            drag: DragController::new(spec.id.clone()),
        }
    }
}

/// Edit-mode control areas of a widget, in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetControls {
    pub move_handle: Rect,
    pub reset_button: Rect,
}

impl WidgetControls {
    /// Move handle in the top-left corner, reset button in the top-right.
    /// Controls shrink to fit widgets smaller than two controls wide.
    pub fn for_rect(rect: Rect) -> Self {
        let side = CONTROL_SIZE
            .min((rect.width - 3.0 * CONTROL_INSET) / 2.0)
            .min(rect.height - 2.0 * CONTROL_INSET)
            .max(0.0);
        let top = rect.y + CONTROL_INSET;
        Self {
            move_handle: Rect::new(rect.x + CONTROL_INSET, top, side, side),
            reset_button: Rect::new(rect.right() - CONTROL_INSET - side, top, side, side),
        }
    }

    /// Which part of the widget a press at `at` lands on
    pub fn press_target(&self, at: Point) -> PressTarget {
        if self.reset_button.contains(at) {
            PressTarget::ResetButton
        } else if self.move_handle.contains(at) {
            PressTarget::MoveHandle
        } else {
            PressTarget::Body
        }
    }
}

/// Read-only view of a hosted widget, in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView<'a> {
    pub id: &'a WidgetId,
    pub label: &'a str,
    pub rect: Rect,
    pub interactive: bool,
    pub dragging: bool,
}

impl WidgetView<'_> {
    pub fn controls(&self) -> WidgetControls {
        WidgetControls::for_rect(self.rect)
    }
}
