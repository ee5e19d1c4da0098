//! Widget shells and edit-mode chrome
//!
//! Outside edit mode a widget is a plain translucent panel with its label.
//! In edit mode it gains a dashed highlight border, a move handle in the
//! top-left corner and a reset button in the top-right.

use hudsnap_core::WidgetView;

use crate::colors;
use crate::renderer::Renderer;

const CORNER_RADIUS: f32 = 4.0;
const LABEL_FONT_SIZE: f32 = 12.0;

/// Paint one widget
pub fn draw_widget(
    renderer: &mut Renderer,
    buffer: &mut [u8],
    width: u32,
    height: u32,
    widget: &WidgetView<'_>,
    edit_mode: bool,
) {
    let r = widget.rect;
    if !r.size().is_valid() {
        return;
    }

    let background = if edit_mode {
        colors::edit_fill()
    } else {
        colors::widget_bg()
    };
    renderer.fill_rounded_rect(buffer, width, height, r.x, r.y, r.width, r.height, CORNER_RADIUS, background);

    let (text_w, text_h) = renderer.measure_text(widget.label, LABEL_FONT_SIZE);
    if text_w + 8.0 <= r.width && text_h <= r.height {
        // Baseline-centered
        let x = r.x + (r.width - text_w) / 2.0;
        let y = r.y + (r.height + text_h) / 2.0 - 2.0;
        renderer.draw_text(buffer, width, height, widget.label, x, y, LABEL_FONT_SIZE, colors::label());
    }

    if edit_mode {
        draw_edit_chrome(renderer, buffer, width, height, widget);
    }
}

fn draw_edit_chrome(renderer: &mut Renderer, buffer: &mut [u8], width: u32, height: u32, widget: &WidgetView<'_>) {
    let r = widget.rect;
    let border = if widget.dragging {
        colors::drag_border()
    } else {
        colors::edit_border()
    };
    renderer.stroke_rounded_rect_dashed(
        buffer,
        width,
        height,
        r.x + 1.0,
        r.y + 1.0,
        r.width - 2.0,
        r.height - 2.0,
        CORNER_RADIUS,
        1.5,
        border,
        5.0,
        3.0,
    );

    let controls = widget.controls();

    // Move handle: three grip bars
    let h = controls.move_handle;
    if h.width >= 4.0 {
        renderer.fill_rounded_rect(buffer, width, height, h.x, h.y, h.width, h.height, 2.0, colors::handle());
        let bar = (h.height / 7.0).max(1.0);
        for i in 1..=3 {
            let y = h.y + bar * (2 * i - 1) as f32;
            renderer.fill_rect(buffer, width, height, h.x + 2.0, y, h.width - 4.0, bar, colors::edit_fill());
        }
    }

    // Reset button: a cross
    let b = controls.reset_button;
    if b.width >= 4.0 {
        renderer.fill_rounded_rect(buffer, width, height, b.x, b.y, b.width, b.height, 2.0, colors::reset_button());
        let inset = b.width * 0.25;
        renderer.draw_line(
            buffer,
            width,
            height,
            (b.x + inset, b.y + inset),
            (b.right() - inset, b.bottom() - inset),
            1.5,
            colors::white(),
            None,
        );
        renderer.draw_line(
            buffer,
            width,
            height,
            (b.right() - inset, b.y + inset),
            (b.x + inset, b.bottom() - inset),
            1.5,
            colors::white(),
            None,
        );
    }
}
