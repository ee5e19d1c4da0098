use hudsnap_types::overlay_colors;
use tiny_skia::Color;

/// Convert a config RGBA array to a tiny-skia color
#[inline]
pub fn from_rgba(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[inline]
pub fn transparent() -> Color {
    Color::from_rgba8(0, 0, 0, 0)
}

#[inline]
pub fn white() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Body of a widget shell outside edit mode
#[inline]
pub fn widget_bg() -> Color {
    Color::from_rgba8(20, 20, 20, 150)
}

#[inline]
pub fn edit_border() -> Color {
    from_rgba(overlay_colors::EDIT_BORDER)
}

#[inline]
pub fn edit_fill() -> Color {
    from_rgba(overlay_colors::EDIT_FILL)
}

/// Border of the widget currently being dragged
#[inline]
pub fn drag_border() -> Color {
    Color::from_rgba8(255, 210, 90, 230)
}

#[inline]
pub fn handle() -> Color {
    from_rgba(overlay_colors::HANDLE)
}

#[inline]
pub fn reset_button() -> Color {
    from_rgba(overlay_colors::RESET_BUTTON)
}

#[inline]
pub fn label() -> Color {
    from_rgba(overlay_colors::LABEL)
}

/// Backdrop behind guide labels so they stay readable over game content
#[inline]
pub fn label_bg() -> Color {
    Color::from_rgba8(0, 0, 0, 170)
}
