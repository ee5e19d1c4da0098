//! Small helpers shared by the guide and chrome painters

use hudsnap_types::{Rect, Size};

/// Truncate a string to max_chars, adding "..." if truncated
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let truncated: String = label.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Intersection of `rect` with a surface of `size`; `None` when nothing is left
pub fn clip_to_surface(rect: Rect, size: Size) -> Option<Rect> {
    let x = rect.x.max(0.0);
    let y = rect.y.max(0.0);
    let right = rect.right().min(size.width);
    let bottom = rect.bottom().min(size.height);
    if !(right > x && bottom > y) {
        return None;
    }
    Some(Rect::new(x, y, right - x, bottom - y))
}

/// Convert to tiny-skia, dropping empty or non-finite rectangles
pub fn to_skia(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}
