//! Tests for OverlayHost: pointer routing, edit mode, resets and persistence

use std::cell::RefCell;

use hudsnap_types::{AppConfig, Point, Rect, Size, WidgetId};
use tempfile::TempDir;

use super::{HotkeyAction, OverlayHost, PointerResponse, Shortcut, WidgetSpec};
use crate::drag::PointerId;
use crate::storage::{LayoutSink, PersistedLayout, PositionStore, read_layout};

/// Sink that records every snapshot instead of writing it
#[derive(Default)]
struct RecordingSink {
    initial: PersistedLayout,
    saves: RefCell<Vec<PersistedLayout>>,
}

impl RecordingSink {
    fn with_saved(entries: &[(&str, f32, f32)]) -> Self {
        Self {
            initial: entries
                .iter()
                .map(|(id, x, y)| (WidgetId::from(*id), Point::new(*x, *y)))
                .collect(),
            saves: RefCell::default(),
        }
    }

    fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    fn last_saved(&self, id: &str) -> Option<Point> {
        self.saves
            .borrow()
            .last()
            .and_then(|layout| layout.get(&WidgetId::from(id)).copied())
    }
}

impl LayoutSink for RecordingSink {
    fn load(&self) -> PersistedLayout {
        self.initial.clone()
    }

    fn save(&self, layout: PersistedLayout) {
        self.saves.borrow_mut().push(layout);
    }
}

fn host() -> OverlayHost<RecordingSink> {
    OverlayHost::new(&AppConfig::default(), RecordingSink::default())
}

fn spec(id: &str, x: f32, y: f32, w: f32, h: f32) -> WidgetSpec {
    WidgetSpec::new(id, Point::new(x, y), Size::new(w, h))
}

/// Press, move once, paint a frame, release
fn drag<S: LayoutSink>(host: &mut OverlayHost<S>, pointer: PointerId, from: Point, to: Point) {
    assert_eq!(host.pointer_down(pointer, from), PointerResponse::Consumed);
    host.pointer_move(pointer, to);
    host.on_frame();
    host.pointer_up(pointer, to);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reset_all_restores_defaults_and_persists() {
    let mut host = host();
    host.register_widget(spec("workerStatus", 20.0, 20.0, 100.0, 40.0));
    host.set_edit_mode(true);

    drag(&mut host, PointerId::PRIMARY, Point::new(30.0, 40.0), Point::new(510.0, 520.0));
    assert_eq!(host.position("workerStatus"), Some(Point::new(500.0, 500.0)));
    assert_eq!(host.sink().last_saved("workerStatus"), Some(Point::new(500.0, 500.0)));

    assert_eq!(host.reset_all(), 1);
    assert_eq!(host.position("workerStatus"), Some(Point::new(20.0, 20.0)));
    assert_eq!(host.sink().save_count(), 2);
    assert_eq!(host.sink().last_saved("workerStatus"), Some(Point::new(20.0, 20.0)));
}

#[test]
fn test_population_drag_returns_to_rest_without_saving() {
    let mut host = host();
    host.register_widget(spec("population", 860.0, 900.0, 200.0, 60.0));
    host.set_edit_mode(true);

    host.pointer_down(PointerId::PRIMARY, Point::new(900.0, 930.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(898.0, 932.0));
    let frame = host.on_frame();
    assert!(frame.moved.is_empty());
    assert_eq!(host.position("population"), Some(Point::new(860.0, 900.0)));
    assert!(host.guides().count() > 0);

    host.pointer_up(PointerId::PRIMARY, Point::new(898.0, 932.0));
    assert_eq!(host.guides().count(), 0);
    assert_eq!(host.sink().save_count(), 0);
}

#[test]
fn test_unregister_mid_drag_cancels_without_side_effects() {
    let mut host = host();
    host.register_widget(spec("workerStatus", 20.0, 20.0, 100.0, 40.0));
    host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    host.set_edit_mode(true);

    host.pointer_down(PointerId::PRIMARY, Point::new(150.0, 120.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(450.0, 320.0));
    host.on_frame();
    assert_eq!(host.position("upgrades"), Some(Point::new(400.0, 300.0)));

    host.pointer_move(PointerId::PRIMARY, Point::new(460.0, 330.0));
    assert!(host.unregister("upgrades"));

    assert!(!host.needs_frame());
    assert_eq!(host.guides().count(), 0);
    assert_eq!(host.position("workerStatus"), Some(Point::new(20.0, 20.0)));
    assert!(!host.registry().contains("upgrades"));

    host.pointer_up(PointerId::PRIMARY, Point::new(460.0, 330.0));
    assert_eq!(host.sink().save_count(), 0);
}

#[test]
fn test_leaving_edit_mode_ends_drag_and_persists_once() {
    let mut host = host();
    host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    host.set_edit_mode(true);

    host.pointer_down(PointerId::PRIMARY, Point::new(150.0, 120.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(450.0, 320.0));
    let frame = host.on_frame();
    assert_eq!(frame.moved, vec![(WidgetId::from("upgrades"), Point::new(400.0, 300.0))]);

    host.set_edit_mode(false);
    assert!(!host.is_dragging("upgrades"));
    assert_eq!(host.guides().count(), 0);
    assert_eq!(host.sink().save_count(), 1);
    assert_eq!(host.sink().last_saved("upgrades"), Some(Point::new(400.0, 300.0)));

    // The released pointer no longer drives anything
    host.pointer_move(PointerId::PRIMARY, Point::new(900.0, 900.0));
    assert!(!host.needs_frame());
}

#[test]
fn test_container_shrink_reclamps_without_saving() {
    let mut host = host();
    host.register_widget(spec("population", 1800.0, 1000.0, 100.0, 60.0));
    assert_eq!(host.position("population"), Some(Point::new(1800.0, 1000.0)));

    host.set_container_size(Size::new(1280.0, 720.0));
    assert_eq!(host.position("population"), Some(Point::new(1180.0, 660.0)));
    assert_eq!(
        host.registry().get("population").unwrap().rest_position,
        Point::new(1180.0, 660.0)
    );
    assert_eq!(host.sink().save_count(), 0);
}

#[test]
fn test_resize_reclamps_to_new_size() {
    let mut host = host();
    host.register_widget(spec("population", 1800.0, 1000.0, 100.0, 60.0));
    assert!(host.set_widget_size("population", Size::new(300.0, 100.0)));
    assert_eq!(host.position("population"), Some(Point::new(1620.0, 980.0)));
    assert!(!host.set_widget_size("missing", Size::new(1.0, 1.0)));
}

#[test]
fn test_reset_button_resets_single_widget() {
    let mut host = host();
    host.register_widget(spec("workerStatus", 20.0, 20.0, 100.0, 40.0));
    host.register_widget(spec("upgrades", 600.0, 20.0, 100.0, 40.0));
    host.update_position("workerStatus", Point::new(300.0, 300.0));
    host.update_position("upgrades", Point::new(700.0, 20.0));
    assert_eq!(host.sink().save_count(), 0);

    host.set_edit_mode(true);
    host.pointer_down(PointerId::PRIMARY, Point::new(390.0, 310.0));
    host.pointer_up(PointerId::PRIMARY, Point::new(390.0, 310.0));

    assert_eq!(host.position("workerStatus"), Some(Point::new(20.0, 20.0)));
    assert_eq!(host.position("upgrades"), Some(Point::new(700.0, 20.0)));
    assert!(!host.is_dragging("workerStatus"));
    assert_eq!(host.sink().save_count(), 1);
    assert_eq!(host.sink().last_saved("upgrades"), Some(Point::new(700.0, 20.0)));
}

#[test]
fn test_saved_layout_wins_and_unknown_entries_survive() {
    let sink = RecordingSink::with_saved(&[("population", 100.0, 200.0), ("retired", 5.0, 5.0)]);
    let mut host = OverlayHost::new(&AppConfig::default(), sink);

    let position = host.register_widget(spec("population", 860.0, 900.0, 200.0, 60.0));
    assert_eq!(position, Point::new(100.0, 200.0));

    host.reset_widget("population");
    assert_eq!(host.sink().last_saved("population"), Some(Point::new(860.0, 900.0)));
    assert_eq!(host.sink().last_saved("retired"), Some(Point::new(5.0, 5.0)));
}

#[test]
fn test_saved_position_is_clamped_into_container() {
    let sink = RecordingSink::with_saved(&[("population", 5000.0, -40.0)]);
    let mut host = OverlayHost::new(&AppConfig::default(), sink);
    let position = host.register_widget(spec("population", 860.0, 900.0, 200.0, 60.0));
    assert_eq!(position, Point::new(1720.0, 0.0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Pointer Routing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_click_through_outside_edit_mode() {
    let mut host = host();
    host.register_widget(spec("plain", 200.0, 200.0, 50.0, 50.0));
    assert!(host.is_click_through());
    assert_eq!(host.pointer_down(PointerId::PRIMARY, Point::new(210.0, 210.0)), PointerResponse::PassThrough);
    assert!(!host.is_dragging("plain"));

    host.register_widget(spec("status", 10.0, 10.0, 50.0, 50.0).interactive(true));
    assert!(!host.is_click_through());
    assert_eq!(host.input_region(), vec![Rect::new(10.0, 10.0, 50.0, 50.0)]);
    assert_eq!(host.pointer_down(PointerId::PRIMARY, Point::new(20.0, 20.0)), PointerResponse::Consumed);
    assert_eq!(host.pointer_down(PointerId::PRIMARY, Point::new(900.0, 900.0)), PointerResponse::PassThrough);
}

#[test]
fn test_edit_mode_captures_whole_surface() {
    let mut host = host();
    host.register_widget(spec("plain", 200.0, 200.0, 50.0, 50.0));
    host.set_edit_mode(true);
    assert!(!host.is_click_through());
    assert_eq!(host.input_region(), vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]);
    assert_eq!(host.pointer_down(PointerId::PRIMARY, Point::new(900.0, 900.0)), PointerResponse::Consumed);
    assert!(!host.is_dragging("plain"));
}

#[test]
fn test_topmost_widget_receives_press_and_is_raised() {
    let mut host = host();
    host.register_widget(spec("below", 100.0, 100.0, 200.0, 100.0));
    host.register_widget(spec("above", 150.0, 150.0, 200.0, 100.0));
    host.set_edit_mode(true);

    host.pointer_down(PointerId::PRIMARY, Point::new(250.0, 180.0));
    assert!(host.is_dragging("above"));
    host.pointer_up(PointerId::PRIMARY, Point::new(250.0, 180.0));

    // Press on the part of "below" that is not covered raises it
    host.pointer_down(PointerId::PRIMARY, Point::new(120.0, 180.0));
    assert!(host.is_dragging("below"));
    let order: Vec<_> = host.widgets().map(|w| w.id.as_str().to_string()).collect();
    assert_eq!(order, vec!["above".to_string(), "below".to_string()]);
}

#[test]
fn test_moves_are_coalesced_into_one_frame() {
    let mut host = host();
    host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    host.set_edit_mode(true);

    host.pointer_down(PointerId::PRIMARY, Point::new(150.0, 120.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(200.0, 200.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(300.0, 300.0));
    host.pointer_move(PointerId::PRIMARY, Point::new(450.0, 320.0));
    assert!(host.needs_frame());

    let frame = host.on_frame();
    assert_eq!(frame.moved, vec![(WidgetId::from("upgrades"), Point::new(400.0, 300.0))]);
    assert!(frame.damage.contains(&Rect::new(100.0, 100.0, 420.0, 240.0)));
    assert!(!host.needs_frame());

    assert!(host.on_frame().moved.is_empty());
}

#[test]
fn test_two_pointers_drag_two_widgets() {
    let mut host = host();
    host.register_widget(spec("a", 100.0, 100.0, 120.0, 40.0));
    host.register_widget(spec("b", 600.0, 600.0, 120.0, 40.0));
    host.set_edit_mode(true);

    let (p1, p2) = (PointerId(1), PointerId(2));
    host.pointer_down(p1, Point::new(150.0, 120.0));
    host.pointer_down(p2, Point::new(650.0, 620.0));
    host.pointer_move(p1, Point::new(450.0, 320.0));
    host.pointer_move(p2, Point::new(1050.0, 820.0));

    let frame = host.on_frame();
    assert_eq!(frame.moved.len(), 2);
    assert_eq!(host.position("a"), Some(Point::new(400.0, 300.0)));
    assert_eq!(host.position("b"), Some(Point::new(1000.0, 800.0)));

    host.pointer_up(p1, Point::new(450.0, 320.0));
    assert!(host.is_dragging("b"));
    host.pointer_up(p2, Point::new(1050.0, 820.0));
    assert_eq!(host.sink().save_count(), 2);
    assert_eq!(host.sink().last_saved("a"), Some(Point::new(400.0, 300.0)));
    assert_eq!(host.sink().last_saved("b"), Some(Point::new(1000.0, 800.0)));
}

#[test]
fn test_save_during_other_drag_keeps_its_rest_position() {
    let mut host = host();
    host.register_widget(spec("a", 100.0, 100.0, 120.0, 40.0));
    host.register_widget(spec("b", 600.0, 600.0, 120.0, 40.0));
    host.set_edit_mode(true);

    let (p1, p2) = (PointerId(1), PointerId(2));
    host.pointer_down(p1, Point::new(150.0, 120.0));
    host.pointer_down(p2, Point::new(650.0, 620.0));
    host.pointer_move(p1, Point::new(450.0, 320.0));
    host.pointer_move(p2, Point::new(1050.0, 820.0));
    host.on_frame();
    assert_eq!(host.position("a"), Some(Point::new(400.0, 300.0)));

    host.pointer_up(p2, Point::new(1050.0, 820.0));
    assert_eq!(host.sink().save_count(), 1);
    assert_eq!(host.sink().last_saved("a"), Some(Point::new(100.0, 100.0)));
    assert_eq!(host.sink().last_saved("b"), Some(Point::new(1000.0, 800.0)));

    // Abandoning a's drag leaves the stored layout as it was
    assert!(host.unregister("a"));
    assert_eq!(host.sink().save_count(), 1);
    assert_eq!(host.layout().get("a"), Some(&Point::new(100.0, 100.0)));
}

#[test]
fn test_unusable_container_sizes_fall_back() {
    let mut config = AppConfig::default();
    config.layout.container_width = -1.0;
    config.layout.container_height = 0.0;
    let mut host = OverlayHost::new(&config, RecordingSink::default());
    assert_eq!(host.container(), Size::new(1920.0, 1080.0));

    host.register_widget(spec("upgrades", 1900.0, 100.0, 120.0, 40.0));
    assert_eq!(host.position("upgrades"), Some(Point::new(1800.0, 100.0)));

    host.set_container_size(Size::new(f32::NAN, 600.0));
    assert_eq!(host.container(), Size::new(1920.0, 1080.0));
    assert_eq!(host.position("upgrades"), Some(Point::new(1800.0, 100.0)));
}

#[test]
fn test_shortcuts_follow_edit_mode_rules() {
    let mut host = host();
    host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    host.update_position("upgrades", Point::new(500.0, 500.0));

    let toggle: Shortcut = "Ctrl+Shift+E".parse().unwrap();
    let reset: Shortcut = "Ctrl+Shift+R".parse().unwrap();
    let exit: Shortcut = "Escape".parse().unwrap();

    assert_eq!(host.handle_shortcut(&reset), None);
    assert_eq!(host.position("upgrades"), Some(Point::new(500.0, 500.0)));
    assert_eq!(host.handle_shortcut(&exit), None);

    assert_eq!(host.handle_shortcut(&toggle), Some(HotkeyAction::ToggleEditMode));
    assert!(host.edit_mode());
    assert_eq!(host.handle_shortcut(&reset), Some(HotkeyAction::ResetAll));
    assert_eq!(host.position("upgrades"), Some(Point::new(100.0, 100.0)));

    assert_eq!(host.handle_shortcut(&exit), Some(HotkeyAction::ExitEditMode));
    assert!(!host.edit_mode());
}

#[test]
fn test_update_position_is_ignored_while_dragging() {
    let mut host = host();
    host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    host.set_edit_mode(true);
    host.pointer_down(PointerId::PRIMARY, Point::new(150.0, 120.0));
    assert_eq!(host.update_position("upgrades", Point::new(0.0, 0.0)), None);
    assert_eq!(host.update_position("missing", Point::new(0.0, 0.0)), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Real Store
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_layout_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.json");
    let config = AppConfig::default();

    {
        let mut host = OverlayHost::new(&config, PositionStore::new(&path));
        host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
        host.set_edit_mode(true);
        drag(&mut host, PointerId::PRIMARY, Point::new(150.0, 120.0), Point::new(450.0, 320.0));
        host.sink().flush();

        let on_disk = read_layout(&path).unwrap().unwrap();
        assert_eq!(on_disk[&WidgetId::from("upgrades")], Point::new(400.0, 300.0));
    }

    let mut host = OverlayHost::new(&config, PositionStore::new(&path));
    let position = host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    assert_eq!(position, Point::new(400.0, 300.0));

    std::fs::remove_file(&path).unwrap();
    let mut host = OverlayHost::new(&config, PositionStore::new(&path));
    let position = host.register_widget(spec("upgrades", 100.0, 100.0, 120.0, 40.0));
    assert_eq!(position, Point::new(100.0, 100.0));
}
