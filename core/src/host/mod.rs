//! Overlay host
//!
//! `OverlayHost` owns everything about where widgets sit on the overlay
//! surface: the widget registry (`SnapManager`), one `DragController` per
//! widget, the edit-mode flag, the container size and the layout sink.
//!
//! The platform layer feeds it pointer events, key shortcuts, container
//! resizes and paint frames; the host answers with whether input was consumed
//! and which regions need repainting.

mod hotkeys;
mod widget;

#[cfg(test)]
mod host_tests;

pub use hotkeys::{Code, HotKeyParseError, HotkeyAction, Hotkeys, Modifiers, Shortcut};
pub use widget::{CONTROL_INSET, CONTROL_SIZE, WidgetControls, WidgetSpec, WidgetView};

use std::collections::BTreeMap;

use hudsnap_types::{AppConfig, Point, Rect, Size, WidgetId, clamp_position};

use crate::drag::{FrameClock, PointerId, PressTarget};
use crate::snap::{GeometryUpdate, OverlayGeometry, SnapGuide, SnapManager};
use crate::storage::{LayoutSink, PersistedLayout, PositionStore, StorageError};
use widget::Widget;

/// Whether the platform should treat a pointer event as handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    /// The overlay handled the event
    Consumed,
    /// Forward the event to whatever is underneath the overlay
    PassThrough,
}

/// Result of one paint frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Widgets whose position changed this frame
    pub moved: Vec<(WidgetId, Point)>,
    /// Regions that need repainting
    pub damage: Vec<Rect>,
}

impl FrameOutput {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.damage.is_empty()
    }
}

/// Hosts every widget on the overlay surface
pub struct OverlayHost<S: LayoutSink = PositionStore> {
    edit_mode: bool,
    container: Size,
    registry: SnapManager,
    widgets: BTreeMap<WidgetId, Widget>,
    /// Paint order, bottom to top
    z_order: Vec<WidgetId>,
    /// Which widget each pressed pointer is dragging
    captures: BTreeMap<PointerId, WidgetId>,
    clock: FrameClock,
    sink: S,
    /// Last layout loaded or saved; keeps entries for unmounted widgets
    saved: PersistedLayout,
    hotkeys: Hotkeys,
    /// Damage accumulated outside of drag processing
    damage: Vec<Rect>,
}

impl OverlayHost<PositionStore> {
    /// Host backed by the layout file for `config.layout.namespace`
    pub fn with_store(config: &AppConfig) -> Result<Self, StorageError> {
        let store = PositionStore::for_namespace(&config.layout.namespace)?;
        Ok(Self::new(config, store))
    }
}

impl<S: LayoutSink> OverlayHost<S> {
    pub fn new(config: &AppConfig, sink: S) -> Self {
        let saved = sink.load();
        Self {
            edit_mode: false,
            container: config.layout.container_size(),
            registry: SnapManager::with_threshold(config.layout.snap_threshold),
            widgets: BTreeMap::new(),
            z_order: Vec::new(),
            captures: BTreeMap::new(),
            clock: FrameClock::new(),
            sink,
            saved,
            hotkeys: Hotkeys::from_settings(&config.hotkeys),
            damage: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn registry(&self) -> &SnapManager {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn hotkeys(&self) -> &Hotkeys {
        &self.hotkeys
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.registry.get(id).map(|g| g.position)
    }

    pub fn is_dragging(&self, id: &str) -> bool {
        self.widgets.get(id).is_some_and(|w| w.drag.is_dragging())
    }

    /// Guides published by in-progress drags
    pub fn guides(&self) -> impl Iterator<Item = &SnapGuide> {
        self.registry.guides()
    }

    /// Widgets in paint order, bottom to top
    pub fn widgets(&self) -> impl Iterator<Item = WidgetView<'_>> {
        self.z_order.iter().filter_map(|id| {
            let widget = self.widgets.get(id)?;
            let geometry = self.registry.get(id.as_str())?;
            Some(WidgetView {
                id,
                label: &widget.label,
                rect: geometry.rect(),
                interactive: widget.interactive,
                dragging: widget.drag.is_dragging(),
            })
        })
    }

    /// Full layout as it would be persisted right now: the last saved
    /// layout overlaid with every registered widget's position. A widget
    /// still being dragged contributes its rest position.
    pub fn layout(&self) -> PersistedLayout {
        let mut layout = self.saved.clone();
        for (id, geometry) in self.registry.iter() {
            let position = if self.is_dragging(id.as_str()) {
                geometry.rest_position
            } else {
                geometry.position
            };
            layout.insert(id.clone(), position);
        }
        layout
    }

    pub fn set_snap_threshold(&mut self, threshold: f32) {
        self.registry.set_threshold(threshold);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Mount a widget with only an id and measured size
    pub fn register(&mut self, id: impl Into<WidgetId>, size: Size) -> Point {
        self.register_widget(WidgetSpec::new(id, Point::ORIGIN, size))
    }

    /// Mount a widget. Its position comes from the saved layout if present,
    /// otherwise its default, clamped into the container. Re-registering an
    /// id replaces the previous widget.
    pub fn register_widget(&mut self, spec: WidgetSpec) -> Point {
        if self.widgets.contains_key(spec.id.as_str()) {
            self.unregister(spec.id.as_str());
        }

        let saved = self.saved.get(&spec.id).copied();
        let position = clamp_position(
            saved.unwrap_or(spec.default_position),
            spec.size,
            self.container,
        );
        tracing::debug!(widget = %spec.id, from_saved = saved.is_some(), x = position.x, y = position.y,
            "Mounting widget");

        let geometry = OverlayGeometry::new(position, spec.size, spec.default_position);
        self.damage.push(geometry.rect());
        self.registry.register_overlay(spec.id.clone(), geometry);
        self.widgets.insert(spec.id.clone(), Widget::from_spec(&spec));
        self.z_order.push(spec.id);
        position
    }

    /// Report a re-measured size. The position is re-clamped for the new
    /// size. Returns `false` for unknown widgets.
    pub fn set_widget_size(&mut self, id: &str, size: Size) -> bool {
        let Some(geometry) = self.registry.get(id).copied() else {
            return false;
        };
        if geometry.size == size {
            return true;
        }

        let position = clamp_position(geometry.position, size, self.container);
        let update = if self.is_dragging(id) {
            GeometryUpdate {
                position: Some(position),
                size: Some(size),
                rest_position: None,
            }
        } else {
            GeometryUpdate {
                position: Some(position),
                size: Some(size),
                rest_position: Some(position),
            }
        };
        self.registry.update_overlay(id, update);
        self.damage
            .push(geometry.rect().union(&Rect::from_origin_size(position, size)));
        true
    }

    /// External position update. The position is clamped and becomes the
    /// widget's rest position; nothing is persisted. Ignored while the widget
    /// is being dragged.
    pub fn update_position(&mut self, id: &str, position: Point) -> Option<Point> {
        if self.is_dragging(id) {
            tracing::debug!(widget = id, "Ignoring external position update during drag");
            return None;
        }
        if !position.is_finite() {
            return None;
        }
        let geometry = *self.registry.get(id)?;
        let position = clamp_position(position, geometry.size, self.container);
        self.apply_settled(id, geometry, position);
        Some(position)
    }

    /// Unmount a widget. An in-progress drag is cancelled with no
    /// persistence. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(mut widget) = self.widgets.remove(id) else {
            return false;
        };
        if widget.drag.is_dragging() {
            widget.drag.cancel(&mut self.registry, &mut self.clock);
        }
        self.captures.retain(|_, captured| captured.as_str() != id);
        self.z_order.retain(|z| z.as_str() != id);
        if let Some(geometry) = self.registry.unregister_overlay(id) {
            self.damage.push(geometry.rect());
        }
        tracing::debug!(widget = id, "Unmounted widget");
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edit Mode
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter or leave edit mode. Leaving ends every drag as if released and
    /// persists once if any of them moved a widget.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit_mode == enabled {
            return;
        }
        self.edit_mode = enabled;

        if !enabled {
            let any_moved = self.end_all_drags();
            if any_moved {
                self.persist();
            }
            self.registry.clear_guides();
        }

        // Chrome appears or disappears on every widget
        self.damage_everything();
        tracing::info!(enabled, "Edit mode changed");
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.edit_mode);
        self.edit_mode
    }

    /// Dispatch a key combination. Returns the action that was applied.
    pub fn handle_shortcut(&mut self, shortcut: &Shortcut) -> Option<HotkeyAction> {
        let action = self.hotkeys.action_for(shortcut)?;
        match action {
            HotkeyAction::ToggleEditMode => {
                self.toggle_edit_mode();
            }
            HotkeyAction::ResetAll => {
                if !self.edit_mode {
                    return None;
                }
                self.reset_all();
            }
            HotkeyAction::ExitEditMode => {
                if !self.edit_mode {
                    return None;
                }
                self.set_edit_mode(false);
            }
        }
        Some(action)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reset
    // ─────────────────────────────────────────────────────────────────────────

    /// Move one widget back to its default and persist the full layout
    pub fn reset_widget(&mut self, id: &str) -> Option<Point> {
        let position = self.apply_default(id)?;
        tracing::info!(widget = id, x = position.x, y = position.y, "Reset widget to default");
        self.persist();
        Some(position)
    }

    /// Move every widget back to its default and persist once
    pub fn reset_all(&mut self) -> usize {
        let ids: Vec<WidgetId> = self.widgets.keys().cloned().collect();
        let mut count = 0;
        for id in &ids {
            if self.apply_default(id.as_str()).is_some() {
                count += 1;
            }
        }
        tracing::info!(widgets = count, "Reset all widgets to defaults");
        self.persist();
        count
    }

    fn apply_default(&mut self, id: &str) -> Option<Point> {
        if let Some(widget) = self.widgets.get_mut(id) {
            if widget.drag.is_dragging() {
                widget.drag.cancel(&mut self.registry, &mut self.clock);
                self.captures.retain(|_, captured| captured.as_str() != id);
            }
        }
        let default = self.registry.reset_to_default_position(id)?;
        let geometry = *self.registry.get(id)?;
        let position = clamp_position(default, geometry.size, self.container);
        self.apply_settled(id, geometry, position);
        Some(position)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Container
    // ─────────────────────────────────────────────────────────────────────────

    /// New container size from the platform. Every widget is re-clamped;
    /// snapping is not involved and nothing is persisted.
    pub fn set_container_size(&mut self, size: Size) {
        if !size.is_valid() {
            tracing::warn!(width = size.width, height = size.height, "Ignoring unusable container size");
            return;
        }
        if size == self.container {
            return;
        }
        tracing::debug!(width = size.width, height = size.height, "Container resized");
        self.container = size;

        let ids: Vec<WidgetId> = self.registry.iter().map(|(id, _)| id.clone()).collect();
        for id in ids {
            let Some(geometry) = self.registry.get(id.as_str()).copied() else {
                continue;
            };
            let position = clamp_position(geometry.position, geometry.size, size);
            if position == geometry.position {
                continue;
            }
            if self.is_dragging(id.as_str()) {
                self.registry
                    .update_overlay(id.as_str(), GeometryUpdate::position(position));
            } else {
                self.registry
                    .update_overlay(id.as_str(), GeometryUpdate::settled(position));
            }
        }
        self.damage_everything();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pointer Routing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, pointer: PointerId, at: Point) -> PointerResponse {
        if !self.edit_mode {
            return self.passive_response(at);
        }
        if self.captures.contains_key(&pointer) {
            return PointerResponse::Consumed;
        }
        let Some(id) = self.hit_test(at).cloned() else {
            return PointerResponse::Consumed;
        };
        let Some(geometry) = self.registry.get(id.as_str()).copied() else {
            return PointerResponse::Consumed;
        };

        match WidgetControls::for_rect(geometry.rect()).press_target(at) {
            PressTarget::ResetButton => {
                self.reset_widget(id.as_str());
            }
            target => {
                let started = match self.widgets.get_mut(id.as_str()) {
                    Some(widget) => {
                        widget
                            .drag
                            .pointer_down(true, target, pointer, at, &self.registry)
                    }
                    None => false,
                };
                if started {
                    self.captures.insert(pointer, id.clone());
                    self.raise(&id);
                    self.damage.push(geometry.rect());
                }
            }
        }
        PointerResponse::Consumed
    }

    pub fn pointer_move(&mut self, pointer: PointerId, at: Point) -> PointerResponse {
        if let Some(id) = self.captures.get(&pointer) {
            if let Some(widget) = self.widgets.get_mut(id.as_str()) {
                widget.drag.pointer_move(pointer, at, &mut self.clock);
            }
            return PointerResponse::Consumed;
        }
        if self.edit_mode {
            PointerResponse::Consumed
        } else {
            self.passive_response(at)
        }
    }

    /// Release a pointer. A drag owned by it ends; any move not yet
    /// processed is discarded. The layout is persisted if the widget moved.
    pub fn pointer_up(&mut self, pointer: PointerId, at: Point) -> PointerResponse {
        let Some(id) = self.captures.remove(&pointer) else {
            return if self.edit_mode {
                PointerResponse::Consumed
            } else {
                self.passive_response(at)
            };
        };

        let guide_damage = self.guide_damage();
        let end = match self.widgets.get_mut(id.as_str()) {
            Some(widget) => widget
                .drag
                .pointer_up(pointer, &mut self.registry, &mut self.clock),
            None => None,
        };
        self.damage.extend(guide_damage);
        if let Some(geometry) = self.registry.get(id.as_str()) {
            self.damage.push(geometry.rect());
        }

        if end.is_some_and(|end| end.moved) {
            self.persist();
        }
        PointerResponse::Consumed
    }

    /// Topmost widget under `at`
    fn hit_test(&self, at: Point) -> Option<&WidgetId> {
        self.z_order.iter().rev().find(|id| {
            self.registry
                .get(id.as_str())
                .is_some_and(|g| g.size.is_valid() && g.rect().contains(at))
        })
    }

    /// Outside edit mode only interactive widgets take input
    fn passive_response(&self, at: Point) -> PointerResponse {
        match self.hit_test(at) {
            Some(id) if self.widgets.get(id.as_str()).is_some_and(|w| w.interactive) => {
                PointerResponse::Consumed
            }
            _ => PointerResponse::PassThrough,
        }
    }

    fn raise(&mut self, id: &WidgetId) {
        if let Some(index) = self.z_order.iter().position(|z| z == id) {
            let id = self.z_order.remove(index);
            self.z_order.push(id);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frames
    // ─────────────────────────────────────────────────────────────────────────

    /// True when a drag is waiting for the next paint frame
    pub fn needs_frame(&self) -> bool {
        self.clock.is_requested()
    }

    /// Called once per paint frame: processes every pending drag update and
    /// returns what moved plus the damaged regions
    pub fn on_frame(&mut self) -> FrameOutput {
        self.clock.begin_frame();
        let mut output = FrameOutput {
            moved: Vec::new(),
            damage: std::mem::take(&mut self.damage),
        };

        let dragging: Vec<WidgetId> = self
            .widgets
            .iter()
            .filter(|(_, w)| w.drag.session().is_some_and(|s| s.has_pending_update()))
            .map(|(id, _)| id.clone())
            .collect();
        if dragging.is_empty() {
            return output;
        }

        output.damage.extend(self.guide_damage());
        for id in dragging {
            let Some(widget) = self.widgets.get_mut(id.as_str()) else {
                continue;
            };
            let Some(update) = widget.drag.process_frame(&mut self.registry, self.container) else {
                continue;
            };
            if update.position == update.previous {
                continue;
            }
            if let Some(geometry) = self.registry.get(id.as_str()) {
                let before = Rect::from_origin_size(update.previous, geometry.size);
                output.damage.push(before.union(&geometry.rect()));
            }
            output.moved.push((id, update.position));
        }
        output.damage.extend(self.guide_damage());
        output
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input Region
    // ─────────────────────────────────────────────────────────────────────────

    /// Rectangles that capture input. Everything else passes through.
    pub fn input_region(&self) -> Vec<Rect> {
        if self.edit_mode {
            return vec![Rect::from_origin_size(Point::ORIGIN, self.container)];
        }
        self.widgets()
            .filter(|w| w.interactive && w.rect.size().is_valid())
            .map(|w| w.rect)
            .collect()
    }

    pub fn is_click_through(&self) -> bool {
        self.input_region().is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn apply_settled(&mut self, id: &str, before: OverlayGeometry, position: Point) {
        self.registry
            .update_overlay(id, GeometryUpdate::settled(position));
        self.damage.push(
            before
                .rect()
                .union(&Rect::from_origin_size(position, before.size)),
        );
    }

    /// End every drag like a pointer-up. Returns whether any widget moved.
    fn end_all_drags(&mut self) -> bool {
        self.captures.clear();
        let mut any_moved = false;
        for widget in self.widgets.values_mut() {
            if let Some(end) = widget.drag.end(&mut self.registry, &mut self.clock) {
                any_moved |= end.moved;
            }
        }
        any_moved
    }

    fn guide_damage(&self) -> Vec<Rect> {
        self.registry
            .guides()
            .map(|g| g.damage_rect(self.container))
            .collect()
    }

    fn damage_everything(&mut self) {
        self.damage.clear();
        self.damage
            .push(Rect::from_origin_size(Point::ORIGIN, self.container));
    }

    fn persist(&mut self) {
        let layout = self.layout();
        self.saved = layout.clone();
        self.sink.save(layout);
    }
}

impl<S: LayoutSink> std::fmt::Debug for OverlayHost<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHost")
            .field("edit_mode", &self.edit_mode)
            .field("container", &self.container)
            .field("widgets", &self.z_order)
            .field("captures", &self.captures)
            .finish()
    }
}
