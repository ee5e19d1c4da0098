//! Per-widget drag state machine
//!
//! ```text
//!            pointer-down (edit mode, body/handle)
//!   Idle ───────────────────────────────────────────► Dragging
//!    ▲                                                  │  pointer-move: store latest,
//!    │   pointer-up / edit mode off / widget removed    │  request one frame
//!    └──────────────────────────────────────────────────┘  frame: clamp → snap → apply
//! ```
//!
//! The controller never owns geometry: the `SnapManager` registry is passed
//! in by the host for every transition that reads or writes it.

mod frame;


use hudsnap_types::{Point, Size, WidgetId, clamp_position};

use crate::snap::{GeometryUpdate, SnapManager};

pub use frame::{FrameClock, FrameRequest};

/// Identifies the pointer (mouse, pen, touch contact) driving a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PointerId(pub u32);

impl PointerId {
    pub const PRIMARY: PointerId = PointerId(0);
}

/// Part of a widget a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Body,
    MoveHandle,
    /// Reserved control area; never starts a drag
    ResetButton,
}

impl PressTarget {
    pub fn starts_drag(self) -> bool {
        matches!(self, PressTarget::Body | PressTarget::MoveHandle)
    }
}

/// Live state of one drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub widget_id: WidgetId,
    pub pointer: PointerId,
    /// Pointer position minus widget top-left at drag start
    pub pointer_offset: Point,
    /// Widget position when the drag began
    pub start_position: Point,
    /// Latest pointer position not yet processed
    pending_pointer: Option<Point>,
    /// Outstanding frame request for `pending_pointer`
    frame: Option<FrameRequest>,
}

impl DragSession {
    pub fn has_pending_update(&self) -> bool {
        self.pending_pointer.is_some()
    }

    pub fn frame_request(&self) -> Option<FrameRequest> {
        self.frame
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Result of processing one frame of a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub previous: Point,
    pub position: Point,
    pub snapped: bool,
}

/// How a drag session finished
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub widget_id: WidgetId,
    pub position: Point,
    /// The widget ended somewhere other than where it started
    pub moved: bool,
}

/// Drag state machine for a single widget
#[derive(Debug, Clone)]
pub struct DragController {
    widget_id: WidgetId,
    state: DragState,
}

impl DragController {
    pub fn new(widget_id: WidgetId) -> Self {
        Self {
            widget_id,
            state: DragState::Idle,
        }
    }

    pub fn widget_id(&self) -> &WidgetId {
        &self.widget_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// `Idle → Dragging`. Returns `true` if a session started.
    ///
    /// Ignored outside edit mode, on reserved control areas, while already
    /// dragging, or when the widget is not registered.
    pub fn pointer_down(
        &mut self,
        edit_mode: bool,
        target: PressTarget,
        pointer: PointerId,
        at: Point,
        registry: &SnapManager,
    ) -> bool {
        if !edit_mode || !target.starts_drag() || self.is_dragging() || !at.is_finite() {
            return false;
        }
        let Some(geometry) = registry.get(self.widget_id.as_str()) else {
            return false;
        };

        let session = DragSession {
            widget_id: self.widget_id.clone(),
            pointer,
            pointer_offset: at - geometry.position,
            start_position: geometry.position,
            pending_pointer: None,
            frame: None,
        };
        tracing::debug!(
            widget = %self.widget_id,
            offset_x = session.pointer_offset.x,
            offset_y = session.pointer_offset.y,
            "Drag started"
        );
        self.state = DragState::Dragging(session);
        true
    }

    /// Record the latest pointer position. Only one frame is requested no
    /// matter how many moves arrive before it fires.
    pub fn pointer_move(&mut self, pointer: PointerId, at: Point, clock: &mut FrameClock) -> bool {
        let DragState::Dragging(session) = &mut self.state else {
            return false;
        };
        if session.pointer != pointer || !at.is_finite() {
            return false;
        }
        session.pending_pointer = Some(at);
        if session.frame.is_none() {
            session.frame = Some(clock.request());
        }
        true
    }

    /// Apply the most recent pending pointer position: clamp, snap, write
    /// the result to the registry and publish guides.
    pub fn process_frame(&mut self, registry: &mut SnapManager, container: Size) -> Option<DragUpdate> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.frame = None;
        let pointer = session.pending_pointer.take()?;
        let offset = session.pointer_offset;

        let geometry = *registry.get(self.widget_id.as_str())?;
        if !geometry.size.is_valid() || !container.is_valid() {
            return None;
        }

        let proposed = clamp_position(pointer - offset, geometry.size, container);
        let snap = registry.calculate_snap(self.widget_id.as_str(), proposed, geometry.size, container);
        let position = clamp_position(snap.position, geometry.size, container);

        registry.update_overlay(self.widget_id.as_str(), GeometryUpdate::position(position));
        registry.publish_guides(&self.widget_id, snap.guides);

        Some(DragUpdate {
            previous: geometry.position,
            position,
            snapped: snap.snapped,
        })
    }

    /// `Dragging → Idle` on pointer-up from the owning pointer.
    ///
    /// Any unprocessed move is discarded; the position already on screen is
    /// the one kept.
    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        registry: &mut SnapManager,
        clock: &mut FrameClock,
    ) -> Option<DragEnd> {
        match &self.state {
            DragState::Dragging(session) if session.pointer == pointer => self.end(registry, clock),
            _ => None,
        }
    }

    /// Force the session to end as if the pointer was released
    pub fn end(&mut self, registry: &mut SnapManager, clock: &mut FrameClock) -> Option<DragEnd> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        if let Some(frame) = session.frame {
            clock.cancel(frame);
        }
        registry.clear_guides_for(self.widget_id.as_str());

        let position = registry.get(self.widget_id.as_str())?.position;
        registry.update_overlay(self.widget_id.as_str(), GeometryUpdate::settled(position));

        let moved = position != session.start_position;
        tracing::debug!(widget = %self.widget_id, x = position.x, y = position.y, moved, "Drag ended");
        Some(DragEnd {
            widget_id: session.widget_id,
            position,
            moved,
        })
    }

    /// Abort the session with no side effects beyond dropping guides and the
    /// pending frame. Used when the widget disappears mid-drag.
    pub fn cancel(&mut self, registry: &mut SnapManager, clock: &mut FrameClock) {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return;
        };
        if let Some(frame) = session.frame {
            clock.cancel(frame);
        }
        registry.clear_guides_for(self.widget_id.as_str());
        tracing::debug!(widget = %self.widget_id, "Drag cancelled");
    }
}
