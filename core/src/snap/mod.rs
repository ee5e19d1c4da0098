//! Widget geometry registry and magnetic snapping
//!
//! `SnapManager` is the single source of truth for where every widget is and
//! how big it is. During a drag the `DragController` proposes a position and
//! `calculate_snap` nudges it onto nearby alignment lines:
//!
//! - container edges and centers
//! - edges and centers of every other registered widget
//! - the dragged widget's own edges at its rest position (where it sat before
//!   the drag started), so letting go near the start returns it exactly
//!
//! Each axis is resolved independently.

mod guide;


use std::cmp::Ordering;
use std::collections::BTreeMap;

use hudsnap_types::{Point, Rect, Size, WidgetId};

pub use guide::{
    GUIDE_LABEL_HEIGHT, GUIDE_LABEL_WIDTH, GUIDE_LINE_MARGIN, GuideKind, GuideSource, SnapGuide,
};

/// Default snap distance in pixels
pub const DEFAULT_SNAP_THRESHOLD: f32 = 8.0;

/// Float slack when checking that a snapped coordinate stays in bounds
const BOUNDS_EPSILON: f32 = 1e-3;

// ─────────────────────────────────────────────────────────────────────────────
// Registry Entries
// ─────────────────────────────────────────────────────────────────────────────

/// Registered geometry for a single widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub position: Point,
    pub size: Size,
    /// Hardcoded fallback position
    pub default_position: Point,
    /// Position before the current drag; its edges act as alignment lines
    pub rest_position: Point,
}

impl OverlayGeometry {
    pub fn new(position: Point, size: Size, default_position: Point) -> Self {
        Self {
            position,
            size,
            default_position,
            rest_position: position,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Partial update for `SnapManager::update_overlay`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryUpdate {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rest_position: Option<Point>,
}

impl GeometryUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Move and make the new position the rest position
    pub fn settled(position: Point) -> Self {
        Self {
            position: Some(position),
            rest_position: Some(position),
            ..Default::default()
        }
    }
}

/// Output of `calculate_snap`
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// True when at least one axis moved onto a line
    pub snapped: bool,
    pub position: Point,
    /// At most one guide per axis
    pub guides: Vec<SnapGuide>,
}

impl SnapResult {
    fn unchanged(position: Point) -> Self {
        Self {
            snapped: false,
            position,
            guides: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Axis Helpers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn start(self, p: Point) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn extent(self, s: Size) -> f32 {
        match self {
            Axis::X => s.width,
            Axis::Y => s.height,
        }
    }

    fn guide(self, position: f32, source: GuideSource) -> SnapGuide {
        match self {
            Axis::X => SnapGuide::vertical(position, source),
            Axis::Y => SnapGuide::horizontal(position, source),
        }
    }
}

/// Which part of a box along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    const ALL: [Edge; 3] = [Edge::Start, Edge::Center, Edge::End];

    fn offset(self, extent: f32) -> f32 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => extent / 2.0,
            Edge::End => extent,
        }
    }

    fn name(self, axis: Axis) -> &'static str {
        match (axis, self) {
            (Axis::X, Edge::Start) => "left",
            (Axis::X, Edge::Center) => "center",
            (Axis::X, Edge::End) => "right",
            (Axis::Y, Edge::Start) => "top",
            (Axis::Y, Edge::Center) => "middle",
            (Axis::Y, Edge::End) => "bottom",
        }
    }
}

/// A candidate alignment line on one axis
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    position: f32,
    edge: Edge,
    /// `None` for container lines
    widget: Option<&'a WidgetId>,
    /// Line belongs to the dragged widget's rest position
    own_rest: bool,
}

impl Line<'_> {
    fn label(&self, axis: Axis) -> String {
        match self.widget {
            None if self.edge == Edge::Center => "center".to_string(),
            None => format!("{} edge", self.edge.name(axis)),
            Some(id) if self.own_rest => format!("{} original {}", id, self.edge.name(axis)),
            Some(id) => format!("{} {}", id, self.edge.name(axis)),
        }
    }

    fn source(&self) -> GuideSource {
        match self.widget {
            None => GuideSource::Container,
            Some(id) => GuideSource::Widget(id.clone()),
        }
    }
}

/// Best pairing found so far on an axis
#[derive(Debug, Clone, Copy)]
struct Pairing<'a> {
    distance: f32,
    moving_edge: Edge,
    line_index: usize,
    line: Line<'a>,
    new_start: f32,
}

impl Pairing<'_> {
    /// Deterministic ordering: distance, container before widgets, lowest
    /// widget id, then moving edge order and line order.
    fn cmp_priority(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.line.widget.is_some().cmp(&other.line.widget.is_some()))
            .then_with(|| self.line.widget.cmp(&other.line.widget))
            .then_with(|| self.moving_edge.cmp(&other.moving_edge))
            .then_with(|| self.line_index.cmp(&other.line_index))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snap Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of widget geometry plus the snapping algorithm
#[derive(Debug, Clone)]
pub struct SnapManager {
    overlays: BTreeMap<WidgetId, OverlayGeometry>,
    threshold: f32,
    /// Guides published by in-progress drags, keyed by dragged widget
    guides: BTreeMap<WidgetId, Vec<SnapGuide>>,
}

impl Default for SnapManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapManager {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SNAP_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            overlays: BTreeMap::new(),
            threshold: sanitize_threshold(threshold),
            guides: BTreeMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = sanitize_threshold(threshold);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────────────────────

    /// Add or replace a widget's geometry
    pub fn register_overlay(&mut self, id: WidgetId, geometry: OverlayGeometry) {
        tracing::debug!(widget = %id, x = geometry.position.x, y = geometry.position.y,
            width = geometry.size.width, height = geometry.size.height, "Registered overlay");
        self.overlays.insert(id, geometry);
    }

    /// Apply a partial update. Returns `false` for unknown ids.
    pub fn update_overlay(&mut self, id: &str, update: GeometryUpdate) -> bool {
        let Some(entry) = self.overlays.get_mut(id) else {
            return false;
        };
        if let Some(position) = update.position {
            entry.position = position;
        }
        if let Some(size) = update.size {
            entry.size = size;
        }
        if let Some(rest) = update.rest_position {
            entry.rest_position = rest;
        }
        true
    }

    /// Remove a widget. Unknown ids are ignored.
    pub fn unregister_overlay(&mut self, id: &str) -> Option<OverlayGeometry> {
        self.guides.remove(id);
        self.overlays.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&OverlayGeometry> {
        self.overlays.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.overlays.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// All registered widgets in id order
    pub fn iter(&self) -> impl Iterator<Item = (&WidgetId, &OverlayGeometry)> {
        self.overlays.iter()
    }

    /// Current positions of every registered widget
    pub fn positions(&self) -> BTreeMap<WidgetId, Point> {
        self.overlays
            .iter()
            .map(|(id, g)| (id.clone(), g.position))
            .collect()
    }

    /// The hardcoded default for `id`. Does not touch the registry; callers
    /// apply it through the normal update path.
    pub fn reset_to_default_position(&self, id: &str) -> Option<Point> {
        self.overlays.get(id).map(|g| g.default_position)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guides
    // ─────────────────────────────────────────────────────────────────────────

    pub fn publish_guides(&mut self, id: &WidgetId, guides: Vec<SnapGuide>) {
        if guides.is_empty() {
            self.guides.remove(id.as_str());
        } else {
            self.guides.insert(id.clone(), guides);
        }
    }

    /// All currently published guides
    pub fn guides(&self) -> impl Iterator<Item = &SnapGuide> {
        self.guides.values().flatten()
    }

    pub fn has_guides(&self) -> bool {
        !self.guides.is_empty()
    }

    pub fn clear_guides_for(&mut self, id: &str) {
        self.guides.remove(id);
    }

    pub fn clear_guides(&mut self) {
        self.guides.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapping
    // ─────────────────────────────────────────────────────────────────────────

    /// Compute the snap-adjusted position for widget `id` proposed at
    /// `proposed` with `size` inside `container`.
    ///
    /// Pure with respect to the registry: identical inputs give identical
    /// output. Invalid sizes or a non-finite proposal return the proposal
    /// unchanged with no guides.
    pub fn calculate_snap(
        &self,
        id: &str,
        proposed: Point,
        size: Size,
        container: Size,
    ) -> SnapResult {
        if !size.is_valid() || !container.is_valid() || !proposed.is_finite() {
            return SnapResult::unchanged(proposed);
        }

        let mut position = proposed;
        let mut guides = Vec::with_capacity(2);

        for axis in [Axis::X, Axis::Y] {
            let lines = self.candidate_lines(axis, id, container);
            if let Some(best) = self.best_pairing(axis, proposed, size, container, &lines) {
                match axis {
                    Axis::X => position.x = best.new_start,
                    Axis::Y => position.y = best.new_start,
                }
                guides.push(
                    axis.guide(best.line.position, best.line.source())
                        .with_label(best.line.label(axis)),
                );
            }
        }

        SnapResult {
            snapped: !guides.is_empty(),
            position,
            guides,
        }
    }

    /// Alignment lines on `axis` for a drag of `moving_id`
    fn candidate_lines<'a>(&'a self, axis: Axis, moving_id: &str, container: Size) -> Vec<Line<'a>> {
        let container_extent = axis.extent(container);
        let mut lines = Vec::with_capacity(3 + self.overlays.len() * 3);

        for edge in Edge::ALL {
            lines.push(Line {
                position: edge.offset(container_extent),
                edge,
                widget: None,
                own_rest: false,
            });
        }

        for (id, geometry) in &self.overlays {
            if !geometry.size.is_valid() {
                continue;
            }
            let own = id.as_str() == moving_id;
            let origin = if own {
                geometry.rest_position
            } else {
                geometry.position
            };
            if !origin.is_finite() {
                continue;
            }
            let start = axis.start(origin);
            let extent = axis.extent(geometry.size);
            for edge in Edge::ALL {
                lines.push(Line {
                    position: start + edge.offset(extent),
                    edge,
                    widget: Some(id),
                    own_rest: own,
                });
            }
        }

        lines
    }

    fn best_pairing<'a>(
        &self,
        axis: Axis,
        proposed: Point,
        size: Size,
        container: Size,
        lines: &[Line<'a>],
    ) -> Option<Pairing<'a>> {
        let start = axis.start(proposed);
        let extent = axis.extent(size);
        let max_start = (axis.extent(container) - extent).max(0.0);

        let mut best: Option<Pairing<'a>> = None;
        for moving_edge in Edge::ALL {
            let moving = start + moving_edge.offset(extent);
            for (line_index, line) in lines.iter().enumerate() {
                let distance = (moving - line.position).abs();
                if distance > self.threshold {
                    continue;
                }
                let new_start = line.position - moving_edge.offset(extent);
                if new_start < -BOUNDS_EPSILON || new_start > max_start + BOUNDS_EPSILON {
                    continue;
                }
                let candidate = Pairing {
                    distance,
                    moving_edge,
                    line_index,
                    line: *line,
                    new_start: new_start.clamp(0.0, max_start),
                };
                let better = match &best {
                    None => true,
                    Some(current) => candidate.cmp_priority(current) == Ordering::Less,
                };
                if better {
                    best = Some(candidate);
                }
            }
        }

        if let Some(ref pairing) = best {
            tracing::trace!(
                axis = ?axis,
                line = pairing.line.position,
                distance = pairing.distance,
                container = pairing.line.widget.is_none(),
                "Snap candidate selected"
            );
        }
        best
    }
}

fn sanitize_threshold(threshold: f32) -> f32 {
    if threshold.is_finite() && threshold >= 0.0 {
        threshold
    } else {
        DEFAULT_SNAP_THRESHOLD
    }
}
