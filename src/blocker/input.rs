use crate::blocker::model::{ResizeEdge, ScreenRect};
use crate::blocker::state::OverlayLimits;

/// Classify a widget-local pointer position against the resize margins.
///
/// Corners win over single edges; candidates are tried in the order
/// top-left, top-right, bottom-left, bottom-right, top, bottom, left, right.
pub fn resize_edge_at(local: (i32, i32), size: (i32, i32), handle: i32) -> Option<ResizeEdge> {
    let (x, y) = local;
    let (width, height) = size;

    let top = y < handle;
    let bottom = y > height - handle;
    let left = x < handle;
    let right = x > width - handle;

    let candidates = [
        (top && left, ResizeEdge::TopLeft),
        (top && right, ResizeEdge::TopRight),
        (bottom && left, ResizeEdge::BottomLeft),
        (bottom && right, ResizeEdge::BottomRight),
        (top, ResizeEdge::Top),
        (bottom, ResizeEdge::Bottom),
        (left, ResizeEdge::Left),
        (right, ResizeEdge::Right),
    ];

    candidates
        .into_iter()
        .find_map(|(hit, edge)| hit.then_some(edge))
}

/// Geometry for a resize gesture, computed from the snapshot taken when the
/// gesture started so repeated moves never accumulate error. The edge
/// opposite the dragged one stays pinned.
pub fn resized_geometry(
    base: ScreenRect,
    edge: ResizeEdge,
    delta: (i32, i32),
    limits: &OverlayLimits,
) -> ScreenRect {
    let mut out = base;

    if edge.moves_left() {
        out.width = (base.width - delta.0).max(limits.min_width);
        out.x = base.x + base.width - out.width;
    }
    if edge.moves_right() {
        out.width = (base.width + delta.0).max(limits.min_width);
    }
    if edge.moves_top() {
        out.height = (base.height - delta.1).max(limits.min_height);
        out.y = base.y + base.height - out.height;
    }
    if edge.moves_bottom() {
        out.height = (base.height + delta.1).max(limits.min_height);
    }

    out
}
