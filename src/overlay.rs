//! Overlay geometry.
//!
//! Converts a normalized detector bounding box plus the current
//! viewport into pixel-space geometry for the surface: the anchored
//! rect, corner-marker anchors, the floating confidence label anchor,
//! and the insight panel placement.
//!
//! Everything here is a pure function of `(bbox, viewport)`. The
//! surface recomputes on every viewport change (rotation) and every
//! insight change; nothing is cached across states.

use serde::Serialize;

/// Current rendering surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Anchors for the four corner markers, offset outward from the rect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CornerAnchors {
    pub tl: Point,
    pub tr: Point,
    pub bl: Point,
    pub br: Point,
}

/// Pixel-space overlay geometry for one bounding box.
///
/// No independent identity: recomputed from scratch whenever its
/// inputs change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub corner_anchors: CornerAnchors,
    pub label_anchor: Point,
}

/// Corner markers sit 2px outside the rect edge.
pub const CORNER_INSET: f64 = 2.0;

/// Height reserved for the floating confidence label above the rect.
pub const LABEL_HEIGHT: f64 = 32.0;

/// Insight panel sizing: at most 80% of the viewport width, capped.
pub const PANEL_MAX_WIDTH: f64 = 340.0;
pub const PANEL_WIDTH_RATIO: f64 = 0.8;

/// Vertical offset of the centered panel above the viewport midpoint.
const PANEL_CENTER_LIFT: f64 = 150.0;

/// Gap between an anchored box and a panel placed below it.
const PANEL_GAP: f64 = 16.0;

/// Compute the anchored overlay geometry for a detector bounding box.
///
/// `None` when the box is absent. This is the documented fallback, not an
/// error: detectors running on the degraded model return no geometry,
/// and the surface renders a centered insight panel instead (see
/// [`place_panel`]).
///
/// Coordinates are clamped to [0, 1] and re-ordered before scaling, so
/// an out-of-range or inverted detector box can never place UI
/// off-screen.
pub fn compute_overlay(bbox: Option<[f64; 4]>, viewport: Viewport) -> Option<OverlayRect> {
    let [x1, y1, x2, y2] = bbox?;

    let (x1, x2) = ordered_unit(x1, x2);
    let (y1, y2) = ordered_unit(y1, y2);

    let left = x1 * viewport.width;
    let top = y1 * viewport.height;
    let width = (x2 - x1) * viewport.width;
    let height = (y2 - y1) * viewport.height;

    let right = left + width;
    let bottom = top + height;
    let corner_anchors = CornerAnchors {
        tl: Point {
            x: left - CORNER_INSET,
            y: top - CORNER_INSET,
        },
        tr: Point {
            x: right + CORNER_INSET,
            y: top - CORNER_INSET,
        },
        bl: Point {
            x: left - CORNER_INSET,
            y: bottom + CORNER_INSET,
        },
        br: Point {
            x: right + CORNER_INSET,
            y: bottom + CORNER_INSET,
        },
    };

    // Label floats above the rect, horizontally centered. When the box
    // touches the top of the frame the anchor pins to 0 and the label
    // renders just inside the box instead of above it.
    let label_anchor = Point {
        x: left + width / 2.0,
        y: (top - LABEL_HEIGHT).max(0.0),
    };

    Some(OverlayRect {
        left,
        top,
        width,
        height,
        corner_anchors,
        label_anchor,
    })
}

/// Where the surface should draw the insight panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PanelPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    /// True when the panel hangs off an anchored box rather than
    /// floating centered.
    pub anchored: bool,
}

/// Place the insight panel for the current overlay state.
///
/// With an anchored rect and room below it, the panel hangs under the
/// box; otherwise it floats centered (lifted above the midpoint so the
/// capture bar stays clear). Either way the placement is clamped fully
/// inside the viewport.
pub fn place_panel(
    overlay: Option<&OverlayRect>,
    viewport: Viewport,
    panel_height: f64,
) -> PanelPlacement {
    let width = (viewport.width * PANEL_WIDTH_RATIO).min(PANEL_MAX_WIDTH);

    if let Some(rect) = overlay {
        let below = rect.top + rect.height + PANEL_GAP;
        if below + panel_height <= viewport.height {
            let left = rect.left + rect.width / 2.0 - width / 2.0;
            return PanelPlacement {
                left: clamp_axis(left, width, viewport.width),
                top: below,
                width,
                anchored: true,
            };
        }
    }

    let left = (viewport.width - width) / 2.0;
    let top = viewport.height / 2.0 - PANEL_CENTER_LIFT;
    PanelPlacement {
        left: clamp_axis(left, width, viewport.width),
        top: clamp_axis(top, panel_height, viewport.height),
        width,
        anchored: false,
    }
}

fn ordered_unit(a: f64, b: f64) -> (f64, f64) {
    let a = clamp_unit(a);
    let b = clamp_unit(b);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn clamp_axis(offset: f64, extent: f64, limit: f64) -> f64 {
    offset.clamp(0.0, (limit - extent).max(0.0))
}
