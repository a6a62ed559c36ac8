//! Hit testing: pointer position → drop target.
//!
//! Fields stack top-to-bottom in a single column. Each field's region splits
//! at its vertical center into a top and a bottom half; the area below the
//! last field is the "append" zone.

use fb_core::drag::{DropTarget, Half};
use fb_core::id::FieldId;
use kurbo::{Point, Rect};

/// Column layout of the designer canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// Vertical space between fields. Default: **12**.
    pub gap: f64,
    /// Inset from the canvas edges. Default: **16**.
    pub pad: f64,
    /// Height used when the host has not measured a field yet. Default: **96**.
    pub default_height: f64,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            gap: 12.0,
            pad: 16.0,
            default_height: 96.0,
        }
    }
}

/// One field's hit region in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRegion {
    pub id: FieldId,
    pub bounds: Rect,
}

impl FieldRegion {
    pub fn top_half(&self) -> Rect {
        let b = self.bounds;
        Rect::new(b.x0, b.y0, b.x1, b.center().y)
    }

    pub fn bottom_half(&self) -> Rect {
        let b = self.bounds;
        Rect::new(b.x0, b.center().y, b.x1, b.y1)
    }

    /// Which half a vertical position falls in. The center line belongs to the bottom half.
    pub fn half_at(&self, y: f64) -> Half {
        if y < self.bounds.center().y {
            Half::Top
        } else {
            Half::Bottom
        }
    }

    /// Vertical distance from `y` to this region, zero inside it.
    fn distance_y(&self, y: f64) -> f64 {
        if y < self.bounds.y0 {
            self.bounds.y0 - y
        } else if y > self.bounds.y1 {
            y - self.bounds.y1
        } else {
            0.0
        }
    }
}

/// Stack fields in a column inside `canvas`. `None` heights fall back to
/// `layout.default_height`.
pub fn layout_column<I>(fields: I, canvas: Rect, layout: &ColumnLayout) -> Vec<FieldRegion>
where
    I: IntoIterator<Item = (FieldId, Option<f64>)>,
{
    let x0 = canvas.x0 + layout.pad;
    let x1 = (canvas.x1 - layout.pad).max(x0);
    let mut y = canvas.y0 + layout.pad;
    let mut regions = Vec::new();
    for (id, height) in fields {
        let h = height.unwrap_or(layout.default_height).max(0.0);
        regions.push(FieldRegion {
            id,
            bounds: Rect::new(x0, y, x1, y + h),
        });
        y += h + layout.gap;
    }
    regions
}

/// Map a pointer position to a drop target.
///
/// Returns `None` outside the canvas, `EmptyArea` on an empty canvas or
/// below the last field, and otherwise the half of the nearest field
/// (pointers in gaps and padding snap to the closest region).
pub fn hit_test(regions: &[FieldRegion], canvas: Rect, point: Point) -> Option<DropTarget> {
    if !canvas.contains(point) {
        log::trace!("pointer ({}, {}) outside canvas", point.x, point.y);
        return None;
    }
    let Some(last) = regions.last() else {
        return Some(DropTarget::EmptyArea);
    };
    if point.y > last.bounds.y1 {
        return Some(DropTarget::EmptyArea);
    }

    // Topmost region wins a tie, so a gap midpoint resolves to the field above.
    let mut nearest = &regions[0];
    for region in &regions[1..] {
        if region.distance_y(point.y) < nearest.distance_y(point.y) {
            nearest = region;
        }
    }
    let half = nearest.half_at(point.y);
    log::trace!("pointer y={} -> {} {half:?}", point.y, nearest.id);
    Some(DropTarget::FieldHalf { id: nearest.id, half })
}
