//! Shared geometry for hit-testing and placement.
//!
//! All rects are logical pixels with a top-left origin; containment is
//! half-open as in [`Rect::contains`].

use ocrtunes_engine::coords::{Rect, Vec2};

/// The `index`-th row stacked directly below `header`, same size as the header.
#[inline]
pub fn stacked_row(header: Rect, index: usize) -> Rect {
    header.translate(Vec2::new(0.0, header.height() * (index + 1) as f32))
}

/// Row `index` of a list starting at `first`, spaced by `pitch` and shifted by `offset`.
#[inline]
pub fn list_row(first: Rect, pitch: f32, index: usize, offset: f32) -> Rect {
    first.translate(Vec2::new(0.0, pitch * index as f32 + offset))
}

/// Cell `index` of a grid that wraps after `columns` cells.
///
/// `first` is the top-left cell; both axes advance by the cell size plus `gap`.
#[inline]
pub fn grid_cell(first: Rect, gap: f32, columns: usize, index: usize, offset: f32) -> Rect {
    let columns = columns.max(1);
    let (col, row) = (index % columns, index / columns);
    first.translate(Vec2::new(
        (first.width() + gap) * col as f32,
        (first.height() + gap) * row as f32 + offset,
    ))
}

/// Number of grid rows needed for `count` cells.
#[inline]
pub fn grid_rows(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}

/// Top-left origin that centres a block of `size` inside `rect`.
#[inline]
pub fn centred(rect: Rect, size: Vec2) -> Vec2 {
    Vec2::new(
        rect.x() + ((rect.width() - size.x) / 2.0).floor(),
        rect.y() + ((rect.height() - size.y) / 2.0).floor(),
    )
}

/// Origin for text either centred in `rect` or inset from its left edge,
/// always vertically centred.
#[inline]
pub fn text_origin(rect: Rect, size: Vec2, centred_h: bool, inset: f32) -> Vec2 {
    let c = centred(rect, size);
    if centred_h { c } else { Vec2::new(rect.x() + inset, c.y) }
}

/// Whether `rect`'s top-left corner lies inside `region`.
///
/// Popups use this to decide which base widgets they cover.
#[inline]
pub fn origin_in(rect: Rect, region: Rect) -> bool {
    region.contains(rect.origin)
}
