//! Drag-scrolled viewport shared by [`super::ScrollableList`] and [`super::GridSlide`].

use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::paint::Color;

use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::painter::Painter;

pub const TRACK_WIDTH: f32 = 20.0;
/// Thumb shrink per row beyond the visible count.
pub const SHRINK_PER_ROW: f32 = 10.0;
pub const MIN_THUMB: f32 = 20.0;

/// A vertical slider whose thumb position selects how far content is scrolled.
///
/// The thumb spans `[top, top + length]`. Its height is the content height
/// capped at `length`, shrunk by [`SHRINK_PER_ROW`] for each overflowing row.
/// Moving the thumb over its whole travel scrolls through every overflowing
/// row, so one thumb pixel scrolls `1 / SHRINK_PER_ROW` of a row while the
/// minimum height is not reached.
#[derive(Debug, Clone)]
pub struct ScrollTrack {
    top: f32,
    length: f32,
    thumb: Rect,
    overflow: usize,
    dragging: bool,
    grab_y: f32,
}

impl ScrollTrack {
    pub fn new(x: f32, top: f32, length: f32) -> Self {
        Self {
            top,
            length,
            thumb: Rect::new(x, top, TRACK_WIDTH, 0.0),
            overflow: 0,
            dragging: false,
            grab_y: top,
        }
    }

    /// Resizes the thumb for `rows` rows of `pitch` pixels, `max_visible` at a time.
    ///
    /// The thumb keeps its position, clamped to the new travel.
    pub fn set_content(&mut self, rows: usize, max_visible: usize, pitch: f32) {
        let total = pitch * rows as f32;
        self.overflow = rows.saturating_sub(max_visible);
        let mut height = self.length.min(total);
        if total > self.length {
            height -= SHRINK_PER_ROW * self.overflow as f32;
            height = height.max(MIN_THUMB.min(self.length));
        }
        self.thumb.size.y = height.max(0.0);
        self.move_thumb(0.0);
    }

    #[inline]
    pub fn thumb(&self) -> Rect {
        self.thumb
    }

    /// Track bounds (the thumb's full range of motion).
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.thumb.x(), self.top, TRACK_WIDTH, self.length)
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Distance the thumb can move.
    #[inline]
    pub fn travel(&self) -> f32 {
        (self.length - self.thumb.height()).max(0.0)
    }

    /// Accumulated drag offset: `0` at the top, negative further down.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.top - self.thumb.y()
    }

    /// Rows scrolled past the top, fractional while between rows.
    pub fn scrolled_rows(&self) -> f32 {
        let travel = self.travel();
        if self.overflow == 0 || travel <= 0.0 {
            return 0.0;
        }
        -self.offset() * self.overflow as f32 / travel
    }

    pub fn reset(&mut self) {
        self.thumb.origin.y = self.top;
        self.dragging = false;
    }

    /// Press-and-hold on the thumb starts a drag; pointer motion moves it
    /// until the primary button is released.
    pub fn handle_event(&mut self, _event: &UiEvent, ctx: &EventCtx) {
        if !ctx.primary_down {
            self.dragging = false;
            return;
        }
        if !self.dragging && self.thumb.contains(ctx.pointer) {
            self.dragging = true;
            self.grab_y = ctx.pointer.y;
        }
        if self.dragging {
            self.move_thumb(ctx.pointer.y - self.grab_y);
            self.grab_y = ctx.pointer.y;
        }
    }

    fn move_thumb(&mut self, dy: f32) {
        let y = (self.thumb.y() + dy).clamp(self.top, self.top + self.travel());
        self.thumb.origin.y = y;
    }

    pub fn draw(&self, painter: &mut Painter<'_>, idle: Color, dragging: Color) {
        if self.thumb.height() <= 0.0 {
            return;
        }
        let color = if self.dragging { dragging } else { idle };
        painter.fill_rounded_rect(self.thumb, TRACK_WIDTH / 2.0, color, None);
    }
}

/// Geometry of a scrolled viewport: the first cell, spacing, visible rows and the track.
#[derive(Debug, Clone)]
pub struct ScrollArea {
    first: Rect,
    gap: f32,
    max_visible: usize,
    columns: usize,
    track: ScrollTrack,
}

impl ScrollArea {
    pub fn new(first: Rect, gap: f32, max_visible: usize, columns: usize) -> Result<Self, BuildError> {
        if max_visible == 0 {
            return Err(BuildError::ZeroVisible);
        }
        if columns == 0 {
            return Err(BuildError::ZeroColumns);
        }
        let pitch = first.height() + gap;
        let span = (first.width() + gap) * columns as f32;
        let track = ScrollTrack::new(first.x() + span, first.y(), pitch * max_visible as f32);
        Ok(Self { first, gap, max_visible, columns, track })
    }

    #[inline]
    pub fn first(&self) -> Rect {
        self.first
    }

    #[inline]
    pub fn gap(&self) -> f32 {
        self.gap
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.first.height() + self.gap
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Height of the visible window.
    #[inline]
    pub fn max_height(&self) -> f32 {
        self.pitch() * self.max_visible as f32
    }

    #[inline]
    pub fn track(&self) -> &ScrollTrack {
        &self.track
    }

    #[inline]
    pub fn track_mut(&mut self) -> &mut ScrollTrack {
        &mut self.track
    }

    pub fn set_rows(&mut self, rows: usize) {
        let (max_visible, pitch) = (self.max_visible, self.pitch());
        self.track.set_content(rows, max_visible, pitch);
    }

    /// Vertical shift applied to every cell.
    #[inline]
    pub fn pixel_offset(&self) -> f32 {
        -self.track.scrolled_rows() * self.pitch()
    }

    /// Whether a cell at `rect` is inside the window and may be hit or drawn.
    #[inline]
    pub fn is_visible(&self, rect: Rect) -> bool {
        let top = self.first.y();
        rect.bottom() < top + self.max_height() + self.gap && rect.bottom() > top
    }

    /// Opaque bands above and below the window that hide overscrolled cells.
    pub fn guards(&self) -> [Rect; 2] {
        let (x, y, h) = (self.first.x(), self.first.y(), self.first.height());
        let span = match self.columns {
            1 => self.first.width(),
            n => (self.first.width() + self.gap) * n as f32,
        };
        [
            Rect::new(x, y - h, span, h),
            Rect::new(x, y + self.max_height() - self.gap, span, h),
        ]
    }

    /// Window plus track.
    pub fn bounds(&self) -> Rect {
        let track = self.track.bounds();
        Rect::from_origin_size(self.first.origin, Vec2::new(track.right() - self.first.x(), self.max_height()))
    }

    pub fn draw_guards(&self, painter: &mut Painter<'_>, color: Color) {
        for guard in self.guards() {
            painter.fill_rect(guard, color);
        }
    }
}
