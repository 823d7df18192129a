use std::any::Any;

use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::text::{FontId, TextMeasure};

use crate::event::{EventCtx, UiEvent};
use crate::painter::Painter;
use crate::scene::SceneId;

// ── Activation ────────────────────────────────────────────────────────────

/// One-shot "just pressed" flag.
///
/// Set in `handle_event`, observed by the owning scene during the same
/// input pass, cleared in the widget's next `update`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    pending: bool,
}

impl Activation {
    #[inline]
    pub fn trigger(&mut self) {
        self.pending = true;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn clear(&mut self) {
        self.pending = false;
    }
}

// ── LayoutCtx ─────────────────────────────────────────────────────────────

/// Context passed to [`Widget::update`].
pub struct LayoutCtx<'a> {
    pub fonts: &'a dyn TextMeasure,
    /// Font used when a style leaves `font` unset.
    pub default_font: Option<FontId>,
    /// Seconds since the previous frame.
    pub dt: f32,
}

impl<'a> LayoutCtx<'a> {
    pub fn new(fonts: &'a dyn TextMeasure, default_font: Option<FontId>, dt: f32) -> Self {
        Self { fonts, default_font, dt }
    }

    /// Size of `text` on one line.
    pub fn measure(&self, text: &str, font: Option<FontId>, size: f32) -> Vec2 {
        self.fonts.measure(text, font.or(self.default_font), size)
    }
}

// ── capabilities ──────────────────────────────────────────────────────────

/// Widgets that report presses and may request a scene transition.
pub trait Clickable {
    /// `true` during the input pass right after a qualifying press.
    fn activated(&self) -> bool;

    fn redirect(&self) -> Option<&SceneId> {
        None
    }
}

/// Widgets holding user-editable text.
pub trait Editable {
    fn text(&self) -> &str;
    fn placeholder(&self) -> &str;
    fn is_editing(&self) -> bool;
    fn set_text(&mut self, text: &str);
}

/// Widgets with a drag-scrolled viewport.
pub trait Scrollable {
    /// Accumulated drag offset; `0` at the top, negative when scrolled down.
    fn offset(&self) -> f32;
    fn thumb(&self) -> Rect;
    fn reset_scroll(&mut self);
}

// ── Widget ────────────────────────────────────────────────────────────────

/// Type-erasure helper so scenes can recover concrete widget types.
pub trait AsAny: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The capability set every element of a scene implements.
///
/// Per frame, in order: `handle_event` for each pending event, `update` once,
/// `draw` once. `draw` must not mutate state; `handle_event` must not draw.
pub trait Widget: AsAny {
    /// Current bounding rectangle in logical pixels.
    fn rect(&self) -> Rect;

    fn handle_event(&mut self, event: &UiEvent, ctx: &EventCtx);

    /// Recomputes derived visual state and clears one-shot flags.
    fn update(&mut self, ctx: &LayoutCtx<'_>);

    fn draw(&self, painter: &mut Painter<'_>);

    /// Whether the widget is in its "engaged" state (pressed, editing, open, dragging).
    fn is_active(&self) -> bool {
        false
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        None
    }

    fn as_scrollable_mut(&mut self) -> Option<&mut dyn Scrollable> {
        None
    }
}
