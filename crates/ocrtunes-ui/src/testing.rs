//! Event and context builders shared by widget tests.

use ocrtunes_engine::coords::Vec2;
use ocrtunes_engine::input::{Key, Modifiers, MouseButton};
use ocrtunes_engine::text::FontSystem;

use crate::event::{EventCtx, UiEvent};
use crate::widget::LayoutCtx;

pub fn click(x: f32, y: f32) -> UiEvent {
    UiEvent::PointerDown { pos: Vec2::new(x, y), button: MouseButton::Left }
}

pub fn release(x: f32, y: f32) -> UiEvent {
    UiEvent::PointerUp { pos: Vec2::new(x, y), button: MouseButton::Left }
}

pub fn move_to(x: f32, y: f32) -> UiEvent {
    UiEvent::PointerMoved { pos: Vec2::new(x, y) }
}

pub fn key(key: Key) -> UiEvent {
    UiEvent::KeyDown { key, modifiers: Modifiers::default(), text: None }
}

pub fn typed(c: char) -> UiEvent {
    UiEvent::KeyDown {
        key: Key::Character(c.to_ascii_lowercase()),
        modifiers: Modifiers::default(),
        text: Some(c.to_string()),
    }
}

pub fn layout_ctx(fonts: &FontSystem) -> LayoutCtx<'_> {
    LayoutCtx::new(fonts, None, 1.0 / 60.0)
}

/// Feeds `event` through `ctx` the way a scene does, then returns the snapshot.
pub fn advance(ctx: &mut EventCtx, event: &UiEvent) -> EventCtx {
    ctx.advance(event);
    *ctx
}
