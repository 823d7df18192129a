use ocrtunes_engine::coords::Vec2;
use ocrtunes_engine::input::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

pub use ocrtunes_engine::input::Modifiers;

/// Input events routed to scenes and widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PointerDown { pos: Vec2, button: MouseButton },
    PointerUp { pos: Vec2, button: MouseButton },
    PointerMoved { pos: Vec2 },
    /// Key press. `text` is what the key produced with the current layout, if anything.
    KeyDown { key: Key, modifiers: Modifiers, text: Option<String> },
    /// Committed IME text.
    Text { text: String },
}

impl UiEvent {
    /// Translates an engine input event. Key releases and window-level events are dropped.
    pub fn from_input(event: &InputEvent) -> Option<UiEvent> {
        match event {
            InputEvent::PointerMoved(m) => Some(UiEvent::PointerMoved { pos: Vec2::new(m.x, m.y) }),
            InputEvent::PointerButton(b) => {
                let pos = Vec2::new(b.x, b.y);
                Some(match b.state {
                    MouseButtonState::Pressed => UiEvent::PointerDown { pos, button: b.button },
                    MouseButtonState::Released => UiEvent::PointerUp { pos, button: b.button },
                })
            }
            InputEvent::Key { key, state: KeyState::Pressed, modifiers, text, .. } => {
                Some(UiEvent::KeyDown { key: *key, modifiers: *modifiers, text: text.clone() })
            }
            InputEvent::Text(t) => Some(UiEvent::Text { text: t.text.clone() }),
            _ => None,
        }
    }

    /// Position of a primary-button press.
    #[inline]
    pub fn primary_press(&self) -> Option<Vec2> {
        match self {
            UiEvent::PointerDown { pos, button: MouseButton::Left } => Some(*pos),
            _ => None,
        }
    }

    /// Shorthand for a primary press inside the half-open `rect`.
    #[inline]
    pub fn pressed_in(&self, rect: ocrtunes_engine::coords::Rect) -> bool {
        self.primary_press().is_some_and(|p| rect.contains(p))
    }
}

/// Live pointer snapshot at the time an event is dispatched.
///
/// Drag protocols read this instead of polling the platform.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct EventCtx {
    pub pointer: Vec2,
    pub primary_down: bool,
}

impl EventCtx {
    /// Folds `event` into the snapshot so it reflects the state *after* the event.
    pub fn advance(&mut self, event: &UiEvent) {
        match event {
            UiEvent::PointerMoved { pos } => self.pointer = *pos,
            UiEvent::PointerDown { pos, button } => {
                self.pointer = *pos;
                if *button == MouseButton::Left {
                    self.primary_down = true;
                }
            }
            UiEvent::PointerUp { pos, button } => {
                self.pointer = *pos;
                if *button == MouseButton::Left {
                    self.primary_down = false;
                }
            }
            UiEvent::KeyDown { .. } | UiEvent::Text { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrtunes_engine::input::{PointerButtonEvent, TextEvent};

    #[test]
    fn button_press_becomes_pointer_down() {
        let ev = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 3.0,
            y: 4.0,
            modifiers: Modifiers::default(),
        });
        let ui = UiEvent::from_input(&ev).unwrap();
        assert_eq!(ui.primary_press(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn key_release_is_dropped() {
        let ev = InputEvent::Key {
            key: Key::Enter,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
            text: None,
        };
        assert!(UiEvent::from_input(&ev).is_none());
    }

    #[test]
    fn ime_text_passes_through() {
        let ev = InputEvent::Text(TextEvent { text: "é".into() });
        assert_eq!(UiEvent::from_input(&ev), Some(UiEvent::Text { text: "é".into() }));
    }

    #[test]
    fn ctx_tracks_primary_button() {
        let mut ctx = EventCtx::default();
        ctx.advance(&UiEvent::PointerDown { pos: Vec2::new(1.0, 2.0), button: MouseButton::Left });
        assert!(ctx.primary_down);
        assert_eq!(ctx.pointer, Vec2::new(1.0, 2.0));
        ctx.advance(&UiEvent::PointerDown { pos: Vec2::new(1.0, 2.0), button: MouseButton::Right });
        ctx.advance(&UiEvent::PointerUp { pos: Vec2::new(5.0, 2.0), button: MouseButton::Left });
        assert!(!ctx.primary_down);
        assert_eq!(ctx.pointer.x, 5.0);
    }
}
