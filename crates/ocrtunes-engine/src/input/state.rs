use crate::coords::Vec2;

use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// Input bookkeeping for one window between redraws.
///
/// Button presses from winit carry no position, so the translator completes
/// them from the tracked pointer and modifiers. Every applied event is queued
/// until the next frame drains it.
#[derive(Debug, Default)]
pub struct InputState {
    modifiers: Modifiers,
    /// Pointer position in logical pixels; `None` while outside the window.
    pointer: Option<Vec2>,
    pending: Vec<InputEvent>,
}

impl InputState {
    /// Records what `ev` says about the pointer and modifiers, then queues it.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.pointer = Some(Vec2::new(*x, *y)),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::Key { modifiers, .. } => self.modifiers = *modifiers,
            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
            }
            InputEvent::Text(_) | InputEvent::Focused(_) => {}
        }
        self.pending.push(ev);
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Last known pointer position, or the origin when outside the window.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer.unwrap_or(Vec2::zero())
    }

    /// Events queued since the last [`clear_events`](Self::clear_events), in arrival order.
    #[inline]
    pub fn events(&self) -> &[InputEvent] {
        &self.pending
    }

    /// Drops the queue after a frame consumed it. Keeps the allocation.
    pub fn clear_events(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState, MouseButton, MouseButtonState, TextEvent};

    fn press(x: f32, y: f32, modifiers: Modifiers) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x,
            y,
            modifiers,
        })
    }

    fn shift() -> Modifiers {
        Modifiers { shift: true, ..Modifiers::default() }
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn press_moves_the_pointer() {
        let mut state = InputState::default();
        state.apply_event(press(12.0, 34.0, Modifiers::default()));
        assert_eq!(state.pointer(), Vec2::new(12.0, 34.0));
    }

    #[test]
    fn pointer_left_resets_to_origin() {
        let mut state = InputState::default();
        state.apply_event(InputEvent::PointerMoved(PointerMoveEvent { x: 5.0, y: 6.0 }));
        state.apply_event(InputEvent::PointerLeft);
        assert_eq!(state.pointer(), Vec2::zero());
    }

    // ── modifiers ─────────────────────────────────────────────────────────

    #[test]
    fn keys_and_buttons_refresh_modifiers() {
        let mut state = InputState::default();
        state.apply_event(InputEvent::Key {
            key: Key::Character('a'),
            state: KeyState::Pressed,
            modifiers: shift(),
            code: 0,
            repeat: false,
            text: Some("A".into()),
        });
        assert!(state.modifiers().shift);
        state.apply_event(press(0.0, 0.0, Modifiers::default()));
        assert!(!state.modifiers().any());
        state.apply_event(InputEvent::ModifiersChanged(shift()));
        assert_eq!(state.modifiers(), shift());
    }

    // ── queue ─────────────────────────────────────────────────────────────

    #[test]
    fn events_queue_in_arrival_order_until_cleared() {
        let mut state = InputState::default();
        state.apply_event(press(1.0, 1.0, Modifiers::default()));
        state.apply_event(InputEvent::Text(TextEvent { text: "é".into() }));
        state.apply_event(InputEvent::Focused(false));
        assert_eq!(state.events().len(), 3);
        assert!(matches!(state.events()[1], InputEvent::Text(_)));

        state.clear_events();
        assert!(state.events().is_empty());
        assert_eq!(state.pointer(), Vec2::new(1.0, 1.0));
    }
}
