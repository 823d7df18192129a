use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::input::Key;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::painter::Painter;
use crate::style::Style;
use crate::widget::{Editable, LayoutCtx, Widget};

/// Left inset of non-centred text.
pub(crate) const TEXT_INSET: f32 = 20.0;

/// Single-line text display that can optionally be edited.
///
/// Editing state machine:
/// - press inside: clear the text (if any) and toggle editing
/// - press outside: stop editing
/// - while editing: Backspace pops, Enter stops, printable input appends up
///   to `max_length` characters, Ctrl+V pastes from the system clipboard
///
/// Outside an edit session the field is never empty: `update` restores the
/// placeholder. Callers compare against [`Editable::placeholder`] to detect an
/// unfilled field.
#[derive(Debug)]
pub struct TextField {
    rect: Rect,
    text: String,
    placeholder: String,
    max_length: usize,
    editable: bool,
    editing: bool,

    style: Style,
    background: bool,
    centred: bool,
    text_size: Vec2,
}

impl TextField {
    pub fn new(config: &WidgetConfig, style: Style) -> Result<Self, BuildError> {
        let rect = config.rect()?;
        let placeholder = config.placeholder.clone().unwrap_or_else(|| config.text.clone());
        let text = if config.text.is_empty() { placeholder.clone() } else { config.text.clone() };
        let mut style = style;
        if let Some(size) = config.font_size {
            style.font_size = size;
        }
        if let Some(r) = config.radius {
            style.radius = r;
        }
        Ok(Self {
            rect,
            text,
            placeholder,
            max_length: config.max_length.unwrap_or(usize::MAX),
            editable: config.editable,
            editing: false,
            style,
            background: config.background,
            centred: config.centred,
            text_size: Vec2::zero(),
        })
    }

    /// The entered text, or `None` while the placeholder is showing.
    pub fn value(&self) -> Option<&str> {
        (self.text != self.placeholder && !self.text.is_empty()).then_some(self.text.as_str())
    }

    /// Replaces the placeholder. Also shows it when the field is not being edited.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
        if !self.editing {
            self.text = self.placeholder.clone();
        }
    }

    /// Leaves any edit session and shows the placeholder.
    pub fn reset(&mut self) {
        self.editing = false;
        self.text = self.placeholder.clone();
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn push_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            if self.text.chars().count() >= self.max_length {
                break;
            }
            self.text.push(c);
        }
    }

    fn paste(&mut self) {
        match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
            Ok(s) => self.push_str(&s),
            Err(e) => log::warn!("clipboard unavailable: {e}"),
        }
    }

    /// Shared by [`super::SearchOverlay`], which draws extra rows below.
    pub(crate) fn style(&self) -> &Style {
        &self.style
    }
}

impl Widget for TextField {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn handle_event(&mut self, event: &UiEvent, _ctx: &EventCtx) {
        if !self.editable {
            return;
        }
        match event {
            UiEvent::PointerDown { .. } => {
                if event.pressed_in(self.rect) {
                    self.text.clear();
                    self.editing = !self.editing;
                } else {
                    self.editing = false;
                }
            }
            UiEvent::KeyDown { key, modifiers, text } if self.editing => match key {
                Key::Backspace => {
                    self.text.pop();
                }
                Key::Enter => self.editing = false,
                Key::Character('v') if modifiers.ctrl || modifiers.meta => self.paste(),
                _ if modifiers.ctrl || modifiers.meta => {}
                _ => {
                    if let Some(t) = text {
                        self.push_str(t);
                    }
                }
            },
            UiEvent::Text { text } if self.editing => self.push_str(text),
            _ => {}
        }
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        if !self.editing && self.text.is_empty() {
            self.text = self.placeholder.clone();
        }
        self.text_size = ctx.measure(&self.text, self.style.font, self.style.font_size);
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        if self.background {
            let color = if self.editing { self.style.active } else { self.style.background };
            painter.fill_rounded_rect(self.rect, self.style.radius, color, None);
        }
        let origin = layout::text_origin(self.rect, self.text_size, self.centred, TEXT_INSET);
        painter.text(&self.text, self.style.font, self.style.font_size, self.style.text, origin);
    }

    fn is_active(&self) -> bool {
        self.editing
    }
}

impl Editable for TextField {
    fn text(&self) -> &str {
        &self.text
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, key, layout_ctx, typed};
    use ocrtunes_engine::input::Modifiers;
    use ocrtunes_engine::text::FontSystem;
    use proptest::prelude::*;

    fn field(max: usize) -> TextField {
        TextField::new(
            &WidgetConfig::new(0.0, 0.0, 200.0, 50.0).text("Username").editable(true).max_length(max),
            Style::default(),
        )
        .unwrap()
    }

    fn type_str(f: &mut TextField, s: &str) {
        for c in s.chars() {
            f.handle_event(&typed(c), &EventCtx::default());
        }
    }

    // ── editing ───────────────────────────────────────────────────────────

    #[test]
    fn press_inside_clears_and_starts_editing() {
        let mut f = field(22);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        assert!(f.is_editing());
        assert_eq!(f.text(), "");
        type_str(&mut f, "bob");
        assert_eq!(f.text(), "bob");
        assert_eq!(f.value(), Some("bob"));
    }

    #[test]
    fn press_outside_stops_editing_and_keeps_text() {
        let mut f = field(22);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        type_str(&mut f, "bob");
        f.handle_event(&click(500.0, 10.0), &EventCtx::default());
        assert!(!f.is_editing());
        assert_eq!(f.text(), "bob");
    }

    #[test]
    fn backspace_and_enter() {
        let mut f = field(22);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        type_str(&mut f, "abc");
        f.handle_event(&key(Key::Backspace), &EventCtx::default());
        assert_eq!(f.text(), "ab");
        f.handle_event(&key(Key::Enter), &EventCtx::default());
        assert!(!f.is_editing());
        assert_eq!(f.text(), "ab");
    }

    #[test]
    fn input_stops_at_max_length() {
        let mut f = field(3);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        type_str(&mut f, "abcdef");
        assert_eq!(f.text(), "abc");
    }

    #[test]
    fn keys_ignored_when_not_editing() {
        let mut f = field(22);
        type_str(&mut f, "abc");
        assert_eq!(f.text(), "Username");
    }

    #[test]
    fn ctrl_shortcuts_do_not_insert_text() {
        let mut f = field(22);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        let ctrl_a = UiEvent::KeyDown {
            key: Key::Character('a'),
            modifiers: Modifiers { ctrl: true, ..Modifiers::default() },
            text: Some("\u{1}".into()),
        };
        f.handle_event(&ctrl_a, &EventCtx::default());
        assert_eq!(f.text(), "");
    }

    #[test]
    fn read_only_field_ignores_presses() {
        let mut f = TextField::new(&WidgetConfig::new(0.0, 0.0, 200.0, 50.0).text("Error"), Style::default())
            .unwrap();
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        assert!(!f.is_editing());
        assert_eq!(f.text(), "Error");
        assert_eq!(f.value(), None);
    }

    // ── placeholder ───────────────────────────────────────────────────────

    #[test]
    fn placeholder_returns_after_empty_edit() {
        let fonts = FontSystem::new();
        let mut f = field(22);
        f.handle_event(&click(10.0, 10.0), &EventCtx::default());
        f.update(&layout_ctx(&fonts));
        assert_eq!(f.text(), "", "stays empty while editing");
        f.handle_event(&click(500.0, 10.0), &EventCtx::default());
        f.update(&layout_ctx(&fonts));
        assert_eq!(f.text(), "Username");
        assert_eq!(f.value(), None);
    }

    #[test]
    fn set_placeholder_shows_when_idle() {
        let mut f = field(22);
        f.set_placeholder("My Playlist #2");
        assert_eq!(f.text(), "My Playlist #2");
    }

    proptest! {
        #[test]
        fn idle_empty_field_restores_placeholder(text in ".{0,12}", editing in any::<bool>()) {
            let fonts = FontSystem::new();
            let mut f = field(22);
            if editing {
                f.handle_event(&click(10.0, 10.0), &EventCtx::default());
            }
            f.set_text(&text);
            f.update(&layout_ctx(&fonts));
            if !f.is_editing() && text.is_empty() {
                prop_assert_eq!(f.text(), "Username");
            } else {
                prop_assert_eq!(f.text(), text.as_str());
            }
        }
    }
}
