use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::images::ImageId;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::painter::Painter;
use crate::scene::SceneId;
use crate::style::Style;
use crate::widget::{Activation, Clickable, LayoutCtx, Widget};

/// Horizontal padding added to the label when the button grows to fit it.
const LABEL_PADDING: f32 = 10.0;

/// A pressable label with an optional redirect target.
///
/// A press inside the rect sets the activation flag for the rest of the input
/// pass; the next `update` clears it. The width grows to fit the label and
/// never shrinks below the configured width.
///
/// # Example
/// ```rust,ignore
/// let log_in = Button::new(
///     &WidgetConfig::new(1150.0, 550.0, 225.0, 50.0).text("Log In").redirect(LIBRARY),
///     Style::default().background(DARK_BLUE).radius(25.0),
/// )?;
/// ```
#[derive(Debug)]
pub struct Button {
    rect: Rect,
    min_width: f32,
    label: String,
    style: Style,
    background: bool,
    redirect: Option<SceneId>,
    icon: Option<ImageId>,

    activation: Activation,
    hovering: bool,
    label_size: Vec2,
}

impl Button {
    pub fn new(config: &WidgetConfig, style: Style) -> Result<Self, BuildError> {
        let rect = config.rect()?;
        let mut style = style;
        if let Some(size) = config.font_size {
            style.font_size = size;
        }
        if let Some(r) = config.radius {
            style.radius = r;
        }
        Ok(Self {
            rect,
            min_width: rect.width(),
            label: config.text.clone(),
            style,
            background: config.background,
            redirect: config.redirect.clone(),
            icon: None,
            activation: Activation::default(),
            hovering: false,
            label_size: Vec2::zero(),
        })
    }

    /// Draws `icon` over the rect instead of the label and background.
    pub fn with_icon(mut self, icon: ImageId) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn set_icon(&mut self, icon: ImageId) {
        self.icon = Some(icon);
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    #[inline]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }
}

impl Widget for Button {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn handle_event(&mut self, event: &UiEvent, _ctx: &EventCtx) {
        match event {
            UiEvent::PointerDown { .. } if event.pressed_in(self.rect) => self.activation.trigger(),
            UiEvent::PointerMoved { pos } => {
                self.hovering = self.style.hover.is_some() && self.rect.contains(*pos);
            }
            _ => {}
        }
    }

    fn update(&mut self, ctx: &LayoutCtx<'_>) {
        self.activation.clear();
        self.label_size = ctx.measure(&self.label, self.style.font, self.style.font_size);
        self.rect = self.rect.with_width(self.min_width.max(self.label_size.x + LABEL_PADDING));
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        if let Some(icon) = self.icon {
            painter.image(icon, self.rect);
            return;
        }
        if self.background {
            let color = match self.style.hover {
                Some(hover) if self.hovering => hover,
                _ if self.activation.is_pending() => self.style.active,
                _ => self.style.background,
            };
            painter.fill_rounded_rect(self.rect, self.style.radius, color, None);
        }
        let origin = layout::centred(self.rect, self.label_size);
        painter.text(&self.label, self.style.font, self.style.font_size, self.style.text, origin);
    }

    fn is_active(&self) -> bool {
        self.activation.is_pending()
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Clickable for Button {
    fn activated(&self) -> bool {
        self.activation.is_pending()
    }

    fn redirect(&self) -> Option<&SceneId> {
        self.redirect.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, layout_ctx, move_to};
    use ocrtunes_engine::text::FontSystem;

    fn button(width: f32) -> Button {
        Button::new(
            &WidgetConfig::new(10.0, 10.0, width, 40.0).text("Log In").redirect(SceneId::new("library")),
            Style::default(),
        )
        .unwrap()
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn press_inside_activates_until_next_update() {
        let fonts = FontSystem::new();
        let mut b = button(100.0);
        b.handle_event(&click(20.0, 20.0), &EventCtx::default());
        assert!(b.activated());
        assert_eq!(b.redirect(), Some(&SceneId::new("library")));
        b.update(&layout_ctx(&fonts));
        assert!(!b.activated());
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut b = button(100.0);
        b.handle_event(&click(200.0, 20.0), &EventCtx::default());
        assert!(!b.is_active());
    }

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn width_grows_to_fit_label_but_never_shrinks() {
        let fonts = FontSystem::new();
        // "Log In" = 6 chars * 10 px estimate + padding = 70
        let mut narrow = button(20.0);
        narrow.update(&layout_ctx(&fonts));
        assert_eq!(narrow.rect().width(), 70.0);

        let mut wide = button(300.0);
        wide.update(&layout_ctx(&fonts));
        assert_eq!(wide.rect().width(), 300.0);
    }

    // ── hover ─────────────────────────────────────────────────────────────

    #[test]
    fn hover_requires_a_hover_colour() {
        let mut plain = button(100.0);
        plain.handle_event(&move_to(20.0, 20.0), &EventCtx::default());
        assert!(!plain.is_hovering());

        let mut hot = Button::new(
            &WidgetConfig::new(10.0, 10.0, 100.0, 40.0),
            Style::default().hover(crate::style::NAVY),
        )
        .unwrap();
        hot.handle_event(&move_to(20.0, 20.0), &EventCtx::default());
        assert!(hot.is_hovering());
        hot.handle_event(&move_to(500.0, 20.0), &EventCtx::default());
        assert!(!hot.is_hovering());
    }

    #[test]
    fn rejects_zero_size() {
        let err = Button::new(&WidgetConfig::new(0.0, 0.0, 0.0, 0.0), Style::default()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidSize { .. }));
    }
}
