use ocrtunes_engine::coords::Rect;
use ocrtunes_engine::images::ImageId;
use ocrtunes_engine::paint::Color;

use crate::event::{EventCtx, UiEvent};
use crate::painter::Painter;
use crate::widget::{LayoutCtx, Widget};

/// A non-interactive filled shape or image.
#[derive(Debug, Clone)]
pub struct Panel {
    rect: Rect,
    fill: Fill,
    opacity: f32,
}

#[derive(Debug, Clone, Copy)]
enum Fill {
    Color { color: Color, radius: f32 },
    Image(ImageId),
}

impl Panel {
    pub fn new(rect: Rect, color: Color, radius: f32) -> Self {
        Self { rect, fill: Fill::Color { color, radius }, opacity: 1.0 }
    }

    pub fn image(rect: Rect, image: ImageId) -> Self {
        Self { rect, fill: Fill::Image(image), opacity: 1.0 }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_image(&mut self, image: ImageId) {
        self.fill = Fill::Image(image);
    }

    /// Multiplier applied to the fill's alpha, clamped to `0..=1`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

impl Widget for Panel {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn handle_event(&mut self, _event: &UiEvent, _ctx: &EventCtx) {}

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {}

    fn draw(&self, painter: &mut Painter<'_>) {
        painter.with_opacity(self.opacity, |p| match self.fill {
            Fill::Color { color, radius } => p.fill_rounded_rect(self.rect, radius, color, None),
            Fill::Image(image) => p.image(image, self.rect),
        });
    }
}
