//! Palette and per-widget styling.

use ocrtunes_engine::paint::Color;
use ocrtunes_engine::text::FontId;

pub const LIGHT_BLUE: Color = Color::rgb8(179, 197, 251);
pub const DARK_BLUE: Color = Color::rgb8(97, 122, 247);
pub const NAVY: Color = Color::rgb8(46, 74, 92);
pub const RED: Color = Color::rgb8(255, 0, 0);
pub const GREEN: Color = Color::rgb8(0, 255, 0);
pub const WHITE: Color = Color::rgb8(242, 245, 254);
pub const BLACK: Color = Color::rgb8(0, 0, 0);
pub const CREAM: Color = Color::rgb8(250, 235, 214);
pub const VANILLA: Color = Color::rgb8(254, 253, 211);

/// Default label size in logical pixels.
pub const BODY_SIZE: f32 = 20.0;

/// Visual parameters of a widget, fixed at construction.
///
/// `font = None` uses the application's default font.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub background: Color,
    pub active: Color,
    pub hover: Option<Color>,
    pub text: Color,
    pub font: Option<FontId>,
    pub font_size: f32,
    pub radius: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: LIGHT_BLUE,
            active: DARK_BLUE,
            hover: None,
            text: WHITE,
            font: None,
            font_size: BODY_SIZE,
            radius: 5.0,
        }
    }
}

impl Style {
    pub fn background(mut self, c: Color) -> Self {
        self.background = c;
        self
    }

    pub fn active(mut self, c: Color) -> Self {
        self.active = c;
        self
    }

    pub fn hover(mut self, c: Color) -> Self {
        self.hover = Some(c);
        self
    }

    pub fn text(mut self, c: Color) -> Self {
        self.text = c;
        self
    }

    pub fn font(mut self, font: Option<FontId>, size: f32) -> Self {
        self.font = font;
        self.font_size = size;
        self
    }

    pub fn radius(mut self, r: f32) -> Self {
        self.radius = r;
        self
    }
}
