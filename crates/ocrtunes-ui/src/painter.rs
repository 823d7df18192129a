use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::images::ImageId;
use ocrtunes_engine::paint::Color;
use ocrtunes_engine::scene::{Border, DrawList, ZIndex};
use ocrtunes_engine::text::{FontId, TextMeasure};

/// Z offset for floating content (open menus, search results).
const OVERLAY_Z: i32 = 1 << 20;

/// Drawing surface passed to [`crate::widget::Widget::draw`].
///
/// Wraps the engine's `DrawList`: each call gets the next z so later draws
/// land on top. An opacity multiplier fades everything drawn through it.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a dyn TextMeasure,
    default_font: Option<FontId>,
    z: i32,
    opacity: f32,
}

impl<'a> Painter<'a> {
    pub fn new(draw_list: &'a mut DrawList, fonts: &'a dyn TextMeasure, default_font: Option<FontId>) -> Self {
        Self { draw_list, fonts, default_font, z: 0, opacity: 1.0 }
    }

    // ── text measurement ──────────────────────────────────────────────────

    /// Size of `text` on one line.
    pub fn measure(&self, text: &str, font: Option<FontId>, size: f32) -> Vec2 {
        self.fonts.measure(text, font.or(self.default_font), size)
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Runs `f` with the opacity multiplied by `factor`.
    pub fn with_opacity(&mut self, factor: f32, f: impl FnOnce(&mut Painter<'a>)) {
        let prev = self.opacity;
        self.opacity = (prev * factor).clamp(0.0, 1.0);
        f(self);
        self.opacity = prev;
    }

    /// Runs `f` on a layer above everything drawn outside an overlay.
    pub fn overlay(&mut self, f: impl FnOnce(&mut Painter<'a>)) {
        let prev = self.z;
        self.z = prev + OVERLAY_Z;
        f(self);
        self.z = prev;
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let z = self.next_z();
        let color = color.scale_alpha(self.opacity);
        self.draw_list.push_solid_rect(z, rect, color);
    }

    /// Rounded rectangle with an optional inner border.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, border: Option<Border>) {
        let z = self.next_z();
        let color = color.scale_alpha(self.opacity);
        let border = border.map(|b| Border::new(b.width, b.color.scale_alpha(self.opacity)));
        self.draw_list.push_rounded_rect(z, rect, radius, color, border);
    }

    pub fn outline(&mut self, rect: Rect, width: f32, color: Color) {
        let z = self.next_z();
        let color = color.scale_alpha(self.opacity);
        self.draw_list.push_outline(z, rect, Border::new(width, color));
    }

    /// Single line of text with its top-left at `origin`.
    ///
    /// Skipped when no font is available (headless runs).
    pub fn text(&mut self, text: &str, font: Option<FontId>, size: f32, color: Color, origin: Vec2) {
        if text.is_empty() {
            return;
        }
        let Some(font) = font.or(self.default_font) else { return; };
        let z = self.next_z();
        let color = color.scale_alpha(self.opacity);
        self.draw_list.push_text(z, text, font, size, color, origin);
    }

    pub fn image(&mut self, image: ImageId, rect: Rect) {
        let z = self.next_z();
        self.draw_list.push_image(z, image, rect, self.opacity);
    }

    // ── internal ──────────────────────────────────────────────────────────

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrtunes_engine::scene::DrawCmd;
    use ocrtunes_engine::text::FontSystem;

    #[test]
    fn later_draws_get_higher_z() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        {
            let mut p = Painter::new(&mut list, &fonts, None);
            p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb8(1, 1, 1));
            p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb8(2, 2, 2));
        }
        assert!(list.items()[0].key < list.items()[1].key);
    }

    #[test]
    fn overlay_draws_above_later_base_draws() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        {
            let mut p = Painter::new(&mut list, &fonts, None);
            p.overlay(|p| p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb8(1, 1, 1)));
            p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb8(2, 2, 2));
        }
        assert!(list.items()[0].key.z > list.items()[1].key.z);
    }

    #[test]
    fn opacity_fades_colors() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        {
            let mut p = Painter::new(&mut list, &fonts, None);
            p.with_opacity(0.5, |p| p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb8(255, 255, 255)));
            assert_eq!(p.opacity(), 1.0);
        }
        match &list.items()[0].cmd {
            DrawCmd::Rect(r) => assert_eq!(r.color.a, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn text_without_font_is_skipped() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        {
            let mut p = Painter::new(&mut list, &fonts, None);
            p.text("hello", None, 20.0, Color::rgb8(0, 0, 0), Vec2::zero());
        }
        assert!(list.is_empty());
    }
}
