use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::images::ImageId;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::painter::Painter;
use crate::style::{Style, DARK_BLUE, LIGHT_BLUE};
use crate::widget::{LayoutCtx, Widget};
use crate::widgets::text_field::TEXT_INSET;

const BOX_SIZE: f32 = 32.0;
const BOX_OFFSET: f32 = 200.0;
const BOX_RADIUS: f32 = 5.0;

/// A column of labelled toggles, one row per item.
///
/// Only a press on a row's box toggles it.
#[derive(Debug)]
pub struct Checkboxes {
    first: Rect,
    items: Vec<(String, bool)>,
    background: bool,
    style: Style,
    tick: Option<ImageId>,
}

impl Checkboxes {
    pub fn new<S: AsRef<str>>(config: &WidgetConfig, items: &[S], style: Style) -> Result<Self, BuildError> {
        let first = config.rect()?;
        let mut style = style;
        if let Some(size) = config.font_size {
            style.font_size = size;
        }
        Ok(Self {
            first,
            items: items.iter().map(|i| (i.as_ref().to_owned(), false)).collect(),
            background: config.background,
            style,
            tick: None,
        })
    }

    /// Image drawn inside checked boxes. Without one, a filled square is drawn.
    pub fn with_tick(mut self, tick: ImageId) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Labels of the checked rows, in row order.
    pub fn checked(&self) -> Vec<&str> {
        self.items.iter().filter(|(_, on)| *on).map(|(l, _)| l.as_str()).collect()
    }

    pub fn is_checked(&self, label: &str) -> bool {
        self.items.iter().any(|(l, on)| *on && l == label)
    }

    /// Sets the row labelled `label`. Returns `false` if there is no such row.
    pub fn set_checked(&mut self, label: &str, on: bool) -> bool {
        match self.items.iter_mut().find(|(l, _)| l == label) {
            Some((_, state)) => {
                *state = on;
                true
            }
            None => false,
        }
    }

    /// Unchecks every row.
    pub fn reset(&mut self) {
        for (_, on) in &mut self.items {
            *on = false;
        }
    }

    fn row(&self, index: usize) -> Rect {
        self.first.translate(Vec2::new(0.0, self.first.height() * index as f32))
    }

    fn check_box(&self, index: usize) -> Rect {
        let row = self.row(index);
        Rect::new(
            row.x() + BOX_OFFSET,
            row.y() + ((row.height() - BOX_SIZE) / 2.0).floor(),
            BOX_SIZE,
            BOX_SIZE,
        )
    }
}

impl Widget for Checkboxes {
    fn rect(&self) -> Rect {
        Rect::from_origin_size(
            self.first.origin,
            Vec2::new(self.first.width(), self.first.height() * self.items.len() as f32),
        )
    }

    fn handle_event(&mut self, event: &UiEvent, _ctx: &EventCtx) {
        let Some(pos) = event.primary_press() else { return; };
        if let Some(i) = (0..self.items.len()).find(|&i| self.check_box(i).contains(pos)) {
            self.items[i].1 = !self.items[i].1;
        }
    }

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {}

    fn draw(&self, painter: &mut Painter<'_>) {
        let s = &self.style;
        for (i, (label, on)) in self.items.iter().enumerate() {
            let row = self.row(i);
            if self.background {
                painter.fill_rounded_rect(row, s.radius, s.background, None);
            }
            let b = self.check_box(i);
            painter.fill_rounded_rect(b, BOX_RADIUS, LIGHT_BLUE, None);
            if *on {
                match self.tick {
                    Some(tick) => painter.image(tick, b),
                    None => painter.fill_rounded_rect(
                        Rect::new(b.x() + 8.0, b.y() + 8.0, BOX_SIZE - 16.0, BOX_SIZE - 16.0),
                        BOX_RADIUS / 2.0,
                        DARK_BLUE,
                        None,
                    ),
                }
            }
            let size = painter.measure(label, s.font, s.font_size);
            let origin = Vec2::new(row.x() + TEXT_INSET, row.y() + ((row.height() - size.y) / 2.0).floor());
            painter.text(label, s.font, s.font_size, s.text, origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::click;

    fn genres() -> Checkboxes {
        Checkboxes::new(&WidgetConfig::new(1125.0, 270.0, 200.0, 45.0), &["Rock", "Pop", "RNB", "Rap"], Style::default())
            .unwrap()
    }

    #[test]
    fn press_on_box_toggles_row() {
        let mut c = genres();
        // second row box: x 1325..1357, y 315 + 6 = 321..353
        c.handle_event(&click(1330.0, 330.0), &EventCtx::default());
        assert_eq!(c.checked(), vec!["Pop"]);
        c.handle_event(&click(1330.0, 330.0), &EventCtx::default());
        assert!(c.checked().is_empty());
    }

    #[test]
    fn press_on_label_does_nothing() {
        let mut c = genres();
        c.handle_event(&click(1150.0, 290.0), &EventCtx::default());
        assert!(c.checked().is_empty());
    }

    #[test]
    fn reset_unchecks_everything() {
        let mut c = genres();
        c.handle_event(&click(1330.0, 285.0), &EventCtx::default());
        c.handle_event(&click(1330.0, 420.0), &EventCtx::default());
        assert_eq!(c.checked(), vec!["Rock", "Rap"]);
        assert!(c.is_checked("Rap"));
        c.reset();
        assert!(c.checked().is_empty());
    }

    #[test]
    fn set_checked_by_label() {
        let mut c = genres();
        assert!(c.set_checked("RNB", true));
        assert!(!c.set_checked("Jazz", true));
        assert_eq!(c.checked(), vec!["RNB"]);
    }

    #[test]
    fn bounds_cover_all_rows() {
        assert_eq!(genres().rect(), Rect::new(1125.0, 270.0, 200.0, 180.0));
    }
}
