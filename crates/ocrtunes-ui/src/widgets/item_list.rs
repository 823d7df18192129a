use ocrtunes_engine::coords::{Rect, Vec2};
use ocrtunes_engine::paint::Color;
use ocrtunes_engine::text::FontId;

use crate::config::WidgetConfig;
use crate::error::BuildError;
use crate::event::{EventCtx, UiEvent};
use crate::layout;
use crate::model::ListEntry;
use crate::painter::Painter;
use crate::style::{BLACK, BODY_SIZE, DARK_BLUE, LIGHT_BLUE, WHITE};
use crate::widget::{LayoutCtx, Scrollable, Widget};
use crate::widgets::text_field::TEXT_INSET;
use crate::widgets::track::ScrollArea;

/// Default vertical gap between rows.
pub const ROW_GAP: f32 = 20.0;

/// Colours and text settings of a [`ScrollableList`] or [`super::GridSlide`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListStyle {
    pub row: Color,
    pub text: Color,
    pub font: Option<FontId>,
    pub font_size: f32,
    pub radius: f32,
    pub slider: Color,
    /// Thumb colour while dragged.
    pub dragging: Color,
    /// Guard band colour; match the scene background.
    pub guard: Color,
}

impl Default for ListStyle {
    fn default() -> Self {
        Self {
            row: DARK_BLUE,
            text: BLACK,
            font: None,
            font_size: BODY_SIZE,
            radius: 25.0,
            slider: LIGHT_BLUE,
            dragging: DARK_BLUE,
            guard: WHITE,
        }
    }
}

impl ListStyle {
    pub fn row(mut self, c: Color) -> Self {
        self.row = c;
        self
    }

    pub fn slider(mut self, idle: Color, dragging: Color) -> Self {
        self.slider = idle;
        self.dragging = dragging;
        self
    }

    pub fn guard(mut self, c: Color) -> Self {
        self.guard = c;
        self
    }

    pub fn font(mut self, font: Option<FontId>, size: f32) -> Self {
        self.font = font;
        self.font_size = size;
        self
    }
}

/// A vertically scrolled window over `items`, `max_visible` rows at a time.
///
/// Row `i` sits at `first.y + pitch * i + offset`, where the offset comes from
/// the slider thumb. Rows outside the window stay in `items` but are neither
/// drawn nor hit-tested. A press on a visible row stores it as the selection
/// until the owner takes it.
#[derive(Debug)]
pub struct ScrollableList<T> {
    area: ScrollArea,
    items: Vec<T>,
    rows: Vec<(Rect, bool)>,
    selected: Option<T>,
    style: ListStyle,
}

impl<T: ListEntry> ScrollableList<T> {
    /// `config` gives the first row's rect.
    pub fn new(config: &WidgetConfig, items: Vec<T>, max_visible: usize, style: ListStyle) -> Result<Self, BuildError> {
        Self::with_gap(config, items, max_visible, ROW_GAP, style)
    }

    pub fn with_gap(
        config: &WidgetConfig,
        items: Vec<T>,
        max_visible: usize,
        gap: f32,
        style: ListStyle,
    ) -> Result<Self, BuildError> {
        let mut style = style;
        if let Some(size) = config.font_size {
            style.font_size = size;
        }
        if let Some(r) = config.radius {
            style.radius = r;
        }
        let area = ScrollArea::new(config.rect()?, gap, max_visible, 1)?;
        let mut list = Self { area, items, rows: Vec::new(), selected: None, style };
        list.relayout();
        Ok(list)
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replaces the content, resizing the thumb and dropping any selection.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = None;
        self.relayout();
    }

    #[inline]
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn take_selected(&mut self) -> Option<T> {
        self.selected.take()
    }

    /// Current row rects with their on-screen flags, in item order.
    #[inline]
    pub fn rows(&self) -> &[(Rect, bool)] {
        &self.rows
    }

    #[inline]
    pub fn area(&self) -> &ScrollArea {
        &self.area
    }

    fn relayout(&mut self) {
        self.area.set_rows(self.items.len());
        let (first, pitch, offset) = (self.area.first(), self.area.pitch(), self.area.pixel_offset());
        self.rows = (0..self.items.len())
            .map(|i| {
                let r = layout::list_row(first, pitch, i, offset);
                (r, self.area.is_visible(r))
            })
            .collect();
    }

    fn draw_row(&self, painter: &mut Painter<'_>, rect: Rect, item: &T) {
        let s = &self.style;
        painter.fill_rounded_rect(rect, s.radius, s.row, None);
        let cells = item.cells();
        if cells.is_empty() {
            return;
        }
        let column = (rect.width() - TEXT_INSET * 2.0) / cells.len() as f32;
        for (i, cell) in cells.iter().enumerate() {
            let size = painter.measure(cell, s.font, s.font_size);
            let origin = Vec2::new(
                rect.x() + TEXT_INSET + column * i as f32,
                rect.y() + ((rect.height() - size.y) / 2.0).floor(),
            );
            painter.text(cell, s.font, s.font_size, s.text, origin);
        }
    }
}

impl<T: ListEntry> Widget for ScrollableList<T> {
    fn rect(&self) -> Rect {
        self.area.bounds()
    }

    fn handle_event(&mut self, event: &UiEvent, ctx: &EventCtx) {
        if let Some(pos) = event.primary_press() {
            let hit = self.rows.iter().position(|(r, on_screen)| *on_screen && r.contains(pos));
            if let Some(i) = hit {
                self.selected = Some(self.items[i].clone());
            }
        }
        self.area.track_mut().handle_event(event, ctx);
    }

    fn update(&mut self, _ctx: &LayoutCtx<'_>) {
        self.relayout();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        self.area.track().draw(painter, self.style.slider, self.style.dragging);
        for ((rect, on_screen), item) in self.rows.iter().zip(&self.items) {
            if *on_screen {
                self.draw_row(painter, *rect, item);
            }
        }
        self.area.draw_guards(painter, self.style.guard);
    }

    fn is_active(&self) -> bool {
        self.area.track().is_dragging()
    }

    fn as_scrollable_mut(&mut self) -> Option<&mut dyn Scrollable> {
        Some(self)
    }
}

impl<T: ListEntry> Scrollable for ScrollableList<T> {
    fn offset(&self) -> f32 {
        self.area.track().offset()
    }

    fn thumb(&self) -> Rect {
        self.area.track().thumb()
    }

    fn reset_scroll(&mut self) {
        self.area.track_mut().reset();
        self.relayout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{advance, click, layout_ctx, move_to, release};
    use ocrtunes_engine::text::FontSystem;
    use proptest::prelude::*;

    fn letters(n: usize) -> Vec<String> {
        (0..n).map(|i| ((b'a' + i as u8) as char).to_string()).collect()
    }

    fn list(n: usize) -> ScrollableList<String> {
        ScrollableList::with_gap(&WidgetConfig::new(100.0, 100.0, 300.0, 50.0), letters(n), 4, 10.0, ListStyle::default())
            .unwrap()
    }

    fn scroll(l: &mut ScrollableList<String>, dy: f32) {
        let grab = l.thumb().origin + Vec2::new(5.0, 5.0);
        let mut ctx = EventCtx::default();
        for ev in [click(grab.x, grab.y), move_to(grab.x, grab.y + dy), release(grab.x, grab.y + dy)] {
            let snap = advance(&mut ctx, &ev);
            l.handle_event(&ev, &snap);
        }
        l.update(&layout_ctx(&FontSystem::new()));
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn ten_items_four_visible() {
        let l = list(10);
        assert_eq!(l.thumb().height(), 180.0);
        let visible: Vec<bool> = l.rows().iter().map(|(_, v)| *v).collect();
        assert_eq!(&visible[..5], &[true, true, true, true, false]);
    }

    #[test]
    fn scrolling_shifts_rows_by_whole_pitches() {
        let mut l = list(10);
        scroll(&mut l, 10.0);
        assert_eq!(l.rows()[1].0.y(), 100.0);
        assert!(!l.rows()[0].1);
        assert!(l.rows()[4].1);
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn press_on_visible_row_selects_item() {
        let mut l = list(10);
        l.handle_event(&click(150.0, 170.0), &EventCtx::default());
        assert_eq!(l.selected().map(String::as_str), Some("b"));
        assert_eq!(l.take_selected().as_deref(), Some("b"));
        assert!(l.selected().is_none());
    }

    #[test]
    fn press_on_hidden_row_is_ignored() {
        let mut l = list(10);
        // row 4 (y 340..390) is outside the window
        l.handle_event(&click(150.0, 350.0), &EventCtx::default());
        assert!(l.selected().is_none());
    }

    #[test]
    fn selection_survives_update_until_taken() {
        let mut l = list(10);
        l.handle_event(&click(150.0, 110.0), &EventCtx::default());
        l.update(&layout_ctx(&FontSystem::new()));
        assert_eq!(l.selected().map(String::as_str), Some("a"));
    }

    #[test]
    fn set_items_resizes_thumb_and_clears_selection() {
        let mut l = list(10);
        l.handle_event(&click(150.0, 110.0), &EventCtx::default());
        l.set_items(letters(2));
        assert!(l.selected().is_none());
        assert_eq!(l.thumb().height(), 120.0);
    }

    #[test]
    fn reset_scroll_returns_to_top() {
        let mut l = list(10);
        scroll(&mut l, 30.0);
        l.reset_scroll();
        assert_eq!(l.offset(), 0.0);
        assert_eq!(l.rows()[0].0.y(), 100.0);
    }

    #[test]
    fn widget_set_resets_every_scrollable() {
        let mut set = crate::scene::WidgetSet::new();
        let a = set.add(list(10));
        let b = set.add(list(10));
        scroll(&mut set[a], 30.0);
        scroll(&mut set[b], 10.0);
        set.reset_scroll();
        assert_eq!(set[a].offset(), 0.0);
        assert_eq!(set[b].offset(), 0.0);
        assert!(set[b].rows()[0].1);
    }

    proptest! {
        #[test]
        fn hidden_rows_never_select(n in 1usize..20, dy in 0.0f32..200.0, y in 0.0f32..600.0) {
            let mut l = list(n);
            scroll(&mut l, dy);
            let hidden: Vec<Rect> = l.rows().iter().filter(|(_, v)| !*v).map(|(r, _)| *r).collect();
            let visible: Vec<Rect> = l.rows().iter().filter(|(_, v)| *v).map(|(r, _)| *r).collect();
            let p = Vec2::new(150.0, y);
            l.handle_event(&click(p.x, p.y), &EventCtx::default());
            if hidden.iter().any(|r| r.contains(p)) && !visible.iter().any(|r| r.contains(p)) {
                prop_assert!(l.selected().is_none());
            }
        }
    }
}
